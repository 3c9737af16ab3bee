//! Instance provider abstraction trait.
//!
//! Allows swapping the cloud backend (or a test double) without changing the
//! startup handler.

use async_trait::async_trait;
use kindle_core::{InstanceId, InstanceStateChange};

use crate::ProviderError;

/// The one provider capability the service needs: start an instance by id.
///
/// Implementations must be `Send + Sync` so a single provider can serve
/// concurrent invocations.
#[async_trait]
pub trait InstanceProvider: Send + Sync {
    /// Request that the instance be started.
    ///
    /// Starting an instance that is already running is not an error.
    ///
    /// # Errors
    /// Returns [`ProviderError::AccessDenied`] if the caller lacks permission.
    /// Returns any other [`ProviderError`] variant for faults.
    async fn start_instance(&self, id: &InstanceId) -> Result<InstanceStateChange, ProviderError>;
}

#[async_trait]
impl<P: InstanceProvider + ?Sized> InstanceProvider for std::sync::Arc<P> {
    async fn start_instance(&self, id: &InstanceId) -> Result<InstanceStateChange, ProviderError> {
        (**self).start_instance(id).await
    }
}
