//! Startup request handler: authorize, start the instance, report.
//!
//! One call of [`StartupHandler::handle`] is one invocation:
//! 1. Check the path against the optional password (no provider call on mismatch)
//! 2. Ask the provider to start the configured instance, once
//! 3. Map access denied to the budget hint, propagate every other failure

use kindle_core::{is_authorized, InstanceId, StartupPassword, StartupRequest, StartupResult};

use crate::{InstanceProvider, StartupFault};

/// Stateless startup handler.
///
/// Holds the injected provider and the configuration; shares nothing
/// between invocations, so a single handler can be called concurrently.
pub struct StartupHandler<P: InstanceProvider> {
    provider: P,
    instance_id: InstanceId,
    password: Option<StartupPassword>,
}

impl<P: InstanceProvider> StartupHandler<P> {
    /// Create a handler for `instance_id`.
    ///
    /// With `password` set to `None` every request is authorized.
    #[must_use]
    pub fn new(provider: P, instance_id: InstanceId, password: Option<StartupPassword>) -> Self {
        Self { provider, instance_id, password }
    }

    #[must_use]
    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// Returns `true` if the handler requires a password in the path.
    #[must_use]
    pub fn requires_password(&self) -> bool {
        self.password.is_some()
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns `true` if `path` passes the password check.
    #[must_use]
    pub fn authorize(&self, path: &str) -> bool {
        is_authorized(self.password.as_ref(), path)
    }

    /// Handle one startup request.
    ///
    /// # Errors
    /// Returns [`StartupFault::Provider`] when the provider fails with anything
    /// other than access denied. The fault is logged before it is returned.
    pub async fn handle(&self, request: &StartupRequest) -> Result<StartupResult, StartupFault> {
        if !self.authorize(&request.path) {
            tracing::warn!(instance_id = %self.instance_id, authorized = false, "startup request rejected");
            return Ok(StartupResult::Unauthorized);
        }

        match self.provider.start_instance(&self.instance_id).await {
            Ok(change) => {
                tracing::info!(
                    instance_id = %self.instance_id,
                    previous = %change.previous,
                    current = %change.current,
                    already_running = change.was_already_running(),
                    "instance start requested"
                );
                Ok(StartupResult::Started)
            }
            Err(err) if err.is_access_denied() => {
                tracing::warn!(
                    instance_id = %self.instance_id,
                    error = %err,
                    "provider denied instance start"
                );
                Ok(StartupResult::budget_denied())
            }
            Err(err) => {
                tracing::error!(
                    instance_id = %self.instance_id,
                    error = %err,
                    "unexpected error starting instance"
                );
                Err(StartupFault::Provider(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use kindle_core::{InstanceState, InstanceStateChange};

    use super::*;
    use crate::ProviderError;

    struct AlwaysFailProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl InstanceProvider for AlwaysFailProvider {
        async fn start_instance(&self, _id: &InstanceId) -> Result<InstanceStateChange, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Transport("mock always fails".to_owned()))
        }
    }

    struct StartingProvider;

    #[async_trait]
    impl InstanceProvider for StartingProvider {
        async fn start_instance(&self, id: &InstanceId) -> Result<InstanceStateChange, ProviderError> {
            Ok(InstanceStateChange::new(id.clone(), InstanceState::Stopped, InstanceState::Pending))
        }
    }

    fn instance() -> InstanceId {
        match InstanceId::new("i-0abc") {
            Ok(id) => id,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_request_skips_provider() {
        let provider = Arc::new(AlwaysFailProvider { calls: AtomicUsize::new(0) });
        let handler = StartupHandler::new(
            Arc::clone(&provider),
            instance(),
            StartupPassword::new("letmein"),
        );

        let result = handler.handle(&StartupRequest::new("/wrong")).await;
        assert!(matches!(result, Ok(StartupResult::Unauthorized)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0, "provider must not be called");
    }

    #[tokio::test]
    async fn transport_failure_propagates_as_fault() {
        let provider = Arc::new(AlwaysFailProvider { calls: AtomicUsize::new(0) });
        let handler = StartupHandler::new(Arc::clone(&provider), instance(), None);

        let result = handler.handle(&StartupRequest::new("/")).await;
        assert!(
            matches!(result, Err(StartupFault::Provider(ProviderError::Transport(_)))),
            "non-access-denied errors must propagate"
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1, "exactly one attempt");
    }

    #[tokio::test]
    async fn successful_start_reports_started() {
        let handler = StartupHandler::new(StartingProvider, instance(), None);
        let result = handler.handle(&StartupRequest::new("/anything")).await;
        assert!(matches!(result, Ok(StartupResult::Started)));
    }

    #[test]
    fn accessors_reflect_configuration() {
        let handler = StartupHandler::new(StartingProvider, instance(), StartupPassword::new(""));
        assert!(!handler.requires_password(), "empty password disables the check");
        assert_eq!(handler.instance_id().as_str(), "i-0abc");
        assert!(handler.authorize("/whatever"));
    }
}
