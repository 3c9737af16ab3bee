//! Instance start-up for the Kindle service.
//!
//! Holds the provider seam, the EC2 Query API provider and the startup
//! request handler that ties authorization and the provider together.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod ec2;
pub mod error;
pub mod handler;
pub mod provider;
pub mod sigv4;

pub use config::{AwsCredentials, Ec2Config};
pub use ec2::Ec2Provider;
pub use error::{ProviderError, StartupFault};
pub use handler::StartupHandler;
pub use provider::InstanceProvider;
