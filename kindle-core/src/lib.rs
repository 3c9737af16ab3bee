//! Core types for the Kindle on-demand server startup service.
//!
//! Defines the request, outcome and response shapes of a startup
//! invocation, the instance identifier and the optional path password.
//! Nothing in this crate performs I/O.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod auth;
pub mod error;
pub mod id;
pub mod outcome;
pub mod request;
pub mod state;

pub use auth::{is_authorized, StartupPassword};
pub use error::CoreError;
pub use id::InstanceId;
pub use outcome::{
    StartupResponse, StartupResult, BUDGET_DENIED_MESSAGE, STARTED_MESSAGE, UNAUTHORIZED_MESSAGE,
};
pub use request::StartupRequest;
pub use state::{InstanceState, InstanceStateChange};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_state_round_trips_known_names() {
        for name in ["pending", "running", "shutting-down", "terminated", "stopping", "stopped"] {
            let state = InstanceState::from_name(name);
            assert!(
                !matches!(state, InstanceState::Unknown(_)),
                "{name} must be a known state"
            );
            assert_eq!(state.as_str(), name);
        }
    }

    #[test]
    fn instance_state_keeps_unknown_name() {
        let state = InstanceState::from_name("hibernating");
        assert_eq!(state, InstanceState::Unknown("hibernating".to_owned()));
        assert_eq!(state.to_string(), "hibernating");
    }

    #[test]
    fn every_state_name_round_trips_through_from_name() {
        let states = [
            InstanceState::Pending,
            InstanceState::Running,
            InstanceState::ShuttingDown,
            InstanceState::Terminated,
            InstanceState::Stopping,
            InstanceState::Stopped,
            InstanceState::Unknown("hibernating".to_owned()),
        ];
        for state in states {
            assert_eq!(InstanceState::from_name(state.as_str()), state);
        }
    }

    #[test]
    fn state_change_detects_already_running() {
        let id = match InstanceId::new("i-1") {
            Ok(id) => id,
            Err(e) => panic!("unexpected error: {e}"),
        };
        let fresh = InstanceStateChange::new(id.clone(), InstanceState::Stopped, InstanceState::Pending);
        assert!(!fresh.was_already_running());

        let noop = InstanceStateChange::new(id, InstanceState::Running, InstanceState::Running);
        assert!(noop.was_already_running());
    }

    #[test]
    fn forbidden_reason_is_the_response_message() {
        let result = StartupResult::Forbidden { reason: "custom".to_owned() };
        assert_eq!(result.message(), "custom");
        assert_eq!(result.status_code(), 403);
    }

    #[test]
    fn core_error_display_includes_reason() {
        let err = match InstanceId::new("") {
            Ok(_) => panic!("empty id must be rejected"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("must not be empty"));
    }
}
