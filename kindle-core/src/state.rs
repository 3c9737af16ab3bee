use std::fmt;

use crate::id::InstanceId;

/// Lifecycle state of a compute instance as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    /// A state name this crate does not know about.
    Unknown(String),
}

impl InstanceState {
    /// Parses a provider state name such as `"pending"` or `"shutting-down"`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Returns the provider state name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Unknown(name) => name,
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State transition reported by the provider in answer to a start request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct InstanceStateChange {
    pub instance_id: InstanceId,
    pub previous: InstanceState,
    pub current: InstanceState,
}

impl InstanceStateChange {
    #[must_use]
    pub fn new(instance_id: InstanceId, previous: InstanceState, current: InstanceState) -> Self {
        Self { instance_id, previous, current }
    }

    /// Returns `true` if the instance was already up before this request.
    #[must_use]
    pub fn was_already_running(&self) -> bool {
        matches!(self.previous, InstanceState::Pending | InstanceState::Running)
    }
}
