//! Configuration for one engine invocation.

use serde::{Deserialize, Serialize};

/// Which finish date bounds the backward pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinishScope {
    /// One project finish (the latest EF of the whole invocation) bounds every
    /// activity, including activities in unrelated networks.
    #[default]
    Shared,
    /// Each weakly connected network is bounded by its own latest EF. Same
    /// result as invoking the engine once per network.
    PerNetwork,
}

/// Engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpmConfig {
    #[serde(default)]
    pub finish_scope: FinishScope,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[serde(default)]
    pub verbosity: u8,
}

impl CpmConfig {
    pub fn per_network() -> Self {
        Self {
            finish_scope: FinishScope::PerNetwork,
            ..Self::default()
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}
