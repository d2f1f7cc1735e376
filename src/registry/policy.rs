//! Registry configuration.

use serde::{Deserialize, Serialize};

/// What a registry does when a second handler arrives for an occupied key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the registration and keep the existing handler
    #[default]
    Reject,

    /// Replace the existing handler, logging a warning
    Overwrite,
}
