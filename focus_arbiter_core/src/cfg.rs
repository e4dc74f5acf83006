use serde::{Deserialize, Serialize};

use crate::stream::{PolicyTier, StreamDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusCfg {
    /// Tiers at or below this value are assistant-tier.
    pub assistant_threshold: PolicyTier,
    /// Reported by `current()` while the queue is empty.
    pub baseline: StreamDescriptor,
}

impl Default for FocusCfg {
    fn default() -> Self {
        Self {
            assistant_threshold: PolicyTier::ASSISTANT,
            baseline: StreamDescriptor::BASELINE,
        }
    }
}
