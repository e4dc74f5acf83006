use serde::{Deserialize, Serialize};

/// Opaque identity of a competing stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(pub u64);

impl From<u64> for StreamId {
    fn from(v: u64) -> Self {
        StreamId(v)
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority classification of a stream.
///
/// Values at or below the assistant threshold form the privileged tier.
/// Above it, a larger value means a higher priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyTier(pub i32);

impl PolicyTier {
    pub const ASSISTANT: PolicyTier = PolicyTier(0);
    pub const MEDIA: PolicyTier = PolicyTier(1);
    pub const VOIP: PolicyTier = PolicyTier(2);
    pub const NOTIFY: PolicyTier = PolicyTier(3);
    pub const EMERGENCY: PolicyTier = PolicyTier(4);

    #[inline]
    pub fn is_assistant(self, threshold: PolicyTier) -> bool {
        self.0 <= threshold.0
    }
}

impl Default for PolicyTier {
    fn default() -> Self {
        PolicyTier::MEDIA
    }
}

/// Identity + priority of a stream, captured by value when a request is admitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub id: StreamId,
    pub tier: PolicyTier,
}

impl StreamDescriptor {
    /// Reported when nobody holds focus.
    pub const BASELINE: StreamDescriptor = StreamDescriptor {
        id: StreamId(0),
        tier: PolicyTier::MEDIA,
    };

    pub fn new(id: impl Into<StreamId>, tier: PolicyTier) -> Self {
        Self { id: id.into(), tier }
    }
}
