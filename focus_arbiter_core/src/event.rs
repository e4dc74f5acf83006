use serde::{Deserialize, Serialize};

/// Notification delivered to a listener when focus changes hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusChange {
    Gain,
    GainTransient,
    Loss,
    LossTransient,
}

impl FocusChange {
    #[inline]
    pub fn gain(transient: bool) -> Self {
        if transient { FocusChange::GainTransient } else { FocusChange::Gain }
    }

    #[inline]
    pub fn loss(transient: bool) -> Self {
        if transient { FocusChange::LossTransient } else { FocusChange::Loss }
    }

    pub fn is_gain(self) -> bool {
        matches!(self, FocusChange::Gain | FocusChange::GainTransient)
    }

    pub fn is_transient(self) -> bool {
        matches!(self, FocusChange::GainTransient | FocusChange::LossTransient)
    }

    /// Stable integer code used across the C boundary.
    pub fn code(self) -> i32 {
        match self {
            FocusChange::Gain => 1,
            FocusChange::GainTransient => 2,
            FocusChange::Loss => 3,
            FocusChange::LossTransient => 4,
        }
    }
}

/// Successful outcome of a focus request.
///
/// `Delayed` is not an error: the request is queued and will receive a
/// `Gain` notification once everything ahead of it is abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusGrant {
    Granted,
    Delayed,
}

impl FocusGrant {
    pub fn is_granted(self) -> bool {
        self == FocusGrant::Granted
    }
}
