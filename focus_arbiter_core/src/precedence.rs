use crate::stream::PolicyTier;
use crate::stream::StreamDescriptor;

/// Does incoming stream `a` take precedence over queued stream `b`?
///
/// - both assistant-tier: the newcomer always wins, whatever their numeric tiers;
/// - exactly one assistant-tier: the assistant stream wins;
/// - neither: the higher tier wins and equal tiers favor the newcomer.
///
/// The tier split is checked before any numeric comparison. Assistant tiers
/// sit numerically *below* the normal range, so a bare `>=` would rank them last.
#[inline]
pub fn outranks(a: &StreamDescriptor, b: &StreamDescriptor, assistant_threshold: PolicyTier) -> bool {
    let a_assistant = a.tier.is_assistant(assistant_threshold);
    let b_assistant = b.tier.is_assistant(assistant_threshold);

    match (a_assistant, b_assistant) {
        (true, _) => true,
        (false, true) => false,
        (false, false) => a.tier >= b.tier,
    }
}
