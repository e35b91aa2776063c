use super::Slot;

/// Least recently touched slot; the lowest index wins a tie.
pub(super) fn victim<S: Slot>(slots: &[S]) -> usize {
    let mut victim = 0;
    let mut oldest = u64::MAX;
    for (i, slot) in slots.iter().enumerate() {
        if slot.recency() < oldest {
            oldest = slot.recency();
            victim = i;
        }
    }
    victim
}
