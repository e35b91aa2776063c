use super::Slot;

/// Earliest installed slot; the lowest index wins a tie.
pub(super) fn victim<S: Slot>(slots: &[S]) -> usize {
    let mut victim = 0;
    let mut first_in = u64::MAX;
    for (i, slot) in slots.iter().enumerate() {
        if slot.loaded_at() < first_in {
            first_in = slot.loaded_at();
            victim = i;
        }
    }
    victim
}
