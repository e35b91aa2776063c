use super::Slot;

/// Second-chance sweep.
///
/// Slots under the hand with the reference bit set get the bit cleared and
/// are skipped. The first slot found with a clear bit is the victim and the
/// hand stops just past it. The first lap clears every bit it passes, so
/// the sweep ends within two laps.
pub(super) fn victim<S: Slot>(hand: &mut usize, slots: &mut [S]) -> usize {
    let len = slots.len();
    let mut inspected = 0;
    loop {
        let idx = *hand % len;
        *hand = (idx + 1) % len;
        if !slots[idx].referenced() {
            return idx;
        }
        slots[idx].clear_reference();
        inspected += 1;
        debug_assert!(inspected <= len, "clock sweep passed a full lap");
    }
}
