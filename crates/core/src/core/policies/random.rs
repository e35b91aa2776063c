use rand::Rng;
use rand::rngs::StdRng;

/// Uniform slot index in `[0, len)`.
pub(super) fn victim(rng: &mut StdRng, len: usize) -> usize {
    rng.gen_range(0..len)
}
