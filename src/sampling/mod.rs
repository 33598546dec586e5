//! Random sampling primitives shared by every stage of generation.
//!
//! Nothing here owns a generator: callers pass `&mut impl Rng` so a seeded
//! `ChaCha8Rng` reproduces a whole generation bit for bit.

pub mod gaussian;
pub mod weighted;

pub use gaussian::gaussian;
pub use weighted::{select_element, select_index};

use rand::Rng;

use crate::error::{GenerationError, Result};

/// Pick one element uniformly, failing on an empty slice.
pub fn pick<T: Copy>(items: &[T], what: &str, rng: &mut impl Rng) -> Result<T> {
    if items.is_empty() {
        return Err(GenerationError::invalid(format!("no {what} to choose from")));
    }
    Ok(items[rng.gen_range(0..items.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn pick_covers_all_items() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            seen[pick(&[0usize, 1, 2, 3], "digits", &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn pick_empty_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let empty: [u8; 0] = [];
        assert!(pick(&empty, "keys", &mut rng).is_err());
    }
}
