//! Random session id generation.

use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::id::{IdLength, SessionId};
use crate::error::SessionError;

/// Alphabets ids are drawn from. Each holds the same 62 characters in a
/// different order.
const CHARSETS: [&[u8; 62]; 4] = [
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789abcdefghijklmnopqrstuvwxyz",
    b"AaBbCcDdEeFfGgHhIiJjKkLlMmNnOoPpQqRrSsTtUuVvWwXxYyZz9876543210",
];

/// Number of charsets taking part in rotation.
const ROTATION: usize = 3;

/// Process-wide generator, seeded on first use.
static SHARED: OnceLock<Mutex<IdGenerator>> = OnceLock::new();

/// Generator for random alphanumeric session ids.
///
/// Successive calls rotate through the charsets so that consecutive ids do
/// not share the same character layout. The randomness is not
/// cryptographically secure; collisions are handled by the caller.
#[derive(Debug)]
pub struct IdGenerator {
    rng: StdRng,
    charset_index: usize,
}

impl IdGenerator {
    /// Create a generator seeded from the wall clock.
    pub fn new() -> Self {
        Self::from_seed(clock_seed())
    }

    /// Create a generator with a fixed seed.
    ///
    /// Two generators with the same seed produce the same sequence of ids.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            charset_index: 0,
        }
    }

    /// Start the rotation at `index` (taken modulo the rotation length).
    pub fn with_charset_index(mut self, index: usize) -> Self {
        self.charset_index = index % ROTATION;
        self
    }

    /// Index of the charset the next id will be drawn from.
    pub fn charset_index(&self) -> usize {
        self.charset_index
    }

    /// Generate an id of length `LEN` and advance the rotation.
    pub fn generate<const LEN: usize>(&mut self) -> SessionId<LEN> {
        let () = IdLength::<LEN>::CHECK;

        let charset = CHARSETS[self.charset_index];
        let id: String = (0..LEN)
            .map(|_| charset[self.rng.random_range(0..charset.len())] as char)
            .collect();

        self.charset_index = (self.charset_index + 1) % ROTATION;
        SessionId::from_generated(id)
    }

    /// Lock the process-wide generator, seeding it on first access.
    pub fn shared() -> crate::Result<MutexGuard<'static, IdGenerator>> {
        SHARED
            .get_or_init(|| Mutex::new(IdGenerator::new()))
            .lock()
            .map_err(|_| SessionError::LockPoisoned)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::id::is_valid_id;
    use std::collections::HashSet;

    #[test]
    fn test_charsets_are_alphanumeric_permutations() {
        let reference: HashSet<u8> = CHARSETS[0].iter().copied().collect();
        assert_eq!(reference.len(), 62);
        for set in CHARSETS {
            assert!(set.iter().all(|b| b.is_ascii_alphanumeric()));
            let chars: HashSet<u8> = set.iter().copied().collect();
            assert_eq!(chars, reference);
        }
    }

    #[test]
    fn test_default_length() {
        let mut gen = IdGenerator::from_seed(7);
        for _ in 0..100 {
            let id: SessionId = gen.generate();
            assert_eq!(id.as_str().len(), 10);
            assert!(is_valid_id::<10>(id.as_str()));
        }
    }

    #[test]
    fn test_bounds_lengths() {
        let mut gen = IdGenerator::from_seed(11);
        let short = gen.generate::<5>();
        assert_eq!(short.as_str().len(), 5);
        assert!(is_valid_id::<5>(short.as_str()));

        let long = gen.generate::<100>();
        assert_eq!(long.as_str().len(), 100);
        assert!(is_valid_id::<100>(long.as_str()));
    }

    #[test]
    fn test_rotation_cycles_three_sets() {
        let mut gen = IdGenerator::from_seed(1);
        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(gen.charset_index());
            gen.generate::<10>();
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_with_charset_index() {
        let gen = IdGenerator::from_seed(1).with_charset_index(2);
        assert_eq!(gen.charset_index(), 2);

        let gen = IdGenerator::from_seed(1).with_charset_index(4);
        assert_eq!(gen.charset_index(), 1);
    }

    #[test]
    fn test_same_seed_same_ids() {
        let mut a = IdGenerator::from_seed(42);
        let mut b = IdGenerator::from_seed(42);
        for _ in 0..10 {
            assert_eq!(a.generate::<10>(), b.generate::<10>());
        }
    }

    #[test]
    fn test_ids_vary() {
        let mut gen = IdGenerator::from_seed(3);
        let ids: HashSet<SessionId> = (0..1_000).map(|_| gen.generate()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn test_shared_generator() {
        let first: SessionId = IdGenerator::shared().unwrap().generate();
        let second: SessionId = IdGenerator::shared().unwrap().generate();
        assert!(is_valid_id::<10>(first.as_str()));
        assert_ne!(first, second);
    }
}
