//! Session identifier type.

use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;

/// Identifier length used when none is given.
pub const DEFAULT_ID_LENGTH: usize = 10;

/// Shortest allowed identifier length.
pub const MIN_ID_LENGTH: usize = 5;

/// Longest allowed identifier length.
pub const MAX_ID_LENGTH: usize = 100;

/// Compile-time bound check for an identifier length.
///
/// Referencing `IdLength::<LEN>::CHECK` turns an out-of-range `LEN` into a
/// build error at the point where the type is instantiated.
pub(crate) struct IdLength<const LEN: usize>;

impl<const LEN: usize> IdLength<LEN> {
    pub(crate) const CHECK: () = assert!(
        LEN >= MIN_ID_LENGTH && LEN <= MAX_ID_LENGTH,
        "session id length must be within 5..=100"
    );
}

/// Check whether `candidate` is a well-formed identifier of length `LEN`.
///
/// A valid id has exactly `LEN` characters, all ASCII alphanumeric.
pub fn is_valid_id<const LEN: usize>(candidate: &str) -> bool {
    let () = IdLength::<LEN>::CHECK;
    candidate.len() == LEN && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Fixed-length alphanumeric identifier naming a session's backing file.
///
/// Values can only be obtained from [`IdGenerator`](super::IdGenerator) or by
/// parsing, so every `SessionId<LEN>` satisfies [`is_valid_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId<const LEN: usize = DEFAULT_ID_LENGTH>(String);

impl<const LEN: usize> SessionId<LEN> {
    /// Wrap a string the generator has already produced.
    pub(crate) fn from_generated(value: String) -> Self {
        debug_assert!(is_valid_id::<LEN>(&value));
        Self(value)
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl<const LEN: usize> fmt::Display for SessionId<LEN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const LEN: usize> AsRef<str> for SessionId<LEN> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const LEN: usize> FromStr for SessionId<LEN> {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_id::<LEN>(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(SessionError::InvalidId(s.into()))
        }
    }
}
