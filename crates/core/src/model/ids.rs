use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a simulado (quiz set), assigned by the backend.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimuladoId(String);

impl SimuladoId {
    /// Creates a new `SimuladoId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stable 32-bit identifier for a question, derived from its statement text.
///
/// Question sets may be edited between sessions, so array positions are not a
/// reliable cross-session reference; the statement hash is. Collisions are an
/// accepted risk.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionHash(i32);

impl QuestionHash {
    /// Hashes a question statement.
    ///
    /// `h = h * 31 + codepoint(c)` over the statement's characters, with
    /// wrapping 32-bit signed arithmetic. The empty string hashes to 0.
    #[must_use]
    pub fn of(text: &str) -> Self {
        let mut hash: i32 = 0;
        for c in text.chars() {
            // Unicode scalar values fit in 21 bits, so the cast is lossless.
            #[allow(clippy::cast_possible_wrap)]
            let code = c as u32 as i32;
            hash = hash.wrapping_mul(31).wrapping_add(code);
        }
        Self(hash)
    }

    /// Wraps an already-computed hash value (e.g. read back from storage).
    #[must_use]
    pub fn from_raw(value: i32) -> Self {
        Self(value)
    }

    /// Returns the underlying i32 value
    #[must_use]
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Debug for SimuladoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimuladoId({})", self.0)
    }
}

impl fmt::Display for SimuladoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for QuestionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionHash({})", self.0)
    }
}

impl fmt::Display for QuestionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
