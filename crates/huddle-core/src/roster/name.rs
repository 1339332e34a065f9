// Member name normalization and case-insensitive comparison.

use thiserror::Error;

/// Default upper bound on member name length, in characters.
pub const DEFAULT_MAX_NAME_LEN: usize = 20;

/// Why a candidate name was turned away. These are never surfaced to the
/// user as errors; the roster logs them and treats the call as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameRejection {
    #[error("name is empty after trimming")]
    Empty,

    #[error("name is {len} characters long, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("name matches an existing member")]
    Duplicate,
}

/// Constraints applied to names entering the roster through `add` and
/// `rename`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePolicy {
    /// Maximum length in characters. `None` disables the limit.
    pub max_len: Option<usize>,
}

impl Default for NamePolicy {
    fn default() -> Self {
        NamePolicy {
            max_len: Some(DEFAULT_MAX_NAME_LEN),
        }
    }
}

impl NamePolicy {
    pub fn unlimited() -> Self {
        NamePolicy { max_len: None }
    }

    pub fn with_max_len(max_len: usize) -> Self {
        NamePolicy {
            max_len: Some(max_len),
        }
    }

    /// Trim `raw` and check it against the policy. Uniqueness is the
    /// roster's job and is not checked here.
    pub fn normalize<'a>(&self, raw: &'a str) -> Result<&'a str, NameRejection> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(NameRejection::Empty);
        }
        if let Some(max) = self.max_len {
            let len = name.chars().count();
            if len > max {
                return Err(NameRejection::TooLong { len, max });
            }
        }
        Ok(name)
    }
}

/// Fold a name (or query) into the form used for comparisons.
pub fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Two names denote the same member when their lowercase forms match.
pub fn same_name(a: &str, b: &str) -> bool {
    // ASCII fast path, no allocation
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    fold(a) == fold(b)
}
