//! Execution context handle.
//!
//! Compilation only needs an identity to stamp onto compiled plans; the
//! connection layer that executes statements and substitutes query-id
//! placeholders lives outside this crate and receives the handle with the
//! plan.

use std::fmt;

use ulid::Ulid;

/// Handle to the execution context a compiled plan belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: Ulid,
}

impl Session {
    /// Create a new session handle.
    pub fn new() -> Self {
        Self { id: Ulid::new() }
    }

    /// The session's unique id.
    pub fn id(&self) -> Ulid {
        self.id
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_distinct() {
        assert_ne!(Session::new().id(), Session::new().id());
    }
}
