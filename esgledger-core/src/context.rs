//! Ambient execution context: who is performing the operation.
//!
//! The store stamps `created_by` / `updated_by` from this value. The hosting
//! environment owns identity; the library only carries it.

/// Identity of the acting user for audit columns and logbook lines.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    /// Resolve the identity from the OS account, with a fixed fallback so
    /// audit columns are never empty.
    pub fn ambient() -> Self {
        Self {
            user: whoami::fallible::username().unwrap_or_else(|_| "operator".into()),
        }
    }
}
