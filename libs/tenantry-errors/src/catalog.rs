//! Static catalog entries.
//!
//! Each service declares its errors as `const` [`ErrDef`]s so that the code,
//! status and type URL of a failure are fixed in one place.

use http::StatusCode;

use crate::problem::Problem;

/// Base of every problem `type` URL.
pub const TYPE_BASE: &str = "https://errors.tenantry.dev/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: StatusCode,
    pub code: &'static str,
}

impl ErrDef {
    #[must_use]
    pub const fn new(status: StatusCode, code: &'static str) -> Self {
        Self { status, code }
    }

    #[must_use]
    pub fn type_url(&self) -> String {
        format!("{TYPE_BASE}{}", self.code)
    }

    /// Render this entry with an occurrence-specific `detail`.
    pub fn problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(self.status, detail)
            .with_type(self.type_url())
            .with_code(self.code)
    }
}
