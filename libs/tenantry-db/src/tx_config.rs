//! Transaction settings stated without naming `SeaORM` types.

use sea_orm::AccessMode;

/// Settings for one unit of work.
///
/// The default leaves isolation to the backend and opens a read-write
/// transaction. Registry writes rely on unique indexes rather than
/// isolation to settle races, so the default is what they use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxConfig {
    pub read_only: bool,
}

impl TxConfig {
    #[must_use]
    pub fn read_only() -> Self {
        Self { read_only: true }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn sea_access_mode(self) -> Option<AccessMode> {
        self.read_only.then_some(AccessMode::ReadOnly)
    }
}
