pub mod error;
pub mod gateway;
pub mod ports;
pub mod registry;
pub mod repos;
pub(crate) mod validation;

use time::OffsetDateTime;

/// Current UTC time truncated to microseconds, the finest precision every
/// supported backend stores.
pub(crate) fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_microsecond(now.microsecond()).unwrap_or(now)
}
