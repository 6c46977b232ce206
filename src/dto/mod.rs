use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod account;
pub mod health;
pub mod intake;
pub mod round;
pub mod stats;
pub mod validation;

pub(crate) fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
