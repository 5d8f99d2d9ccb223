//! Error types for freetime-engine operations.

use chrono::{NaiveTime, Weekday};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreeTimeError {
    /// A weekly work-hours entry does not start before it ends.
    #[error("Invalid work hours for {weekday}: start {start} is not before end {end}")]
    InvalidTemplate {
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    },

    /// The horizon is empty, too long, or runs past the last representable date.
    #[error(
        "Invalid horizon: {0} days (must be 1 to {max} days within the calendar range)",
        max = crate::resolver::MAX_HORIZON_DAYS
    )]
    InvalidHorizon(u32),

    /// A busy event is missing a bound, has an unparseable bound, or ends before it starts.
    /// `index` is the event's position in the input batch.
    #[error("Malformed busy event #{index}: {reason}")]
    MalformedBusyEvent { index: usize, reason: String },

    /// A scheduled item proposed by the assistant could not be accepted.
    #[error("Malformed proposal #{index}: {reason}")]
    MalformedProposal { index: usize, reason: String },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An external collaborator (calendar, task store, assistant) failed.
    #[error("{service} error: {message}")]
    Collaborator { service: String, message: String },
}

pub type Result<T> = std::result::Result<T, FreeTimeError>;
