//! # freetime-engine
//!
//! Deterministic free-time resolution for task-scheduling assistants.
//!
//! Given weekly work hours and the busy events from a user's calendars, the
//! engine works out which windows are actually free over the next few days,
//! then trims them for travel and commute time and drops windows too short to
//! be useful. The result is handed to an external scheduling assistant whose
//! proposals can be screened and written back through narrow collaborator traits.
//!
//! ## Modules
//!
//! - [`resolver`] — work hours + busy events → free slots per day
//! - [`interval`] — non-empty half-open intervals
//! - [`template`] — weekly work-hours template
//! - [`busy`] — provider busy events and their validation
//! - [`clock`] — quarter-hour rounding, "now" truncation, timestamp parsing
//! - [`tasks`] — task candidates and priority ranking
//! - [`prompt`] — text rendering for the assistant
//! - [`proposal`] — assistant output parsing, conflicts, screening
//! - [`provider`] — calendar / task store / assistant traits
//! - [`planner`] — a full auto-scheduling run over the traits
//! - [`config`] — TOML configuration
//! - [`error`] — Error types

pub mod busy;
pub mod clock;
pub mod config;
pub mod error;
pub mod interval;
pub mod planner;
pub mod prompt;
pub mod proposal;
pub mod provider;
pub mod resolver;
pub mod tasks;
pub mod template;

pub use busy::{normalize_events, BusyEvent, RawBusyEvent};
pub use clock::round_up_to_quarter_hour;
pub use config::Config;
pub use error::FreeTimeError;
pub use interval::Interval;
pub use planner::{FailedWrite, PlanReport, Planner};
pub use proposal::{find_conflicts, parse_scheduled_items, ScheduledItem};
pub use resolver::{resolve, FreeTime, FreeTimeDay, ResolveOptions};
pub use tasks::{rank, TaskCandidate};
pub use template::WeeklyTemplate;
