//! TOML-based configuration.
//!
//! Holds everything a resolution or planning run needs:
//! - work hours per weekday
//! - travel, commute and minimum-slot minutes
//! - the user's time zone
//! - which calendars count as busy and where new entries go
//!
//! A `Config` is a plain value. Changing a setting means building a new one;
//! nothing here is global.

use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{FreeTimeError, Result};
use crate::resolver::ResolveOptions;
use crate::template::{DayHours, WeeklyTemplate};

/// Buffer and slot-length settings, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferConfig {
    #[serde(default = "default_travel")]
    pub travel_minutes: u32,
    #[serde(default = "default_commute")]
    pub commute_minutes: u32,
    #[serde(default = "default_minimum_slot")]
    pub minimum_slot_minutes: u32,
    #[serde(default = "default_prune_block")]
    pub prune_block_minutes: u32,
}

/// Work hours per weekday. Missing days use 07:00–22:00.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHoursConfig {
    #[serde(default)]
    pub sunday: DayHours,
    #[serde(default)]
    pub monday: DayHours,
    #[serde(default)]
    pub tuesday: DayHours,
    #[serde(default)]
    pub wednesday: DayHours,
    #[serde(default)]
    pub thursday: DayHours,
    #[serde(default)]
    pub friday: DayHours,
    #[serde(default)]
    pub saturday: DayHours,
}

impl WorkHoursConfig {
    /// Entries in template order, Sunday first.
    pub fn as_array(&self) -> [DayHours; 7] {
        [
            self.sunday,
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone the user lives in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_true")]
    pub truncate_to_now: bool,
    /// Calendars whose events count as busy.
    #[serde(default = "default_calendars")]
    pub calendars: Vec<String>,
    /// Calendar that receives scheduled tasks.
    #[serde(default = "default_scheduling_calendar")]
    pub scheduling_calendar: String,
    /// Entries created by the last planning run, cleared before the next one.
    #[serde(default)]
    pub created_entry_ids: Vec<String>,
    #[serde(default)]
    pub buffers: BufferConfig,
    #[serde(default)]
    pub work_hours: WorkHoursConfig,
}

fn default_travel() -> u32 {
    10
}
fn default_commute() -> u32 {
    30
}
fn default_minimum_slot() -> u32 {
    15
}
fn default_prune_block() -> u32 {
    30
}
fn default_true() -> bool {
    true
}
fn default_timezone() -> String {
    "UTC".into()
}
fn default_calendars() -> Vec<String> {
    vec!["primary".into()]
}
fn default_scheduling_calendar() -> String {
    "AI Tasks".into()
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            travel_minutes: default_travel(),
            commute_minutes: default_commute(),
            minimum_slot_minutes: default_minimum_slot(),
            prune_block_minutes: default_prune_block(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            truncate_to_now: true,
            calendars: default_calendars(),
            scheduling_calendar: default_scheduling_calendar(),
            created_entry_ids: Vec::new(),
            buffers: BufferConfig::default(),
            work_hours: WorkHoursConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Build the validated weekly template from `work_hours`.
    pub fn template(&self) -> Result<WeeklyTemplate> {
        WeeklyTemplate::new(self.work_hours.as_array())
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            minimum_slot_minutes: self.buffers.minimum_slot_minutes,
            travel_buffer_minutes: self.buffers.travel_minutes,
            commute_buffer_minutes: self.buffers.commute_minutes,
            prune_block_minutes: self.buffers.prune_block_minutes,
            truncate_to_now: self.truncate_to_now,
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| FreeTimeError::InvalidTimezone(self.timezone.clone()))
    }

    /// A copy of this config recording the entries a planning run created.
    pub fn with_created_entries(&self, ids: Vec<String>) -> Self {
        Self {
            created_entry_ids: ids,
            ..self.clone()
        }
    }
}
