//! Tests for TOML configuration loading.

use chrono::{NaiveTime, Weekday};
use freetime_engine::error::FreeTimeError;
use freetime_engine::Config;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn empty_file_uses_defaults() {
    let config = Config::from_toml_str("").unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.timezone, "UTC");
    assert_eq!(config.calendars, vec!["primary"]);
    assert_eq!(config.scheduling_calendar, "AI Tasks");
    assert!(config.truncate_to_now);

    let options = config.resolve_options();
    assert_eq!(options.travel_buffer_minutes, 10);
    assert_eq!(options.commute_buffer_minutes, 30);
    assert_eq!(options.minimum_slot_minutes, 15);
    assert_eq!(options.prune_threshold_minutes(), 50);
}

#[test]
fn full_file_overrides_everything() {
    let config = Config::from_toml_str(
        r#"
        timezone = "America/New_York"
        truncate_to_now = false
        calendars = ["primary", "team@example.com"]
        scheduling_calendar = "Planned"
        created_entry_ids = ["abc", "def"]

        [buffers]
        travel_minutes = 5
        commute_minutes = 20
        minimum_slot_minutes = 25
        prune_block_minutes = 15

        [work_hours.saturday]
        start = "10:00:00"
        end = "14:00:00"
        "#,
    )
    .unwrap();

    assert_eq!(config.timezone().unwrap(), chrono_tz::America::New_York);
    assert_eq!(config.created_entry_ids, vec!["abc", "def"]);

    let options = config.resolve_options();
    assert!(!options.truncate_to_now);
    assert_eq!(options.travel_buffer_minutes, 5);
    assert_eq!(options.commute_buffer_minutes, 20);
    assert_eq!(options.minimum_slot_minutes, 25);
    assert_eq!(options.prune_threshold_minutes(), 25);

    let template = config.template().unwrap();
    let saturday = template.hours(Weekday::Sat);
    assert_eq!((saturday.start(), saturday.end()), (t(10, 0), t(14, 0)));
    let monday = template.hours(Weekday::Mon);
    assert_eq!((monday.start(), monday.end()), (t(7, 0), t(22, 0)));
}

#[test]
fn partial_buffers_keep_remaining_defaults() {
    let config = Config::from_toml_str("[buffers]\ntravel_minutes = 0\n").unwrap();
    assert_eq!(config.buffers.travel_minutes, 0);
    assert_eq!(config.buffers.commute_minutes, 30);
}

#[test]
fn inverted_work_hours_fail_template_build() {
    let config = Config::from_toml_str(
        r#"
        [work_hours.wednesday]
        start = "18:00:00"
        end = "09:00:00"
        "#,
    )
    .unwrap();

    match config.template() {
        Err(FreeTimeError::InvalidTemplate { weekday, .. }) => assert_eq!(weekday, Weekday::Wed),
        other => panic!("expected InvalidTemplate, got {:?}", other),
    }
}

#[test]
fn unknown_timezone_is_reported() {
    let config = Config::from_toml_str(r#"timezone = "Mars/Olympus_Mons""#).unwrap();
    assert!(matches!(
        config.timezone(),
        Err(FreeTimeError::InvalidTimezone(name)) if name == "Mars/Olympus_Mons"
    ));
}

#[test]
fn malformed_toml_is_a_config_error() {
    assert!(matches!(
        Config::from_toml_str("buffers = 3"),
        Err(FreeTimeError::Config(_))
    ));
}

#[test]
fn load_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("freetime-config-{}.toml", std::process::id()));
    std::fs::write(&path, "scheduling_calendar = \"Focus\"\n").unwrap();

    let config = Config::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.scheduling_calendar, "Focus");
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        Config::load("/nonexistent/freetime.toml"),
        Err(FreeTimeError::Io(_))
    ));
}

#[test]
fn with_created_entries_returns_a_new_value() {
    let base = Config::default();
    let updated = base.with_created_entries(vec!["x".into()]);
    assert!(base.created_entry_ids.is_empty());
    assert_eq!(updated.created_entry_ids, vec!["x"]);
}
