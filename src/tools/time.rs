use chrono::{DateTime, Utc};
use chrono_tz::{OffsetComponents, Tz};
use serde::{Deserialize, Serialize};

use super::outcome::{ErrorKind, ToolOutcome};

/// Abbreviations users commonly type, mapped to IANA names.
pub const TIMEZONE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("EST", "US/Eastern"),
    ("PST", "US/Pacific"),
    ("CST", "US/Central"),
    ("MST", "US/Mountain"),
    ("GMT", "GMT"),
    ("UTC", "UTC"),
    ("JST", "Asia/Tokyo"),
    ("CET", "Europe/Paris"),
    ("BST", "Europe/London"),
];

pub const TIMEZONE_SAMPLE: [&str; 4] = ["UTC", "US/Eastern", "Europe/London", "Asia/Tokyo"];

#[derive(Debug, Clone, Deserialize)]
pub struct TimeArgs {
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Serialize)]
struct TimeReport {
    current_time: String,
    timezone: String,
    timezone_abbr: String,
    utc_offset: String,
    day_of_week: String,
    is_dst: bool,
}

/// Map an abbreviation to its full name; anything else passes through trimmed.
pub fn resolve_timezone_name(input: &str) -> String {
    let trimmed = input.trim();
    let upper = trimmed.to_uppercase();

    TIMEZONE_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == upper)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

pub fn get_current_time(args: &TimeArgs) -> ToolOutcome {
    current_time_at(&args.timezone, Utc::now())
}

/// Clock-injected core of `get_current_time`.
pub fn current_time_at(timezone: &str, now: DateTime<Utc>) -> ToolOutcome {
    let tz_name = resolve_timezone_name(timezone);

    // Exact IANA spelling first, then any casing ("europe/london")
    let parsed = tz_name
        .parse::<Tz>()
        .or_else(|_| Tz::from_str_insensitive(&tz_name));
    let tz = match parsed {
        Ok(tz) => tz,
        Err(_) => {
            return ToolOutcome::error(
                ErrorKind::UnknownTimezone,
                format!("Unknown timezone: {}", timezone),
            )
            .with_detail("timezone", timezone)
            .with_detail("available_timezones_sample", TIMEZONE_SAMPLE.to_vec());
        }
    };

    let local = now.with_timezone(&tz);

    ToolOutcome::success(&TimeReport {
        current_time: local.format("%Y-%m-%d %H:%M:%S").to_string(),
        timezone: tz.name().to_string(),
        timezone_abbr: local.format("%Z").to_string(),
        utc_offset: local.format("%z").to_string(),
        day_of_week: local.format("%A").to_string(),
        is_dst: local.offset().dst_offset() != chrono::Duration::zero(),
    })
}
