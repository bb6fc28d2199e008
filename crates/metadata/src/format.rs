//! Display helpers shared by the detail and listing views.

use chrono::{Datelike, NaiveDate};

use crate::models::{ProviderBlock, ReleaseDates, WatchProviders};

/// Parse the date part of a TMDB date or timestamp (`2010-07-16`, `2010-07-16T00:00:00.000Z`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

/// `148` -> `"2h 28m"`, `45` -> `"45m"`, missing or zero -> `""`.
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes {
        None | Some(0) => String::new(),
        Some(mins) => {
            let (h, m) = (mins / 60, mins % 60);
            if h > 0 {
                format!("{h}h {m}m")
            } else {
                format!("{m}m")
            }
        }
    }
}

/// Year span of a TV run: `"2008–2013"`, `"2019–Present"`, or a single year.
pub fn format_air_dates(first: Option<&str>, last: Option<&str>) -> String {
    let Some(start) = first.and_then(parse_date).map(|d| d.year()) else {
        return String::new();
    };
    match last.and_then(parse_date).map(|d| d.year()) {
        Some(end) if end == start => start.to_string(),
        Some(end) => format!("{start}–{end}"),
        None => format!("{start}–Present"),
    }
}

/// `"July 16, 2010"`, or `"-"` when unknown.
pub fn format_long_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `"Jul 16, 2010"` for list cards, or `"N/A"`.
pub fn format_card_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// First listed release date in `country`, as `M/D/YYYY`.
pub fn release_date_for_country(release_dates: &ReleaseDates, country: &str) -> Option<String> {
    release_dates
        .results
        .iter()
        .find(|r| r.iso_3166_1 == country)
        .and_then(|r| r.release_dates.first())
        .and_then(|rd| rd.release_date.as_deref())
        .and_then(parse_date)
        .map(|d| d.format("%-m/%-d/%Y").to_string())
}

/// Provider block for `country`, falling back to the US block.
pub fn watch_providers_for<'a>(
    providers: &'a WatchProviders,
    country: &str,
) -> Option<&'a ProviderBlock> {
    providers
        .results
        .get(country)
        .or_else(|| providers.results.get("US"))
}

pub fn gender_label(gender: u8) -> &'static str {
    match gender {
        1 => "Female",
        2 => "Male",
        3 => "Non-binary",
        _ => "-",
    }
}
