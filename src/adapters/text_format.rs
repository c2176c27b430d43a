//! Parsers for the pipe-separated `format=text` responses of FDSN web services.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::domain::model::{EventCatalogEntry, StationInventoryEntry};
use crate::utils::error::FetchError;

// EventID|Time|Latitude|Longitude|Depth/km|Author|Catalog|Contributor|ContributorID|MagType|Magnitude|MagAuthor|EventLocationName
const EVENT_MIN_COLUMNS: usize = 11;
// Network|Station|Latitude|Longitude|Elevation|SiteName|StartTime|EndTime
const STATION_MIN_COLUMNS: usize = 6;

pub fn parse_fdsn_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim().trim_end_matches('Z');
    if value.is_empty() {
        return None;
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn records(body: &str) -> impl Iterator<Item = Result<StringRecord, csv::Error>> + '_ {
    ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(body.as_bytes())
        .into_records()
}

fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

fn field<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or_default()
}

fn number(record: &StringRecord, idx: usize, name: &str) -> Result<f64, FetchError> {
    let raw = field(record, idx);
    raw.parse::<f64>().map_err(|_| FetchError::Malformed {
        line: line_of(record),
        reason: format!("{} '{}' is not a number", name, raw),
    })
}

fn time(record: &StringRecord, idx: usize, name: &str) -> Result<DateTime<Utc>, FetchError> {
    let raw = field(record, idx);
    parse_fdsn_time(raw).ok_or_else(|| FetchError::Malformed {
        line: line_of(record),
        reason: format!("{} '{}' is not a timestamp", name, raw),
    })
}

/// Events without a magnitude are skipped; other malformed rows fail the whole response.
pub fn parse_event_text(body: &str) -> Result<Vec<EventCatalogEntry>, FetchError> {
    let mut events = Vec::new();
    for record in records(body) {
        let record = record?;
        if record.len() < EVENT_MIN_COLUMNS {
            return Err(FetchError::Malformed {
                line: line_of(&record),
                reason: format!(
                    "expected at least {} columns, found {}",
                    EVENT_MIN_COLUMNS,
                    record.len()
                ),
            });
        }

        if field(&record, 10).is_empty() {
            tracing::debug!("Skipping event {} without magnitude", field(&record, 0));
            continue;
        }

        let depth_km = if field(&record, 4).is_empty() {
            0.0
        } else {
            number(&record, 4, "Depth")?
        };

        events.push(EventCatalogEntry {
            event_id: field(&record, 0).to_string(),
            origin_time: time(&record, 1, "Time")?,
            latitude: number(&record, 2, "Latitude")?,
            longitude: number(&record, 3, "Longitude")?,
            depth_km,
            magnitude: number(&record, 10, "Magnitude")?,
            magnitude_type: field(&record, 9).to_string(),
            description: field(&record, 12).to_string(),
        });
    }
    Ok(events)
}

pub fn parse_station_text(body: &str) -> Result<Vec<StationInventoryEntry>, FetchError> {
    let mut stations = Vec::new();
    for record in records(body) {
        let record = record?;
        if record.len() < STATION_MIN_COLUMNS {
            return Err(FetchError::Malformed {
                line: line_of(&record),
                reason: format!(
                    "expected at least {} columns, found {}",
                    STATION_MIN_COLUMNS,
                    record.len()
                ),
            });
        }

        let elevation_m = if field(&record, 4).is_empty() {
            0.0
        } else {
            number(&record, 4, "Elevation")?
        };

        stations.push(StationInventoryEntry {
            network: field(&record, 0).to_string(),
            station: field(&record, 1).to_string(),
            latitude: number(&record, 2, "Latitude")?,
            longitude: number(&record, 3, "Longitude")?,
            elevation_m,
            site_name: field(&record, 5).to_string(),
            start_time: parse_fdsn_time(field(&record, 6)),
            end_time: parse_fdsn_time(field(&record, 7)),
        });
    }
    Ok(stations)
}
