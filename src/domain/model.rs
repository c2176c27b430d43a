use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ExplorerError;

/// Canonical region keys. Display labels in every supported language
/// normalize to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKey {
    Worldwide,
    Europe,
    Switzerland,
}

impl RegionKey {
    pub const ALL: [RegionKey; 3] = [RegionKey::Worldwide, RegionKey::Europe, RegionKey::Switzerland];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionKey::Worldwide => "worldwide",
            RegionKey::Europe => "europe",
            RegionKey::Switzerland => "switzerland",
        }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query and display parameters for one region scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub key: RegionKey,
    pub max_epicentral_distance_km: f64,
    pub allowed_min_magnitudes: &'static [&'static str],
    pub bandpass_low_hz: f64,
    pub bandpass_high_hz: f64,
    pub window_start_s: f64,
    pub window_end_s: f64,
}

impl Region {
    pub fn name(&self) -> &'static str {
        self.key.as_str()
    }
}

/// One school seismometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationRecord {
    pub local_code: &'static str,
    pub serial: &'static str,
    /// Empty when no broadband station is paired with this school.
    pub nearest_reference_station_code: &'static str,
    pub display_label: &'static str,
}

impl StationRecord {
    pub fn nearest_reference(&self) -> Option<&'static str> {
        if self.nearest_reference_station_code.is_empty() {
            None
        } else {
            Some(self.nearest_reference_station_code)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataCenter {
    /// Swiss Seismological Service at ETH Zurich.
    Eth,
    /// Global aggregator.
    Iris,
}

impl fmt::Display for DataCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataCenter::Eth => f.write_str("ETH"),
            DataCenter::Iris => f.write_str("IRIS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

/// Everything needed to query and present one (region, year, magnitude) selection.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    pub server_endpoint: DataCenter,
    pub region: RegionKey,
    pub year: i32,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub max_distance_km: f64,
    pub bounding_box: Option<BoundingBox>,
    pub freq_min: f64,
    pub freq_max: f64,
    pub time_window_start: f64,
    pub time_window_end: f64,
}

impl QueryParameters {
    pub fn region_name(&self) -> &'static str {
        self.region.as_str()
    }

    /// First second of the selected year.
    pub fn start_time(&self) -> DateTime<Utc> {
        year_start(self.year)
    }

    /// Last second of the selected year.
    pub fn end_time(&self) -> DateTime<Utc> {
        year_start(self.year.saturating_add(1)) - Duration::seconds(1)
    }

    pub fn event_query(&self) -> EventQuery {
        EventQuery {
            server: self.server_endpoint,
            start_time: self.start_time(),
            end_time: self.end_time(),
            min_magnitude: self.min_magnitude,
            max_magnitude: self.max_magnitude,
            bounding_box: self.bounding_box,
        }
    }
}

fn year_start(year: i32) -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub server: DataCenter,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub bounding_box: Option<BoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCatalogEntry {
    pub event_id: String,
    pub origin_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    pub magnitude: f64,
    pub magnitude_type: String,
    pub description: String,
}

impl EventCatalogEntry {
    /// Line shown in the earthquake selector.
    pub fn summary_line(&self) -> String {
        format!(
            "Magnitude {:.1}    {}    {}",
            self.magnitude,
            format_origin_time(&self.origin_time),
            self.description
        )
    }
}

pub fn format_origin_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInventoryEntry {
    pub network: String,
    pub station: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub site_name: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl StationInventoryEntry {
    pub fn is_operating_at(&self, time: DateTime<Utc>) -> bool {
        let started = self.start_time.map_or(true, |start| start <= time);
        let not_closed = self.end_time.map_or(true, |end| end > time);
        started && not_closed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveformRequest {
    pub network: String,
    pub station: String,
    pub location: String,
    pub channel: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Raw dataselect payload for one request window.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformStream {
    pub network: String,
    pub station: String,
    pub channel: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrival {
    pub phase: String,
    pub time_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Language {
    #[default]
    En,
    De,
}

impl FromStr for Language {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "de" => Ok(Language::De),
            other => Err(ExplorerError::UnsupportedLanguage {
                language: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(magnitude: f64, description: &str) -> EventCatalogEntry {
        EventCatalogEntry {
            event_id: "smi:ch.ethz.sed/sc20a/Event/2024abcd".to_string(),
            origin_time: Utc.with_ymd_and_hms(2024, 3, 5, 12, 1, 2).unwrap(),
            latitude: 46.3,
            longitude: 7.5,
            depth_km: 5.0,
            magnitude,
            magnitude_type: "MLhc".to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_summary_line_rounds_magnitude_to_one_decimal() {
        let line = event(3.46, "SIERRE VS").summary_line();
        assert_eq!(line, "Magnitude 3.5    2024-03-05T12:01:02.000000Z    SIERRE VS");
    }

    #[test]
    fn test_year_span_covers_whole_calendar_year() {
        let params = QueryParameters {
            server_endpoint: DataCenter::Eth,
            region: RegionKey::Switzerland,
            year: 2024,
            min_magnitude: 2.0,
            max_magnitude: 10.0,
            max_distance_km: 200.0,
            bounding_box: None,
            freq_min: 2.0,
            freq_max: 20.0,
            time_window_start: 0.0,
            time_window_end: 90.0,
        };
        assert_eq!(params.start_time(), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(params.end_time(), Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_station_operating_window() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut entry = StationInventoryEntry {
            network: "S".to_string(),
            station: "KSKNZ".to_string(),
            latitude: 47.3,
            longitude: 8.6,
            elevation_m: 430.0,
            site_name: "KS Kuesnacht".to_string(),
            start_time: Some(Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap()),
            end_time: None,
        };
        assert!(entry.is_operating_at(now));

        entry.end_time = Some(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
        assert!(!entry.is_operating_at(now));
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("DE".parse::<Language>().unwrap(), Language::De);
        assert!(matches!(
            "fr".parse::<Language>(),
            Err(ExplorerError::UnsupportedLanguage { .. })
        ));
    }
}
