//! Presentation data handed to a [`Renderer`](crate::domain::ports::Renderer).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::model::{Arrival, EventCatalogEntry, RegionKey};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Projection {
    AlbersEqualArea {
        central_longitude: f64,
        central_latitude: f64,
    },
    PlateCarree,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapExtent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MapBackground {
    /// Borders, lakes and rivers.
    Hydrography,
    ShadedRelief,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMarker {
    pub code: String,
    pub longitude: f64,
    pub latitude: f64,
    pub selected: bool,
    pub show_label: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub region: RegionKey,
    pub projection: Projection,
    pub extent: MapExtent,
    pub background: MapBackground,
    pub epicenter_longitude: f64,
    pub epicenter_latitude: f64,
    pub magnitude_label: String,
    pub title: String,
    pub stations: Vec<StationMarker>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceData {
    Available {
        network: String,
        channel: String,
        bytes: usize,
    },
    NoData,
}

/// One station panel of the three-component seismogram view.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTrace {
    pub title: String,
    pub station: String,
    pub distance_km: Option<f64>,
    pub first_p: Option<Arrival>,
    pub first_s: Option<Arrival>,
    pub data: TraceData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeismogramReport {
    pub event: EventCatalogEntry,
    /// Depth after clamping negative catalog depths to the surface.
    pub depth_km: f64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub freq_min: f64,
    pub freq_max: f64,
    pub school: StationTrace,
    /// `None` when the school has no paired broadband station.
    pub reference: Option<StationTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionTrace {
    pub label: String,
    pub network: String,
    pub distance_km: f64,
    pub p_time_s: Option<f64>,
    pub s_time_s: Option<f64>,
}

/// Travel time against distance, sorted by time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TravelTimeCurve {
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordSection {
    pub title: String,
    pub traces: Vec<SectionTrace>,
    pub stations_without_data: Vec<String>,
    pub p_curve: TravelTimeCurve,
    pub s_curve: TravelTimeCurve,
    pub x_limit: (f64, f64),
    pub y_limit: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RayFrame {
    Spherical,
    Cartesian,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RayPathScene {
    pub frame: RayFrame,
    pub station: String,
    pub source_depth_km: f64,
    pub distance_deg: f64,
    pub arrivals: Vec<Arrival>,
}

/// Rendered output, ready to be shown and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub content: String,
}
