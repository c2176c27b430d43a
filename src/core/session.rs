use chrono::{DateTime, Duration, Utc};
use tokio::sync::OnceCell;

use crate::core::geodesy::{epicentral_distance_km, km_to_degrees};
use crate::core::resolver::resolve_parameters;
use crate::core::stations;
use crate::core::travel_time::{first_arrival, P_PHASES, RAY_PATH_PHASES, S_PHASES};
use crate::domain::model::{
    format_origin_time, EventCatalogEntry, QueryParameters, RegionKey, StationInventoryEntry,
    WaveformRequest, WaveformStream,
};
use crate::domain::ports::{StationInventoryService, TravelTimePredictor, WaveformService};
use crate::domain::scene::{
    MapBackground, MapExtent, MapScene, Projection, RayFrame, RayPathScene, RecordSection,
    SectionTrace, SeismogramReport, StationMarker, StationTrace, TraceData, TravelTimeCurve,
};
use crate::domain::selector::SelectorState;
use crate::utils::error::{ExplorerError, Result};

pub const SCHOOL_NETWORK: &str = "S";
pub const REFERENCE_NETWORK: &str = "CH";

/// Extra data requested on both sides of the display window.
const WAVEFORM_PADDING_S: f64 = 60.0;

/// Margin added beyond the farthest station in the record section.
const SECTION_DISTANCE_MARGIN_KM: f64 = 50.0;

/// Networks and channels tried, in order, when downloading a station.
const WAVEFORM_SOURCES: [(&str, &str); 2] = [(SCHOOL_NETWORK, "EH*"), (REFERENCE_NETWORK, "HH*")];

/// Vertical channels listed in the session inventory.
const INVENTORY_SOURCES: [(&str, &str); 2] = [(REFERENCE_NETWORK, "HHZ"), (SCHOOL_NETWORK, "EHZ")];

/// Builds the presentation data for the currently selected earthquake.
///
/// The station inventory is queried on first use and kept for the lifetime
/// of the session.
pub struct Session<S, W, T>
where
    S: StationInventoryService,
    W: WaveformService,
    T: TravelTimePredictor,
{
    stations: S,
    waveforms: W,
    travel_times: T,
    inventory: OnceCell<Vec<StationInventoryEntry>>,
}

impl<S, W, T> Session<S, W, T>
where
    S: StationInventoryService,
    W: WaveformService,
    T: TravelTimePredictor,
{
    pub fn new(stations: S, waveforms: W, travel_times: T) -> Self {
        Self {
            stations,
            waveforms,
            travel_times,
            inventory: OnceCell::new(),
        }
    }

    /// Operating vertical-component stations of the reference and school networks.
    pub async fn inventory(&self) -> Result<&[StationInventoryEntry]> {
        let inventory = self
            .inventory
            .get_or_try_init(|| self.query_stations())
            .await?;
        Ok(inventory.as_slice())
    }

    async fn query_stations(&self) -> Result<Vec<StationInventoryEntry>> {
        let now = Utc::now();
        let mut combined = Vec::new();
        for (network, channel) in INVENTORY_SOURCES {
            let entries = self.stations.fetch_stations(network, channel).await?;
            let before = entries.len();
            combined.extend(entries.into_iter().filter(|e| e.is_operating_at(now)));
            tracing::debug!(network, channel, listed = before, "Fetched station inventory");
        }
        tracing::info!("Station inventory cached with {} stations", combined.len());
        Ok(combined)
    }

    pub async fn network_inventory(&self, network: &str) -> Result<Vec<&StationInventoryEntry>> {
        Ok(self
            .inventory()
            .await?
            .iter()
            .filter(|e| e.network == network)
            .collect())
    }

    pub async fn find_inventory_station(&self, code: &str) -> Result<Option<&StationInventoryEntry>> {
        Ok(self
            .inventory()
            .await?
            .iter()
            .find(|e| e.station.eq_ignore_ascii_case(code)))
    }

    pub async fn map_scene(&self, state: &SelectorState) -> Result<MapScene> {
        let (event, params) = selection(state)?;
        let selected_code = state.selected_station_code();
        let show_label = params.region == RegionKey::Switzerland;

        let (projection, extent, background) = match params.region {
            RegionKey::Switzerland => (
                Projection::AlbersEqualArea {
                    central_longitude: 8.5,
                    central_latitude: 46.5,
                },
                MapExtent {
                    lon_min: 5.5,
                    lon_max: 11.0,
                    lat_min: 45.5,
                    lat_max: 48.0,
                },
                MapBackground::Hydrography,
            ),
            RegionKey::Europe => (
                Projection::PlateCarree,
                MapExtent {
                    lon_min: -15.0,
                    lon_max: 45.0,
                    lat_min: 30.0,
                    lat_max: 70.0,
                },
                MapBackground::ShadedRelief,
            ),
            RegionKey::Worldwide => (
                Projection::PlateCarree,
                MapExtent {
                    lon_min: -180.0,
                    lon_max: 180.0,
                    lat_min: -90.0,
                    lat_max: 90.0,
                },
                MapBackground::ShadedRelief,
            ),
        };

        let stations = self
            .network_inventory(SCHOOL_NETWORK)
            .await?
            .into_iter()
            .map(|s| StationMarker {
                code: s.station.clone(),
                longitude: s.longitude,
                latitude: s.latitude,
                selected: s.station == selected_code,
                show_label,
            })
            .collect();

        Ok(MapScene {
            region: params.region,
            projection,
            extent,
            background,
            epicenter_longitude: event.longitude,
            epicenter_latitude: event.latitude,
            magnitude_label: format!("M{:.1}", event.magnitude),
            title: format!(
                "{}, Depth: {:.1} km",
                event.origin_time.format("%Y-%m-%d %H:%M:%S"),
                event.depth_km
            ),
            stations,
        })
    }

    /// Three-component view for the selected school and its paired broadband station.
    pub async fn seismogram_report(&self, state: &SelectorState) -> Result<SeismogramReport> {
        let (event, params) = selection(state)?;
        let depth_km = surface_clamped_depth(event);
        let (window_start, window_end) = display_window(event, &params);

        let school_code = state.selected_station_code();
        stations::find_station(school_code)?;

        let school = self
            .station_trace(
                format!("Raspberry Shake {}", school_code),
                school_code,
                event,
                depth_km,
                window_start,
                window_end,
            )
            .await?;

        let reference = match stations::nearest_reference_station(school_code) {
            Some(code) => Some(
                self.station_trace(
                    format!("SED {}", code),
                    code,
                    event,
                    depth_km,
                    window_start,
                    window_end,
                )
                .await?,
            ),
            None => None,
        };

        Ok(SeismogramReport {
            event: event.clone(),
            depth_km,
            window_start,
            window_end,
            freq_min: params.freq_min,
            freq_max: params.freq_max,
            school,
            reference,
        })
    }

    async fn station_trace(
        &self,
        title: String,
        code: &str,
        event: &EventCatalogEntry,
        depth_km: f64,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<StationTrace> {
        let distance_km = self.find_inventory_station(code).await?.map(|s| {
            epicentral_distance_km(event.latitude, event.longitude, s.latitude, s.longitude)
        });

        let (first_p, first_s) = match distance_km {
            Some(km) => {
                let deg = km_to_degrees(km);
                (
                    first_arrival(&self.travel_times, depth_km, deg, &P_PHASES),
                    first_arrival(&self.travel_times, depth_km, deg, &S_PHASES),
                )
            }
            None => (None, None),
        };

        let data = match self.fetch_station_waveform(code, window_start, window_end).await {
            Some(stream) => TraceData::Available {
                network: stream.network,
                channel: stream.channel,
                bytes: stream.payload.len(),
            },
            None => TraceData::NoData,
        };

        Ok(StationTrace {
            title,
            station: code.to_string(),
            distance_km,
            first_p,
            first_s,
            data,
        })
    }

    /// Vertical traces of every school station against epicentral distance.
    pub async fn record_section(&self, state: &SelectorState) -> Result<RecordSection> {
        let (event, params) = selection(state)?;
        let depth_km = surface_clamped_depth(event);
        let (window_start, window_end) = display_window(event, &params);

        let school_stations = self.network_inventory(SCHOOL_NETWORK).await?;
        let total = school_stations.len();
        let mut traces = Vec::new();
        let mut stations_without_data = Vec::new();

        for (idx, station) in school_stations.into_iter().enumerate() {
            tracing::debug!(
                "{}.{} --- Progress: {:.2}%",
                station.network,
                station.station,
                (idx + 1) as f64 / total as f64 * 100.0
            );

            let label = format!("{}.{}", station.network, station.station);
            if self
                .fetch_station_waveform(&station.station, window_start, window_end)
                .await
                .is_none()
            {
                stations_without_data.push(label);
                continue;
            }

            let distance_km = epicentral_distance_km(
                event.latitude,
                event.longitude,
                station.latitude,
                station.longitude,
            );
            let deg = km_to_degrees(distance_km);
            traces.push(SectionTrace {
                label,
                network: station.network.clone(),
                distance_km,
                p_time_s: first_arrival(&self.travel_times, depth_km, deg, &P_PHASES)
                    .map(|a| a.time_s),
                s_time_s: first_arrival(&self.travel_times, depth_km, deg, &S_PHASES)
                    .map(|a| a.time_s),
            });
        }

        tracing::info!("Number of seismograms: {}", traces.len());

        let max_distance = traces
            .iter()
            .map(|t| t.distance_km)
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |m| m.max(d))));

        let (p_curve, s_curve, y_limit) = match max_distance {
            Some(max) => {
                let far = max + SECTION_DISTANCE_MARGIN_KM;
                let mut distances: Vec<f64> = traces.iter().map(|t| t.distance_km).collect();
                distances.push(far);
                let y_limit = (params.region == RegionKey::Switzerland).then_some((0.0, far));
                (
                    self.travel_time_curve(depth_km, &distances, &P_PHASES),
                    self.travel_time_curve(depth_km, &distances, &S_PHASES),
                    y_limit,
                )
            }
            None => (TravelTimeCurve::default(), TravelTimeCurve::default(), None),
        };

        Ok(RecordSection {
            title: format!(
                "{} (M{:.1}, Z= {:.1} km)",
                format_origin_time(&event.origin_time),
                event.magnitude,
                depth_km
            ),
            traces,
            stations_without_data,
            p_curve,
            s_curve,
            x_limit: (0.0, params.time_window_end),
            y_limit,
        })
    }

    fn travel_time_curve(&self, depth_km: f64, distances: &[f64], phases: &[&str]) -> TravelTimeCurve {
        let mut points: Vec<(f64, f64)> = distances
            .iter()
            .filter_map(|&d| {
                first_arrival(&self.travel_times, depth_km, km_to_degrees(d), phases)
                    .map(|a| (a.time_s, d))
            })
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        TravelTimeCurve { points }
    }

    /// Ray paths between the selected earthquake and the selected school station.
    pub async fn ray_paths(&self, state: &SelectorState) -> Result<RayPathScene> {
        let (event, params) = selection(state)?;
        let code = state.selected_station_code();
        let station = self
            .find_inventory_station(code)
            .await?
            .ok_or_else(|| ExplorerError::UnknownStation {
                code: code.to_string(),
            })?;

        let distance_deg = km_to_degrees(epicentral_distance_km(
            event.latitude,
            event.longitude,
            station.latitude,
            station.longitude,
        ));
        // rays cannot start above the surface
        let source_depth_km = if event.depth_km < 0.0 { 1.0 } else { event.depth_km };
        let frame = if params.region == RegionKey::Worldwide {
            RayFrame::Spherical
        } else {
            RayFrame::Cartesian
        };

        Ok(RayPathScene {
            frame,
            station: station.station.clone(),
            source_depth_km,
            distance_deg,
            arrivals: self
                .travel_times
                .predict_arrivals(source_depth_km, distance_deg, &RAY_PATH_PHASES),
        })
    }

    /// Tries the school network first, then the broadband network. Failures
    /// count as missing data.
    async fn fetch_station_waveform(
        &self,
        code: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<WaveformStream> {
        let padding = Duration::milliseconds((WAVEFORM_PADDING_S * 1000.0) as i64);
        for (network, channel) in WAVEFORM_SOURCES {
            let request = WaveformRequest {
                network: network.to_string(),
                station: code.to_string(),
                location: "*".to_string(),
                channel: channel.to_string(),
                start_time: start - padding,
                end_time: end + padding,
            };
            match self.waveforms.fetch_waveform(&request).await {
                Ok(Some(stream)) => return Some(stream),
                Ok(None) => {
                    tracing::debug!("No data for {}.{} {}", network, code, channel);
                }
                Err(e) => {
                    tracing::warn!("Waveform request for {}.{} failed: {}", network, code, e);
                }
            }
        }
        None
    }
}

fn selection(state: &SelectorState) -> Result<(&EventCatalogEntry, QueryParameters)> {
    let event = state
        .selected_earthquake()
        .ok_or(ExplorerError::NoEarthquakeSelected)?;
    let params = resolve_parameters(
        &state.selected_region,
        state.selected_year,
        &state.selected_min_magnitude,
    )?;
    Ok((event, params))
}

fn surface_clamped_depth(event: &EventCatalogEntry) -> f64 {
    if event.depth_km < 0.0 {
        tracing::info!("The depth is negative at {}, setting it to 0 km", event.depth_km);
        0.0
    } else {
        event.depth_km
    }
}

fn display_window(event: &EventCatalogEntry, params: &QueryParameters) -> (DateTime<Utc>, DateTime<Utc>) {
    let offset = |seconds: f64| Duration::milliseconds((seconds * 1000.0).round() as i64);
    (
        event.origin_time + offset(params.time_window_start),
        event.origin_time + offset(params.time_window_end),
    )
}
