use crate::core::regions::{region, region_key};
use crate::domain::model::{BoundingBox, DataCenter, QueryParameters, RegionKey};
use crate::utils::error::{ExplorerError, Result};

/// Upper magnitude bound sent with every catalog query.
pub const MAX_MAGNITUDE: f64 = 10.0;

/// The global aggregator is queried with this box for the European scale.
pub const EUROPE_BOUNDS: BoundingBox = BoundingBox {
    south: 38.0,
    north: 70.0,
    west: -15.0,
    east: 30.0,
};

/// Years for which the catalogs are queried.
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 9999;

/// Projects the three selector values onto the full query parameter set.
///
/// Pure: the same inputs always give the same parameters. Fails with
/// [`ExplorerError::UnknownRegion`] for labels outside the region catalog and
/// with [`ExplorerError::InvalidMagnitude`] for non-numeric magnitudes.
/// Years outside `MIN_YEAR..=MAX_YEAR` give [`ExplorerError::InvalidYear`].
pub fn resolve_parameters(region_name: &str, year: i32, min_magnitude: &str) -> Result<QueryParameters> {
    let key = region_key(region_name)?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ExplorerError::InvalidYear { year });
    }
    let entry = region(key);

    let min_magnitude = parse_magnitude(min_magnitude)?;

    let (server_endpoint, bounding_box) = match key {
        RegionKey::Switzerland => (DataCenter::Eth, None),
        RegionKey::Europe => (DataCenter::Iris, Some(EUROPE_BOUNDS)),
        RegionKey::Worldwide => (DataCenter::Iris, None),
    };

    tracing::debug!(
        region = key.as_str(),
        year,
        min_magnitude,
        server = %server_endpoint,
        "Resolved query parameters"
    );

    Ok(QueryParameters {
        server_endpoint,
        region: key,
        year,
        min_magnitude,
        max_magnitude: MAX_MAGNITUDE,
        max_distance_km: entry.max_epicentral_distance_km,
        bounding_box,
        freq_min: entry.bandpass_low_hz,
        freq_max: entry.bandpass_high_hz,
        time_window_start: entry.window_start_s,
        time_window_end: entry.window_end_s,
    })
}

fn parse_magnitude(value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite())
        .ok_or_else(|| ExplorerError::InvalidMagnitude {
            value: value.to_string(),
        })
}
