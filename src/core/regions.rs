use crate::domain::model::{Language, Region, RegionKey};
use crate::utils::error::{ExplorerError, Result};

pub static REGIONS: [Region; 3] = [
    Region {
        key: RegionKey::Worldwide,
        max_epicentral_distance_km: 9000.0,
        allowed_min_magnitudes: &["6.0", "6.5", "7.0"],
        bandpass_low_hz: 0.1,
        bandpass_high_hz: 0.8,
        window_start_s: 0.0,
        window_end_s: 80.0 * 60.0,
    },
    Region {
        key: RegionKey::Europe,
        max_epicentral_distance_km: 6000.0,
        allowed_min_magnitudes: &["4.0", "5.0", "6.0"],
        bandpass_low_hz: 0.7,
        bandpass_high_hz: 2.0,
        window_start_s: 0.0,
        window_end_s: 10.0 * 60.0,
    },
    Region {
        key: RegionKey::Switzerland,
        max_epicentral_distance_km: 200.0,
        allowed_min_magnitudes: &["2.0", "2.5", "3.5", "4.0"],
        bandpass_low_hz: 2.0,
        bandpass_high_hz: 20.0,
        window_start_s: 0.0,
        window_end_s: 1.5 * 60.0,
    },
];

/// Region selector labels, in selector order.
pub fn region_labels(language: Language) -> [&'static str; 3] {
    match language {
        Language::En => ["Worldwide", "Europe", "Switzerland"],
        Language::De => ["Weltweit", "Europa", "Schweiz"],
    }
}

/// Lower-cases a region label and translates German labels to the English key.
///
/// Labels that are not translated come back lower-cased, so lookups of
/// unknown regions still fail instead of falling back to a default.
pub fn normalize_region(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    match lowered.as_str() {
        "schweiz" => "switzerland".to_string(),
        "europa" => "europe".to_string(),
        "weltweit" => "worldwide".to_string(),
        _ => lowered,
    }
}

pub fn region_key(name: &str) -> Result<RegionKey> {
    let normalized = normalize_region(name);
    RegionKey::ALL
        .into_iter()
        .find(|key| key.as_str() == normalized)
        .ok_or_else(|| ExplorerError::UnknownRegion {
            name: name.to_string(),
        })
}

pub fn region(key: RegionKey) -> &'static Region {
    match key {
        RegionKey::Worldwide => &REGIONS[0],
        RegionKey::Europe => &REGIONS[1],
        RegionKey::Switzerland => &REGIONS[2],
    }
}

pub fn lookup_region(name: &str) -> Result<&'static Region> {
    region_key(name).map(region)
}

pub fn magnitudes_for_region(name: &str) -> Result<Vec<String>> {
    let region = lookup_region(name)?;
    Ok(region
        .allowed_min_magnitudes
        .iter()
        .map(|m| m.to_string())
        .collect())
}
