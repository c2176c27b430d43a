use crate::core::geodesy::KM_PER_DEGREE;
use crate::domain::model::Arrival;
use crate::domain::ports::TravelTimePredictor;

/// Phases searched for the first compressional arrival.
pub const P_PHASES: [&str; 7] = ["p", "Pg", "Pn", "PmP", "P", "PP", "Pdiff"];

/// Phases searched for the first shear arrival.
pub const S_PHASES: [&str; 7] = ["s", "Sg", "Sn", "SmS", "S", "SS", "Sdiff"];

/// Phases drawn in the ray-path view.
pub const RAY_PATH_PHASES: [&str; 6] = ["p", "P", "PP", "s", "S", "SS"];

pub const VP_KM_S: f64 = 5.8;
pub const VS_KM_S: f64 = 3.4;

/// Homogeneous half-space with straight rays.
///
/// Only direct phases exist in such a medium; refracted, reflected and
/// diffracted phase names are skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantVelocityModel {
    pub vp_km_s: f64,
    pub vs_km_s: f64,
}

impl Default for ConstantVelocityModel {
    fn default() -> Self {
        Self {
            vp_km_s: VP_KM_S,
            vs_km_s: VS_KM_S,
        }
    }
}

impl ConstantVelocityModel {
    fn velocity_for(&self, phase: &str) -> Option<f64> {
        match phase {
            "p" | "P" | "Pg" => Some(self.vp_km_s),
            "s" | "S" | "Sg" => Some(self.vs_km_s),
            _ => None,
        }
    }
}

impl TravelTimePredictor for ConstantVelocityModel {
    fn predict_arrivals(&self, source_depth_km: f64, distance_deg: f64, phases: &[&str]) -> Vec<Arrival> {
        let epicentral_km = distance_deg * KM_PER_DEGREE;
        let depth_km = source_depth_km.max(0.0);
        let path_km = epicentral_km.hypot(depth_km);

        let mut arrivals: Vec<Arrival> = phases
            .iter()
            .filter_map(|phase| {
                self.velocity_for(phase).map(|v| Arrival {
                    phase: phase.to_string(),
                    time_s: path_km / v,
                })
            })
            .collect();

        arrivals.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
        arrivals
    }
}

/// Distances up to which the half-space is used.
pub const LOCAL_LIMIT_DEG: f64 = 2.0;

/// Surface-focus iasp91 P times (degrees, seconds).
const IASP91_P: [(f64, f64); 21] = [
    (2.0, 38.3),
    (5.0, 76.0),
    (10.0, 142.0),
    (15.0, 206.0),
    (20.0, 275.0),
    (25.0, 327.0),
    (30.0, 372.0),
    (35.0, 415.0),
    (40.0, 456.0),
    (45.0, 494.0),
    (50.0, 531.0),
    (55.0, 567.0),
    (60.0, 600.0),
    (65.0, 632.0),
    (70.0, 663.0),
    (75.0, 692.0),
    (80.0, 722.0),
    (85.0, 750.0),
    (90.0, 776.0),
    (95.0, 800.0),
    (100.0, 823.0),
];

/// Surface-focus iasp91 S times (degrees, seconds).
const IASP91_S: [(f64, f64); 21] = [
    (2.0, 65.3),
    (5.0, 135.0),
    (10.0, 246.0),
    (15.0, 358.0),
    (20.0, 465.0),
    (25.0, 560.0),
    (30.0, 650.0),
    (35.0, 730.0),
    (40.0, 808.0),
    (45.0, 880.0),
    (50.0, 950.0),
    (55.0, 1015.0),
    (60.0, 1078.0),
    (65.0, 1137.0),
    (70.0, 1195.0),
    (75.0, 1250.0),
    (80.0, 1303.0),
    (85.0, 1353.0),
    (90.0, 1400.0),
    (95.0, 1445.0),
    (100.0, 1485.0),
];

/// Core-diffracted slowness beyond the end of the direct-wave tables (s/deg).
const PDIFF_SLOWNESS: f64 = 4.43;
const SDIFF_SLOWNESS: f64 = 8.32;

/// Last distance for which diffracted phases are predicted.
const DIFFRACTED_LIMIT_DEG: f64 = 150.0;

/// Linear interpolation in a table sorted by distance; `None` outside it.
fn interpolate(table: &[(f64, f64)], distance_deg: f64) -> Option<f64> {
    let (first, last) = (table.first()?, table.last()?);
    if distance_deg < first.0 || distance_deg > last.0 {
        return None;
    }
    table.windows(2).find_map(|pair| {
        let ((d0, t0), (d1, t1)) = (pair[0], pair[1]);
        (distance_deg >= d0 && distance_deg <= d1)
            .then(|| t0 + (t1 - t0) * (distance_deg - d0) / (d1 - d0))
    })
}

/// Time of a phase that is diffracted along the core beyond the table end.
fn diffracted(table: &[(f64, f64)], slowness: f64, distance_deg: f64) -> Option<f64> {
    let &(end, time) = table.last()?;
    (distance_deg > end && distance_deg <= DIFFRACTED_LIMIT_DEG)
        .then(|| time + slowness * (distance_deg - end))
}

/// Straight rays in a half-space for local distances, surface-focus iasp91
/// tables beyond [`LOCAL_LIMIT_DEG`].
///
/// Teleseismic times ignore the source depth. Surface reflections (`PP`,
/// `SS`) are two legs of half the distance each.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Iasp91Model {
    pub local: ConstantVelocityModel,
}

impl Iasp91Model {
    fn teleseismic_time(&self, phase: &str, distance_deg: f64) -> Option<f64> {
        match phase {
            "P" => interpolate(&IASP91_P, distance_deg),
            "S" => interpolate(&IASP91_S, distance_deg),
            "PP" => interpolate(&IASP91_P, distance_deg / 2.0).map(|t| 2.0 * t),
            "SS" => interpolate(&IASP91_S, distance_deg / 2.0).map(|t| 2.0 * t),
            "Pdiff" => diffracted(&IASP91_P, PDIFF_SLOWNESS, distance_deg),
            "Sdiff" => diffracted(&IASP91_S, SDIFF_SLOWNESS, distance_deg),
            _ => None,
        }
    }
}

impl TravelTimePredictor for Iasp91Model {
    fn predict_arrivals(&self, source_depth_km: f64, distance_deg: f64, phases: &[&str]) -> Vec<Arrival> {
        if distance_deg <= LOCAL_LIMIT_DEG {
            return self.local.predict_arrivals(source_depth_km, distance_deg, phases);
        }

        let mut arrivals: Vec<Arrival> = phases
            .iter()
            .filter_map(|phase| {
                self.teleseismic_time(phase, distance_deg).map(|time_s| Arrival {
                    phase: phase.to_string(),
                    time_s,
                })
            })
            .collect();

        arrivals.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
        arrivals
    }
}

/// Earliest arrival among `phases`, if the model predicts any.
pub fn first_arrival<T: TravelTimePredictor + ?Sized>(
    model: &T,
    source_depth_km: f64,
    distance_deg: f64,
    phases: &[&str],
) -> Option<Arrival> {
    model
        .predict_arrivals(source_depth_km, distance_deg, phases)
        .into_iter()
        .next()
}
