use crate::domain::model::{format_origin_time, Arrival};
use crate::domain::ports::Renderer;
use crate::domain::scene::{
    Artifact, MapBackground, MapScene, Projection, RayFrame, RayPathScene, RecordSection,
    SeismogramReport, StationTrace, TraceData,
};
use crate::utils::error::Result;

pub const MAP_FILE: &str = "map.txt";
pub const SEISMOGRAM_FILE: &str = "seismograms.txt";
pub const SECTION_FILE: &str = "waveform_section.csv";
pub const RAY_PATH_FILE: &str = "ray_paths.txt";

/// Plain-text summaries, plus a CSV table for the record section.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn text_artifact(file_name: &str, lines: Vec<String>) -> Artifact {
    let mut content = lines.join("\n");
    content.push('\n');
    Artifact {
        file_name: file_name.to_string(),
        content,
    }
}

fn arrival_line(wave: &str, station: &str, arrival: &Option<Arrival>) -> String {
    match arrival {
        Some(a) => format!("{} arrival at {}: {:.2} s", a.phase, station, a.time_s),
        None => format!("{} arrival at {}: No prediction available", wave, station),
    }
}

fn station_block(lines: &mut Vec<String>, trace: &StationTrace, network_name: &str) {
    lines.push(format!("== {} ==", trace.title));
    match &trace.data {
        TraceData::Available {
            network,
            channel,
            bytes,
        } => {
            lines.push(format!(
                "Waveforms: {}.{} {} ({} bytes)",
                network, trace.station, channel, bytes
            ));
            lines.push(match trace.distance_km {
                Some(km) => format!(
                    "Distance between the event and the station {}: {:.1} km",
                    trace.station, km
                ),
                None => format!("Station {} is not in the inventory", trace.station),
            });
            lines.push(arrival_line("P", &trace.station, &trace.first_p));
            lines.push(arrival_line("S", &trace.station, &trace.first_s));
        }
        TraceData::NoData => lines.push(format!(
            "No data available for station {} at {}",
            trace.station, network_name
        )),
    }
    lines.push(String::new());
}

impl Renderer for TextRenderer {
    fn render_map(&self, scene: &MapScene) -> Result<Artifact> {
        let projection = match scene.projection {
            Projection::AlbersEqualArea {
                central_longitude,
                central_latitude,
            } => format!(
                "Albers equal area ({:.1} E, {:.1} N)",
                central_longitude, central_latitude
            ),
            Projection::PlateCarree => "Plate carree".to_string(),
        };
        let background = match scene.background {
            MapBackground::Hydrography => "borders, lakes, rivers",
            MapBackground::ShadedRelief => "shaded relief",
        };

        let mut lines = vec![
            scene.title.clone(),
            format!(
                "Projection: {}, extent {:.1}..{:.1} E, {:.1}..{:.1} N, {}",
                projection,
                scene.extent.lon_min,
                scene.extent.lon_max,
                scene.extent.lat_min,
                scene.extent.lat_max,
                background
            ),
            format!(
                "Epicenter: {:.2} E, {:.2} N ({})",
                scene.epicenter_longitude, scene.epicenter_latitude, scene.magnitude_label
            ),
            format!("Stations: {}", scene.stations.len()),
        ];
        lines.extend(scene.stations.iter().map(|station| {
            let marker = if station.selected { "*" } else { " " };
            let name = if station.show_label || station.selected {
                station.code.as_str()
            } else {
                ""
            };
            format!(
                " {} {:>8.3} E {:>7.3} N  {}",
                marker, station.longitude, station.latitude, name
            )
        }));

        Ok(text_artifact(MAP_FILE, lines))
    }

    fn render_seismograms(&self, report: &SeismogramReport) -> Result<Artifact> {
        let event = &report.event;
        let mut lines = vec![
            "Selected earthquake:".to_string(),
            format!("  Location: {:.2} E, {:.2} N", event.longitude, event.latitude),
            format!("  Magnitude: {:.1}", event.magnitude),
            format!("  Depth: {:.1} km", report.depth_km),
            format!("  Origin time: {}", format_origin_time(&event.origin_time)),
            format!("  Region: {}", event.description),
            format!(
                "  Bandpass: {} - {} Hz, window {} to {}",
                report.freq_min,
                report.freq_max,
                format_origin_time(&report.window_start),
                format_origin_time(&report.window_end)
            ),
            String::new(),
        ];

        station_block(&mut lines, &report.school, "Raspberry Shake network");
        match &report.reference {
            Some(reference) => station_block(&mut lines, reference, "Swiss network"),
            None => lines.push(format!(
                "No reference station is paired with {}",
                report.school.station
            )),
        }

        Ok(text_artifact(SEISMOGRAM_FILE, lines))
    }

    fn render_section(&self, section: &RecordSection) -> Result<Artifact> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["label", "network", "distance_km", "p_time_s", "s_time_s"])?;
        for trace in &section.traces {
            writer.write_record([
                trace.label.clone(),
                trace.network.clone(),
                format!("{:.1}", trace.distance_km),
                trace.p_time_s.map(|t| format!("{:.2}", t)).unwrap_or_default(),
                trace.s_time_s.map(|t| format!("{:.2}", t)).unwrap_or_default(),
            ])?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;

        Ok(Artifact {
            file_name: SECTION_FILE.to_string(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    fn render_ray_paths(&self, scene: &RayPathScene) -> Result<Artifact> {
        let frame = match scene.frame {
            RayFrame::Spherical => "spherical",
            RayFrame::Cartesian => "cartesian",
        };
        let mut lines = vec![format!(
            "Ray paths to {} ({} frame): depth {:.1} km, distance {:.2} deg",
            scene.station, frame, scene.source_depth_km, scene.distance_deg
        )];
        if scene.arrivals.is_empty() {
            lines.push("No phases predicted".to_string());
        }
        lines.extend(
            scene
                .arrivals
                .iter()
                .map(|arrival| format!("  {:<6} {:>9.2} s", arrival.phase, arrival.time_s)),
        );

        Ok(text_artifact(RAY_PATH_FILE, lines))
    }
}

/// Console summary of a record section; the CSV goes to storage.
pub fn section_summary(section: &RecordSection) -> String {
    let mut lines = vec![
        section.title.clone(),
        format!("Number of seismograms: {}", section.traces.len()),
    ];
    if section.traces.is_empty() {
        lines.push("No seismograms found for the selected earthquake.".to_string());
    } else {
        lines.extend(
            section
                .traces
                .iter()
                .map(|trace| format!("  {:<10} {:>8.1} km", trace.label, trace.distance_km)),
        );
        if !section.stations_without_data.is_empty() {
            lines.push(format!(
                "Without data: {}",
                section.stations_without_data.join(", ")
            ));
        }
        lines.push(format!(
            "Time axis 0 - {:.0} s{}",
            section.x_limit.1,
            section
                .y_limit
                .map(|(lo, hi)| format!(", distance axis {:.0} - {:.0} km", lo, hi))
                .unwrap_or_default()
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
