use crate::domain::model::{
    Arrival, DataCenter, EventCatalogEntry, EventQuery, Language, StationInventoryEntry,
    WaveformRequest, WaveformStream,
};
use crate::domain::scene::{Artifact, MapScene, RayPathScene, RecordSection, SeismogramReport};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn service_url(&self, center: DataCenter) -> &str;
    fn request_timeout(&self) -> Duration;
    fn output_path(&self) -> &str;
    fn language(&self) -> Language;
    fn start_year(&self) -> i32;
}

#[async_trait]
pub trait EventCatalogService: Send + Sync {
    async fn fetch_events(
        &self,
        query: &EventQuery,
    ) -> std::result::Result<Vec<EventCatalogEntry>, FetchError>;
}

#[async_trait]
pub trait StationInventoryService: Send + Sync {
    async fn fetch_stations(
        &self,
        network: &str,
        channel: &str,
    ) -> std::result::Result<Vec<StationInventoryEntry>, FetchError>;
}

#[async_trait]
pub trait WaveformService: Send + Sync {
    /// `Ok(None)` when the service has no data for the request window.
    async fn fetch_waveform(
        &self,
        request: &WaveformRequest,
    ) -> std::result::Result<Option<WaveformStream>, FetchError>;
}

pub trait TravelTimePredictor: Send + Sync {
    /// Arrivals of the requested phases that the model can produce, sorted by time.
    fn predict_arrivals(&self, source_depth_km: f64, distance_deg: f64, phases: &[&str])
        -> Vec<Arrival>;
}

pub trait Renderer {
    fn render_map(&self, scene: &MapScene) -> Result<Artifact>;
    fn render_seismograms(&self, report: &SeismogramReport) -> Result<Artifact>;
    fn render_section(&self, section: &RecordSection) -> Result<Artifact>;
    fn render_ray_paths(&self, scene: &RayPathScene) -> Result<Artifact>;
}
