use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::adapters::text_format::{parse_event_text, parse_station_text};
use crate::domain::model::{
    DataCenter, EventCatalogEntry, EventQuery, StationInventoryEntry, WaveformRequest,
    WaveformStream,
};
use crate::domain::ports::{
    ConfigProvider, EventCatalogService, StationInventoryService, WaveformService,
};
use crate::utils::error::FetchError;

pub const DEFAULT_ETH_URL: &str = "https://eida.ethz.ch";
pub const DEFAULT_IRIS_URL: &str = "https://service.iris.edu";

/// Base URLs of the two data centers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub eth: String,
    pub iris: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            eth: DEFAULT_ETH_URL.to_string(),
            iris: DEFAULT_IRIS_URL.to_string(),
        }
    }
}

impl ServiceEndpoints {
    /// Both data centers served from one base URL, as with a local mock server.
    pub fn single(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            eth: base_url.clone(),
            iris: base_url,
        }
    }

    pub fn base_url(&self, center: DataCenter) -> &str {
        match center {
            DataCenter::Eth => &self.eth,
            DataCenter::Iris => &self.iris,
        }
    }
}

fn fdsn_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Client for the FDSN event, station and dataselect web services.
///
/// Station metadata and waveforms always come from the Swiss data center;
/// events come from whichever center the query names.
#[derive(Debug, Clone)]
pub struct FdsnClient {
    client: Client,
    endpoints: ServiceEndpoints,
}

impl FdsnClient {
    pub fn new(endpoints: ServiceEndpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
        }
    }

    pub fn with_timeout(endpoints: ServiceEndpoints, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoints })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self, FetchError> {
        let endpoints = ServiceEndpoints {
            eth: config.service_url(DataCenter::Eth).to_string(),
            iris: config.service_url(DataCenter::Iris).to_string(),
        };
        Self::with_timeout(endpoints, config.request_timeout())
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    pub fn service_url(&self, center: DataCenter, service: &str) -> String {
        format!(
            "{}/fdsnws/{}/1/query",
            self.endpoints.base_url(center).trim_end_matches('/'),
            service
        )
    }

    /// `Ok(None)` for the "no data" answers (204 and 404).
    async fn get(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Option<reqwest::Response>, FetchError> {
        tracing::debug!("Making FDSN request to: {} {:?}", url, params);
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        tracing::debug!("FDSN response status: {}", status);

        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(Some(response))
    }
}

#[async_trait]
impl EventCatalogService for FdsnClient {
    async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<EventCatalogEntry>, FetchError> {
        let url = self.service_url(query.server, "event");
        let mut params = vec![
            ("starttime", fdsn_time(&query.start_time)),
            ("endtime", fdsn_time(&query.end_time)),
            ("minmagnitude", format!("{:.1}", query.min_magnitude)),
            ("maxmagnitude", format!("{:.1}", query.max_magnitude)),
        ];
        if let Some(bounds) = query.bounding_box {
            params.push(("minlatitude", bounds.south.to_string()));
            params.push(("maxlatitude", bounds.north.to_string()));
            params.push(("minlongitude", bounds.west.to_string()));
            params.push(("maxlongitude", bounds.east.to_string()));
        }
        params.push(("format", "text".to_string()));
        params.push(("nodata", "204".to_string()));

        match self.get(&url, &params).await? {
            Some(response) => {
                let body = response.text().await?;
                let events = parse_event_text(&body)?;
                tracing::debug!("Parsed {} events from {}", events.len(), query.server);
                Ok(events)
            }
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl StationInventoryService for FdsnClient {
    async fn fetch_stations(
        &self,
        network: &str,
        channel: &str,
    ) -> Result<Vec<StationInventoryEntry>, FetchError> {
        let url = self.service_url(DataCenter::Eth, "station");
        let params = [
            ("network", network.to_string()),
            ("station", "*".to_string()),
            ("location", "--".to_string()),
            ("channel", channel.to_string()),
            ("level", "station".to_string()),
            ("format", "text".to_string()),
            ("nodata", "204".to_string()),
        ];

        match self.get(&url, &params).await? {
            Some(response) => parse_station_text(&response.text().await?),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl WaveformService for FdsnClient {
    async fn fetch_waveform(
        &self,
        request: &WaveformRequest,
    ) -> Result<Option<WaveformStream>, FetchError> {
        let url = self.service_url(DataCenter::Eth, "dataselect");
        let params = [
            ("network", request.network.clone()),
            ("station", request.station.clone()),
            ("location", request.location.clone()),
            ("channel", request.channel.clone()),
            ("starttime", fdsn_time(&request.start_time)),
            ("endtime", fdsn_time(&request.end_time)),
            ("nodata", "204".to_string()),
        ];

        let Some(response) = self.get(&url, &params).await? else {
            return Ok(None);
        };
        let payload = response.bytes().await?.to_vec();
        if payload.is_empty() {
            return Ok(None);
        }

        tracing::debug!(
            "Received {} bytes for {}.{}",
            payload.len(),
            request.network,
            request.station
        );
        Ok(Some(WaveformStream {
            network: request.network.clone(),
            station: request.station.clone(),
            channel: request.channel.clone(),
            start_time: request.start_time,
            end_time: request.end_time,
            payload,
        }))
    }
}
