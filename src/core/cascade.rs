use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::core::regions::{magnitudes_for_region, region_labels};
use crate::core::resolver::resolve_parameters;
use crate::core::stations;
use crate::domain::model::Language;
use crate::domain::ports::EventCatalogService;
use crate::domain::selector::{EarthquakeList, ListStatus, SelectorState};
use crate::utils::error::{ExplorerError, Result};

/// First year offered by the year selector.
pub const DEFAULT_START_YEAR: i32 = 2023;

/// What a region change does to the earthquake list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RegionChangePolicy {
    /// Only the magnitude choices are refreshed.
    ResetOnly,
    /// The magnitude reset is followed by the magnitude-change requery.
    #[default]
    Requery,
}

/// Years offered by the year selector, from `start_year` to the current year.
pub fn available_years(start_year: i32) -> Vec<i32> {
    (start_year..=Utc::now().year()).collect()
}

/// Dependent-selector state machine: year and magnitude changes requery the
/// earthquake catalog, region changes refresh the magnitude choices.
pub struct CascadeController<E: EventCatalogService> {
    catalog: E,
    policy: RegionChangePolicy,
    status: watch::Sender<ListStatus>,
}

impl<E: EventCatalogService> CascadeController<E> {
    pub fn new(catalog: E) -> Self {
        let (status, _) = watch::channel(ListStatus::Idle);
        Self {
            catalog,
            policy: RegionChangePolicy::default(),
            status,
        }
    }

    pub fn with_policy(mut self, policy: RegionChangePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RegionChangePolicy {
        self.policy
    }

    /// Follows the earthquake list through `Loading` to `Ready`/`FetchFailed`.
    pub fn subscribe(&self) -> watch::Receiver<ListStatus> {
        self.status.subscribe()
    }

    /// Selector state before any catalog query: first region label of
    /// `language`, its first magnitude and the first school station.
    pub fn blank_state(&self, language: Language, year: i32) -> SelectorState {
        let region = region_labels(language)[0];
        let magnitude_choices = magnitudes_for_region(region).unwrap_or_default();
        let selected_min_magnitude = magnitude_choices.first().cloned().unwrap_or_default();
        SelectorState {
            selected_year: year,
            selected_region: region.to_string(),
            magnitude_choices,
            selected_min_magnitude,
            selected_station: stations::default_station().display_label.to_string(),
            earthquakes: EarthquakeList::default(),
        }
    }

    /// Blank state followed by the initial earthquake fill.
    pub async fn initial_state(&self, language: Language, year: i32) -> Result<SelectorState> {
        let state = self.blank_state(language, year);
        let magnitude = state.selected_min_magnitude.clone();
        self.on_magnitude_changed(&state, &magnitude).await
    }

    /// Resets the magnitude choices to the catalog list of `region` and selects
    /// the first one. Does not touch the earthquake list.
    pub fn on_region_changed(&self, state: &SelectorState, region: &str) -> Result<SelectorState> {
        let magnitude_choices = magnitudes_for_region(region)?;
        let selected_min_magnitude = magnitude_choices
            .first()
            .cloned()
            .ok_or_else(|| ExplorerError::UnknownRegion {
                name: region.to_string(),
            })?;

        tracing::debug!(region, magnitude = %selected_min_magnitude, "Region changed");

        Ok(SelectorState {
            selected_region: region.to_string(),
            magnitude_choices,
            selected_min_magnitude,
            ..state.clone()
        })
    }

    /// Region change followed by the configured [`RegionChangePolicy`].
    pub async fn select_region(&self, state: &SelectorState, region: &str) -> Result<SelectorState> {
        let changed = self.on_region_changed(state, region)?;
        match self.policy {
            RegionChangePolicy::ResetOnly => Ok(changed),
            RegionChangePolicy::Requery => {
                let magnitude = changed.selected_min_magnitude.clone();
                self.on_magnitude_changed(&changed, &magnitude).await
            }
        }
    }

    pub async fn on_year_changed(&self, state: &SelectorState, year: i32) -> Result<SelectorState> {
        tracing::debug!(year, "Year changed");
        let next = SelectorState {
            selected_year: year,
            ..state.clone()
        };
        self.refresh_earthquakes(next).await
    }

    pub async fn on_magnitude_changed(
        &self,
        state: &SelectorState,
        magnitude: &str,
    ) -> Result<SelectorState> {
        if !state.magnitude_choices.iter().any(|m| m == magnitude) {
            return Err(ExplorerError::InvalidMagnitude {
                value: magnitude.to_string(),
            });
        }
        tracing::debug!(magnitude, "Magnitude changed");
        let next = SelectorState {
            selected_min_magnitude: magnitude.to_string(),
            ..state.clone()
        };
        self.refresh_earthquakes(next).await
    }

    /// Selects a school station by code or display label.
    pub fn on_station_selected(&self, state: &SelectorState, station: &str) -> Result<SelectorState> {
        let record = stations::find_station(station)?;
        Ok(SelectorState {
            selected_station: record.display_label.to_string(),
            ..state.clone()
        })
    }

    pub fn on_earthquake_selected(&self, state: &SelectorState, index: usize) -> Result<SelectorState> {
        if index >= state.earthquakes.events.len() {
            return Err(ExplorerError::NoEarthquakeSelected);
        }
        let mut next = state.clone();
        next.earthquakes.selected = Some(index);
        Ok(next)
    }

    async fn refresh_earthquakes(&self, mut state: SelectorState) -> Result<SelectorState> {
        let params = resolve_parameters(
            &state.selected_region,
            state.selected_year,
            &state.selected_min_magnitude,
        )?;

        self.status.send_replace(ListStatus::Loading);

        let list = match self.catalog.fetch_events(&params.event_query()).await {
            Ok(events) => {
                tracing::info!(
                    count = events.len(),
                    region = params.region_name(),
                    year = params.year,
                    server = %params.server_endpoint,
                    "Earthquake list updated"
                );
                EarthquakeList::from_events(events)
            }
            Err(e) => {
                tracing::warn!("Catalog query failed, showing no earthquakes: {}", e);
                EarthquakeList::failed()
            }
        };

        self.status.send_replace(list.status);
        state.earthquakes = list;
        Ok(state)
    }
}
