use crate::domain::model::EventCatalogEntry;

/// Observable progress of the earthquake selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Ready { count: usize },
    FetchFailed,
}

/// Contents of the earthquake selector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EarthquakeList {
    pub status: ListStatus,
    pub events: Vec<EventCatalogEntry>,
    pub lines: Vec<String>,
    pub selected: Option<usize>,
}

impl EarthquakeList {
    pub fn failed() -> Self {
        Self {
            status: ListStatus::FetchFailed,
            ..Self::default()
        }
    }

    /// Replaces the list with `events`, selecting the first one when there is any.
    pub fn from_events(events: Vec<EventCatalogEntry>) -> Self {
        let lines = events.iter().map(EventCatalogEntry::summary_line).collect();
        let selected = if events.is_empty() { None } else { Some(0) };
        Self {
            status: ListStatus::Ready {
                count: events.len(),
            },
            events,
            lines,
            selected,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn selected_event(&self) -> Option<&EventCatalogEntry> {
        self.selected.and_then(|idx| self.events.get(idx))
    }

    pub fn selected_line(&self) -> Option<&str> {
        self.selected
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }
}

/// Selections of one exploration session.
///
/// Handlers in `core::cascade` take a state by reference and hand back a new
/// one; a failed handler leaves the caller's state untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorState {
    pub selected_year: i32,
    pub selected_region: String,
    pub magnitude_choices: Vec<String>,
    pub selected_min_magnitude: String,
    pub selected_station: String,
    pub earthquakes: EarthquakeList,
}

impl SelectorState {
    pub fn selected_earthquake(&self) -> Option<&EventCatalogEntry> {
        self.earthquakes.selected_event()
    }

    /// Station code in front of the display label, e.g. "KSKNZ" for
    /// "KSKNZ, KS Küsnacht".
    pub fn selected_station_code(&self) -> &str {
        self.selected_station
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }
}
