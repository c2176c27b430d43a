pub mod cascade;
pub mod geodesy;
pub mod regions;
pub mod resolver;
pub mod session;
pub mod stations;
pub mod travel_time;

pub use crate::domain::model::{EventCatalogEntry, QueryParameters, Region, StationRecord};
pub use crate::domain::ports::{
    ConfigProvider, EventCatalogService, Renderer, StationInventoryService, Storage,
    TravelTimePredictor, WaveformService,
};
pub use crate::domain::selector::{EarthquakeList, ListStatus, SelectorState};
pub use crate::utils::error::Result;
