pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LocalStorage, TomlConfig};

pub use adapters::fdsn::{FdsnClient, ServiceEndpoints};
pub use adapters::render::TextRenderer;
pub use core::cascade::{CascadeController, RegionChangePolicy};
pub use core::resolver::resolve_parameters;
pub use core::session::Session;
pub use core::travel_time::{ConstantVelocityModel, Iasp91Model};
pub use domain::selector::{EarthquakeList, ListStatus, SelectorState};
pub use utils::error::{ExplorerError, FetchError, Result};
