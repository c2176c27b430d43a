// Domain layer: models, selector state, presentation scenes and ports.

pub mod model;
pub mod ports;
pub mod scene;
pub mod selector;
