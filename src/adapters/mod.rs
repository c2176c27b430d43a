// Adapters layer: concrete implementations of the domain ports (FDSN web
// services, text rendering).

pub mod fdsn;
pub mod render;
pub mod text_format;
