pub mod audio;
pub mod config;
pub mod journey;
pub mod loader;
pub mod map;
pub mod pipeline;
pub mod scroll;
pub mod store;

/// Application name for XDG paths
pub const APP_NAME: &str = "cartolog";

/// Journey data file name at the root of a data source
pub const JOURNEY_FILE: &str = "journey.json";
