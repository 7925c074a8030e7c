pub mod config;
pub mod paths;

pub use config::{CatalogConfig, Config, PlayerConfig};
pub use paths::PathManager;
