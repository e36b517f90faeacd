pub mod types;

pub use types::{Config, ConfigError, GeometryConfig, GridSizeConfig, InteractionConfig};
