use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub grid: GridSizeConfig,
    pub geometry: GeometryConfig,
    pub interaction: InteractionConfig,
}

/// Initial grid dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSizeConfig {
    pub rows: usize,
    pub columns: usize,
}

/// Tile sizes and spacing, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryConfig {
    pub tile_height_px: u32,
    pub tile_width_px: u32,
    pub vertical_spacing_px: u32,
    pub horizontal_spacing_px: u32,
    pub min_tile_height_px: u32,
    pub min_tile_width_px: u32,
}

/// Gesture toggles and thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    pub drag_and_drop: bool,
    pub resizing: bool,
    pub resize_margin_px: u32,
    pub drag_threshold_px: u32,
}

/// Errors that can occur during config loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}

// ── Serde intermediate structs ──────────────────────────────────────────

#[derive(Deserialize, Serialize, Default)]
#[serde(default)]
struct RawConfig {
    grid: RawGridConfig,
    geometry: RawGeometryConfig,
    interaction: RawInteractionConfig,
}

#[derive(Deserialize, Serialize)]
#[serde(default)]
struct RawGridConfig {
    rows: usize,
    columns: usize,
}

impl Default for RawGridConfig {
    fn default() -> Self {
        let d = GridSizeConfig::default();
        Self {
            rows: d.rows,
            columns: d.columns,
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(default)]
struct RawGeometryConfig {
    tile_height_px: u32,
    tile_width_px: u32,
    vertical_spacing_px: u32,
    horizontal_spacing_px: u32,
    min_tile_height_px: u32,
    min_tile_width_px: u32,
}

impl Default for RawGeometryConfig {
    fn default() -> Self {
        let d = GeometryConfig::default();
        Self {
            tile_height_px: d.tile_height_px,
            tile_width_px: d.tile_width_px,
            vertical_spacing_px: d.vertical_spacing_px,
            horizontal_spacing_px: d.horizontal_spacing_px,
            min_tile_height_px: d.min_tile_height_px,
            min_tile_width_px: d.min_tile_width_px,
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(default)]
struct RawInteractionConfig {
    drag_and_drop: bool,
    resizing: bool,
    resize_margin_px: u32,
    drag_threshold_px: u32,
}

impl Default for RawInteractionConfig {
    fn default() -> Self {
        let d = InteractionConfig::default();
        Self {
            drag_and_drop: d.drag_and_drop,
            resizing: d.resizing,
            resize_margin_px: d.resize_margin_px,
            drag_threshold_px: d.drag_threshold_px,
        }
    }
}

// ── Default impls ───────────────────────────────────────────────────────

impl Default for GridSizeConfig {
    fn default() -> Self {
        Self { rows: 6, columns: 5 }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            tile_height_px: 100,
            tile_width_px: 150,
            vertical_spacing_px: 5,
            horizontal_spacing_px: 5,
            min_tile_height_px: 100,
            min_tile_width_px: 150,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_and_drop: true,
            resizing: true,
            resize_margin_px: 5,
            drag_threshold_px: 3,
        }
    }
}

// ── Config implementation ───────────────────────────────────────────────

impl Config {
    /// Load config from a TOML file path. Returns defaults if file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    /// Parse a TOML string into a Config.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let config = Self::from_raw(raw);
        config.validate()?;
        Ok(config)
    }

    /// Validate the config, returning an error if any values are out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.rows == 0 || self.grid.columns == 0 {
            return Err(ConfigError::Validation("grid rows and columns must be > 0".to_string()));
        }

        let g = &self.geometry;
        if g.tile_height_px == 0 || g.tile_width_px == 0 {
            return Err(ConfigError::Validation("tile sizes must be > 0".to_string()));
        }

        if self.interaction.resize_margin_px == 0 {
            return Err(ConfigError::Validation("resize_margin_px must be > 0".to_string()));
        }

        // A margin covering half the tile leaves no interior to grab.
        let narrowest = g
            .tile_height_px
            .max(g.min_tile_height_px)
            .min(g.tile_width_px.max(g.min_tile_width_px));
        if u64::from(self.interaction.resize_margin_px) * 2 >= u64::from(narrowest) {
            return Err(ConfigError::Validation(format!(
                "resize_margin_px ({}) must be less than half the smallest tile side ({narrowest})",
                self.interaction.resize_margin_px
            )));
        }

        Ok(())
    }

    /// The default configuration rendered as TOML.
    pub fn print_default() -> String {
        match toml::to_string_pretty(&RawConfig::default()) {
            Ok(rendered) => rendered,
            Err(e) => {
                log::warn!("Failed to render default config: {e}");
                String::new()
            }
        }
    }

    fn from_raw(raw: RawConfig) -> Self {
        Self {
            grid: GridSizeConfig {
                rows: raw.grid.rows,
                columns: raw.grid.columns,
            },
            geometry: GeometryConfig {
                tile_height_px: raw.geometry.tile_height_px,
                tile_width_px: raw.geometry.tile_width_px,
                vertical_spacing_px: raw.geometry.vertical_spacing_px,
                horizontal_spacing_px: raw.geometry.horizontal_spacing_px,
                min_tile_height_px: raw.geometry.min_tile_height_px,
                min_tile_width_px: raw.geometry.min_tile_width_px,
            },
            interaction: InteractionConfig {
                drag_and_drop: raw.interaction.drag_and_drop,
                resizing: raw.interaction.resizing,
                resize_margin_px: raw.interaction.resize_margin_px,
                drag_threshold_px: raw.interaction.drag_threshold_px,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // ── Default tests ───────────────────────────────────────────────

    #[test]
    fn default_grid_size() {
        let config = Config::default();
        assert_eq!(config.grid.rows, 6);
        assert_eq!(config.grid.columns, 5);
    }

    #[test]
    fn default_geometry() {
        let config = Config::default();
        assert_eq!(config.geometry.tile_height_px, 100);
        assert_eq!(config.geometry.tile_width_px, 150);
        assert_eq!(config.geometry.vertical_spacing_px, 5);
        assert_eq!(config.geometry.horizontal_spacing_px, 5);
    }

    #[test]
    fn default_interaction_enables_everything() {
        let config = Config::default();
        assert!(config.interaction.drag_and_drop);
        assert!(config.interaction.resizing);
    }

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    // ── Parsing tests ───────────────────────────────────────────────

    #[test]
    fn parse_complete_toml() {
        let toml = r#"
[grid]
rows = 3
columns = 4

[geometry]
tile_height_px = 80
tile_width_px = 120
vertical_spacing_px = 2
horizontal_spacing_px = 4
min_tile_height_px = 40
min_tile_width_px = 60

[interaction]
drag_and_drop = false
resizing = true
resize_margin_px = 8
drag_threshold_px = 6
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.grid.rows, 3);
        assert_eq!(config.grid.columns, 4);
        assert_eq!(config.geometry.tile_width_px, 120);
        assert_eq!(config.geometry.min_tile_height_px, 40);
        assert!(!config.interaction.drag_and_drop);
        assert_eq!(config.interaction.resize_margin_px, 8);
        assert_eq!(config.interaction.drag_threshold_px, 6);
    }

    #[test]
    fn parse_partial_toml_uses_defaults() {
        let config = Config::from_toml("[grid]\nrows = 2\n").unwrap();
        assert_eq!(config.grid.rows, 2);
        assert_eq!(config.grid.columns, 5);
        assert_eq!(config.geometry, GeometryConfig::default());
    }

    #[test]
    fn parse_empty_toml_uses_all_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn parse_unknown_keys_ignored() {
        let config = Config::from_toml("[grid]\nrows = 2\nshape = \"hex\"\n\n[colors]\ntheme = \"x\"\n").unwrap();
        assert_eq!(config.grid.rows, 2);
    }

    #[test]
    fn parse_wrong_type_is_parse_error() {
        let result = Config::from_toml("[grid]\nrows = \"many\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    // ── Validation tests ────────────────────────────────────────────

    #[test]
    fn invalid_zero_rows() {
        let result = Config::from_toml("[grid]\nrows = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_zero_tile_width() {
        let result = Config::from_toml("[geometry]\ntile_width_px = 0\nmin_tile_width_px = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_zero_resize_margin() {
        let result = Config::from_toml("[interaction]\nresize_margin_px = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_margin_swallowing_tile() {
        let result = Config::from_toml("[interaction]\nresize_margin_px = 60\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_huge_resize_margin() {
        let result = Config::from_toml("[interaction]\nresize_margin_px = 3000000000\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_max_margin_with_max_tiles() {
        let toml = format!(
            "[geometry]\ntile_height_px = {max}\ntile_width_px = {max}\n[interaction]\nresize_margin_px = {max}\n",
            max = u32::MAX
        );
        assert!(matches!(Config::from_toml(&toml), Err(ConfigError::Validation(_))));
    }

    // ── Default rendering tests ─────────────────────────────────────

    #[test]
    fn print_default_parses_back_to_defaults() {
        let rendered = Config::print_default();
        assert!(rendered.contains("[geometry]"));
        assert!(rendered.contains("resize_margin_px = 5"));
        assert_eq!(Config::from_toml(&rendered).unwrap(), Config::default());
    }

    // ── File loading tests ──────────────────────────────────────────

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tilegrid.toml");
        {
            let mut f = std::fs::File::create(&path).unwrap();
            f.write_all(b"[grid]\ncolumns = 9\n").unwrap();
        }
        let config = Config::load(&path).unwrap();
        assert_eq!(config.grid.columns, 9);
        assert_eq!(config.grid.rows, 6);
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    // ── ConfigError display test ────────────────────────────────────

    #[test]
    fn config_error_display() {
        let err = ConfigError::Validation("tile sizes must be > 0".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("tile sizes must be > 0"));
    }
}
