//! Application configuration.

use crate::error::{AppError, AppResult};
use folio_core::{CanvasConfig, DragOptions, PageMetrics};
use folio_render::ExportOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration. Every field has a default, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub title: String,
    pub page: PageMetrics,
    pub drag: DragOptions,
    pub export: ExportOptions,
    /// Use `block_1`, `block_2`, ... instead of random block ids.
    pub sequential_ids: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            page: PageMetrics::default(),
            drag: DragOptions::default(),
            export: ExportOptions::default(),
            sequential_ids: false,
        }
    }
}

impl AppConfig {
    /// Load a JSON configuration file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| AppError::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        config
            .export
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn canvas_config(&self) -> CanvasConfig {
        CanvasConfig {
            page: self.page,
            drag: self.drag,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        self.export.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.drag.snap_grid, 15.0);
        assert_eq!(config.export.filename, "myfile.pdf");
        assert_eq!(config.canvas_config(), CanvasConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sequentialIds": true, "drag": {{"snapGrid": 10.0}}, "export": {{"filename": "cv.pdf"}}}}"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert!(config.sequential_ids);
        assert_eq!(config.export.filename, "cv.pdf");
        assert_eq!(config.export.raster.scale, 1.0);
        assert_eq!(config.canvas_config().drag.snap_grid, 10.0);
        assert!(config.canvas_config().drag.inertia);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"export": {{"raster": {{"scale": -1.0}}}}}}"#).unwrap();
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(AppError::Config(_))
        ));

        let missing = AppConfig::from_file(Path::new("/nonexistent/folio.json"));
        assert!(matches!(missing, Err(AppError::Config(_))));
    }
}
