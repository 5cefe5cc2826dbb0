//! FILENAME: app/src/config.rs
//! JSON configuration file for the command line tool.
//!
//! Every field is optional; missing fields take their defaults and
//! command line flags override whatever the file sets.

use std::fs;
use std::path::Path;

use forest_engine::{PlotOptions, StyleConfig};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub plot: PlotOptions,
    pub style: StyleConfig,
    /// Header of the estimate column in the input table.
    pub result_column: Option<String>,
    /// Worksheet to read from XLSX input.
    pub sheet: Option<String>,
}

pub fn load_config(path: &Path) -> Result<ConfigFile, AppError> {
    let text = fs::read_to_string(path)?;
    let config: ConfigFile = serde_json::from_str(&text)?;
    log::debug!(target: "CONFIG", "Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forest_engine::Color;

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.json");
        fs::write(
            &path,
            r##"{
                "plot": { "counts": true, "group1_color": "gray", "xlim": [0.5, 8.0] },
                "style": { "font_size": 9.0 },
                "result_column": "Odds Ratio"
            }"##,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.plot.counts);
        assert_eq!(config.plot.group1_color, Some(Color::new(128, 128, 128)));
        assert_eq!(config.plot.group2_color, None);
        assert_eq!(config.plot.xlim, Some((0.5, 8.0)));
        assert_eq!(config.plot.length_scale, 1.0);
        assert_eq!(config.style.font_size, 9.0);
        assert_eq!(config.style.dpi, 100.0);
        assert_eq!(config.result_column.as_deref(), Some("Odds Ratio"));
        assert_eq!(config.sheet, None);
    }

    #[test]
    fn test_empty_object_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(load_config(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_bad_color_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.json");
        fs::write(&path, r#"{ "plot": { "head_fill": "not-a-color" } }"#).unwrap();
        assert!(matches!(load_config(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(load_config(&path), Err(AppError::Io(_))));
    }
}
