//! FILENAME: app/src/session.rs
// PURPOSE: One plotting session: the loaded table, the style and the last figure.
// CONTEXT: load_data -> plot -> save_plot. Each session owns its own state,
// so two sessions never share a table or a style.

use std::path::Path;

use forest_engine::{PlotOptions, ResultTable, RowLayout, StyleConfig};
use forest_render::{save_figure, FigureLayout};
use log::{info, warn};
use persistence::{load_table, LoadOptions};

use crate::error::AppError;
use crate::{log_enter, log_exit};

#[derive(Debug, Clone, Default)]
pub struct PlotSession {
    table: Option<ResultTable>,
    style: StyleConfig,
    figure: Option<FigureLayout>,
}

impl PlotSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: StyleConfig) -> Self {
        PlotSession {
            style,
            ..Self::default()
        }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Changes typography for later plots. The current figure is kept.
    pub fn set_style(&mut self, style: StyleConfig) {
        self.style = style;
    }

    pub fn table(&self) -> Option<&ResultTable> {
        self.table.as_ref()
    }

    pub fn figure(&self) -> Option<&FigureLayout> {
        self.figure.as_ref()
    }

    /// Replaces the loaded table with one built in memory.
    pub fn set_table(&mut self, table: ResultTable) {
        self.table = Some(table);
        self.figure = None;
    }

    /// Loads a table from disk. On failure the session is left unchanged,
    /// including any previously loaded table.
    pub fn load_data(&mut self, path: &Path, options: &LoadOptions) -> Result<(), AppError> {
        log_enter!("SESSION", "load_data", "{}", path.display());

        let table = match load_table(path, options) {
            Ok(table) => table,
            Err(e) => {
                warn!(target: "SESSION", "Load failed for {}: {}", path.display(), e);
                return Err(e.into());
            }
        };
        self.set_table(table);

        log_exit!("SESSION", "load_data");
        Ok(())
    }

    /// Lays out and builds the figure for the loaded table.
    pub fn plot(&mut self, options: &PlotOptions) -> Result<&FigureLayout, AppError> {
        log_enter!("SESSION", "plot");

        let table = self.table.as_ref().ok_or(AppError::NoTableLoaded)?;
        let layout = RowLayout::build(table, options)?;
        let figure = FigureLayout::new(&layout, options, &self.style)?;

        info!(
            target: "SESSION",
            "Plotted {} rows into {}x{} px",
            layout.row_count(),
            figure.width,
            figure.height
        );
        log_exit!("SESSION", "plot");
        Ok(self.figure.insert(figure))
    }

    /// Writes the last figure. The image format follows the extension.
    pub fn save_plot(&self, path: &Path) -> Result<(), AppError> {
        let figure = self.figure.as_ref().ok_or(AppError::NotPlotted)?;
        save_figure(figure, path)?;
        info!(target: "SESSION", "Saved plot to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forest_engine::{sample_table, LayoutError};
    use persistence::{save_table, PersistenceError};
    use std::fs;

    #[test]
    fn test_unsupported_extension_leaves_no_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        fs::write(&path, "anything").unwrap();

        let mut session = PlotSession::new();
        let err = session.load_data(&path, &LoadOptions::default()).unwrap_err();

        assert!(matches!(
            err,
            AppError::Persistence(PersistenceError::UnsupportedFileExtension(_))
        ));
        assert!(session.table().is_none());
    }

    #[test]
    fn test_load_plot_save_svg() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("results.csv");
        save_table(&sample_table(), &data).unwrap();

        let mut session = PlotSession::new();
        let options = LoadOptions {
            result_column: "Odds Ratio".to_string(),
            ..LoadOptions::default()
        };
        session.load_data(&data, &options).unwrap();
        assert_eq!(session.table().map(|t| t.len()), Some(5));

        let plot_options = PlotOptions {
            counts: true,
            ..PlotOptions::default()
        };
        let figure = session.plot(&plot_options).unwrap();
        assert!(figure.width > 0 && figure.height > 0);

        let out = dir.path().join("plot.svg");
        session.save_plot(&out).unwrap();
        let svg = fs::read_to_string(&out).unwrap();
        assert!(svg.contains("Age (years)"));
        assert!(svg.contains("118"));
    }

    #[test]
    fn test_plot_without_table() {
        let mut session = PlotSession::new();
        let err = session.plot(&PlotOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::NoTableLoaded));
    }

    #[test]
    fn test_save_without_plot() {
        let mut session = PlotSession::new();
        session.set_table(sample_table());
        let err = session.save_plot(Path::new("plot.png")).unwrap_err();
        assert!(matches!(err, AppError::NotPlotted));
    }

    #[test]
    fn test_failed_load_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = PlotSession::new();
        session.set_table(sample_table());

        let missing = dir.path().join("missing.csv");
        assert!(session.load_data(&missing, &LoadOptions::default()).is_err());
        assert_eq!(session.table(), Some(&sample_table()));
    }

    #[test]
    fn test_mismatched_reference_rejected_on_plot() {
        let rows = vec![forest_engine::ResultRow::new(
            "Animal",
            "Cat",
            1.0,
            forest_engine::CiBound::Reference,
            0.8,
        )];
        let mut session = PlotSession::new();
        session.set_table(ResultTable::new(rows, "Odds Ratio"));

        let err = session.plot(&PlotOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Layout(LayoutError::InvalidReferenceRow { row: 0, .. })
        ));
    }

    #[test]
    fn test_new_load_clears_figure() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("results.xlsx");
        save_table(&sample_table(), &data).unwrap();

        let mut session = PlotSession::new();
        session.set_table(sample_table());
        session.plot(&PlotOptions::default()).unwrap();
        assert!(session.figure().is_some());

        let options = LoadOptions {
            result_column: "Odds Ratio".to_string(),
            ..LoadOptions::default()
        };
        session.load_data(&data, &options).unwrap();
        assert!(session.figure().is_none());
    }
}
