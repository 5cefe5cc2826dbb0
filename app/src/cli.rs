//! FILENAME: app/src/cli.rs
// PURPOSE: Command line surface. Flags override the config file, which
// overrides the built-in defaults.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use forest_engine::{Color, PlotOptions, StyleConfig};
use persistence::LoadOptions;

use crate::config::ConfigFile;

#[derive(Debug, Parser)]
#[command(
    name = "forestplot",
    about = "Render forest plots from regression result tables",
    version
)]
pub struct Cli {
    /// More output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write log lines to this file.
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a CSV/XLSX table and save the forest plot as PNG or SVG.
    Plot(PlotArgs),

    /// Write the built-in five row example table (CSV or XLSX).
    Example(ExampleArgs),
}

#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Input table (.csv or .xlsx).
    pub input: PathBuf,

    /// Output image (.png or .svg).
    #[arg(short, long)]
    pub output: PathBuf,

    /// Worksheet to read from an XLSX file.
    #[arg(long)]
    pub sheet: Option<String>,

    /// Header of the estimate column.
    #[arg(long = "result-column")]
    pub result_column: Option<String>,

    /// JSON file with plot and style settings.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Add the sample size column.
    #[arg(long)]
    pub counts: bool,

    /// Estimate axis limits as LOW,HIGH.
    #[arg(long, value_parser = parse_xlim, allow_hyphen_values = true)]
    pub xlim: Option<(f64, f64)>,

    #[arg(long = "group1-color")]
    pub group1_color: Option<Color>,

    #[arg(long = "group2-color")]
    pub group2_color: Option<Color>,

    #[arg(long = "group-alpha")]
    pub group_alpha: Option<f64>,

    /// Background color of the header row.
    #[arg(long = "head-fill")]
    pub head_fill: Option<Color>,

    #[arg(long = "head-alpha")]
    pub head_alpha: Option<f64>,

    /// Vertical stretch factor.
    #[arg(long = "length-scale")]
    pub length_scale: Option<f64>,

    /// Base font size in points.
    #[arg(long = "font-size")]
    pub font_size: Option<f64>,

    #[arg(long)]
    pub dpi: Option<f64>,
}

#[derive(Debug, Args)]
pub struct ExampleArgs {
    /// Where to write the table (.csv or .xlsx).
    pub output: PathBuf,
}

/// Parses "LOW,HIGH" into an ordered pair.
pub fn parse_xlim(value: &str) -> Result<(f64, f64), String> {
    let (low, high) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LOW,HIGH, got '{}'", value))?;
    let low: f64 = low
        .trim()
        .parse()
        .map_err(|_| format!("invalid lower limit '{}'", low.trim()))?;
    let high: f64 = high
        .trim()
        .parse()
        .map_err(|_| format!("invalid upper limit '{}'", high.trim()))?;
    if !(low < high) {
        return Err(format!("lower limit {} must be below upper limit {}", low, high));
    }
    Ok((low, high))
}

impl PlotArgs {
    pub fn load_options(&self, config: &ConfigFile) -> LoadOptions {
        let mut options = LoadOptions::default();
        if let Some(column) = self.result_column.clone().or_else(|| config.result_column.clone()) {
            options.result_column = column;
        }
        options.sheet = self.sheet.clone().or_else(|| config.sheet.clone());
        options
    }

    pub fn plot_options(&self, config: &ConfigFile) -> PlotOptions {
        let mut options = config.plot.clone();
        options.counts |= self.counts;
        if self.xlim.is_some() {
            options.xlim = self.xlim;
        }
        if self.group1_color.is_some() {
            options.group1_color = self.group1_color;
        }
        if self.group2_color.is_some() {
            options.group2_color = self.group2_color;
        }
        if self.head_fill.is_some() {
            options.head_fill = self.head_fill;
        }
        if let Some(alpha) = self.group_alpha {
            options.group_alpha = alpha;
        }
        if let Some(alpha) = self.head_alpha {
            options.head_alpha = alpha;
        }
        if let Some(scale) = self.length_scale {
            options.length_scale = scale;
        }
        options
    }

    pub fn style(&self, config: &ConfigFile) -> StyleConfig {
        let mut style = config.style;
        if let Some(size) = self.font_size {
            style.font_size = size;
            style.header_font_size = size;
            style.group_font_size = size;
        }
        if let Some(dpi) = self.dpi {
            style.dpi = dpi;
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_plot(args: &[&str]) -> PlotArgs {
        let mut full = vec!["forestplot", "plot"];
        full.extend_from_slice(args);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Plot(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_xlim() {
        assert_eq!(parse_xlim("0.5,8"), Ok((0.5, 8.0)));
        assert_eq!(parse_xlim(" -1 , 2.5 "), Ok((-1.0, 2.5)));
        assert!(parse_xlim("3").is_err());
        assert!(parse_xlim("a,2").is_err());
        assert!(parse_xlim("2,1").is_err());
    }

    #[test]
    fn test_plot_flags() {
        let args = parse_plot(&[
            "results.xlsx",
            "-o",
            "plot.png",
            "--counts",
            "--xlim",
            "0.5,8",
            "--group1-color",
            "gray",
            "--head-fill",
            "#ffff00",
            "--length-scale",
            "1.5",
        ]);
        let options = args.plot_options(&ConfigFile::default());

        assert!(options.counts);
        assert_eq!(options.xlim, Some((0.5, 8.0)));
        assert_eq!(options.group1_color, Some(Color::new(128, 128, 128)));
        assert_eq!(options.group2_color, None);
        assert_eq!(options.head_fill, Some(Color::new(255, 255, 0)));
        assert_eq!(options.length_scale, 1.5);
        assert_eq!(options.group_alpha, PlotOptions::default().group_alpha);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = ConfigFile::default();
        config.plot.group_alpha = 0.3;
        config.plot.length_scale = 2.0;
        config.style.dpi = 150.0;
        config.result_column = Some("Hazard Ratio".to_string());

        let args = parse_plot(&["t.csv", "-o", "p.svg", "--length-scale", "1.2", "--font-size", "9"]);
        let options = args.plot_options(&config);
        assert_eq!(options.group_alpha, 0.3);
        assert_eq!(options.length_scale, 1.2);

        let style = args.style(&config);
        assert_eq!(style.dpi, 150.0);
        assert_eq!(style.font_size, 9.0);
        assert_eq!(style.header_font_size, 9.0);

        assert_eq!(args.load_options(&config).result_column, "Hazard Ratio");
        let args = parse_plot(&["t.csv", "-o", "p.svg", "--result-column", "Beta"]);
        assert_eq!(args.load_options(&config).result_column, "Beta");
    }

    #[test]
    fn test_default_result_column() {
        let args = parse_plot(&["t.xlsx", "-o", "p.png", "--sheet", "Model 2"]);
        let load = args.load_options(&ConfigFile::default());
        assert_eq!(load.result_column, "Result");
        assert_eq!(load.sheet.as_deref(), Some("Model 2"));
    }

    #[test]
    fn test_bad_color_rejected() {
        let result = Cli::try_parse_from([
            "forestplot",
            "plot",
            "t.csv",
            "-o",
            "p.png",
            "--group2-color",
            "nope",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_example_command_and_verbosity() {
        let cli = Cli::try_parse_from(["forestplot", "-vv", "example", "demo.csv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Example(args) => assert_eq!(args.output, PathBuf::from("demo.csv")),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
