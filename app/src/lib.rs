//! FILENAME: app/src/lib.rs
//! Command line front end: parse arguments, set up logging, then drive a
//! `PlotSession` through load, plot and save.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use cli::{Cli, Command};
pub use config::{load_config, ConfigFile};
pub use error::AppError;
pub use session::PlotSession;

use clap::Parser;
use forest_engine::sample_table;
use log::{info, LevelFilter};

use crate::cli::{ExampleArgs, PlotArgs};

pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let level = if cli.verbose > 0 {
        default_level
    } else {
        logging::level_from_env(default_level)
    };
    logging::init(level, cli.log_file.as_deref())?;

    match cli.command {
        Command::Plot(args) => run_plot(&args),
        Command::Example(args) => run_example(&args),
    }
}

pub fn run_plot(args: &PlotArgs) -> Result<(), AppError> {
    log_enter!("SESSION", "run_plot", "{}", args.input.display());

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ConfigFile::default(),
    };

    let mut session = PlotSession::with_style(args.style(&config));
    session.load_data(&args.input, &args.load_options(&config))?;
    session.plot(&args.plot_options(&config))?;
    session.save_plot(&args.output)?;

    log_exit!("SESSION", "run_plot");
    Ok(())
}

pub fn run_example(args: &ExampleArgs) -> Result<(), AppError> {
    persistence::save_table(&sample_table(), &args.output)?;
    info!(target: "SESSION", "Wrote example table to {}", args.output.display());
    Ok(())
}
