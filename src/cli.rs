//! Command line interface.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::pipeline;

#[derive(Parser, Debug)]
#[command(name = "samp-screenshot-sorter", version)]
#[command(about = "Recognizes, sorts and scores in-game event screenshots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recognize text in every screenshot
    Recognize {
        #[command(flatten)]
        paths: PathArgs,
        /// Recognize images that already have a text file
        #[arg(long)]
        force: bool,
    },
    /// Sort screenshots by their recognized text
    Sort {
        #[command(flatten)]
        paths: PathArgs,
    },
    /// Recognize, then sort
    Run {
        #[command(flatten)]
        paths: PathArgs,
        /// Recognize images that already have a text file
        #[arg(long)]
        force: bool,
    },
    /// Count points in the sorted folder tree
    Score {
        #[command(flatten)]
        paths: PathArgs,
        /// Target total score (prompted if omitted)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        target: Option<u64>,
        /// Required reanimation share in percent
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        ratio: Option<u32>,
        /// Text report path
        #[arg(long)]
        report: Option<PathBuf>,
        /// JSON report path
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Open the window (default)
    Gui,
}

/// Folder overrides shared by every stage.
#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Screenshot folder
    #[arg(long)]
    pub images: Option<PathBuf>,
    /// Recognized text folder
    #[arg(long)]
    pub texts: Option<PathBuf>,
    /// Sorted output folder
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Reanimation locations JSON
    #[arg(long)]
    pub locations: Option<PathBuf>,
}

impl PathArgs {
    /// Applies the overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        let paths = &mut config.paths;
        if let Some(images) = &self.images {
            paths.images_dir = images.clone();
        }
        if let Some(texts) = &self.texts {
            paths.texts_dir = texts.clone();
        }
        if let Some(output) = &self.output {
            paths.output_dir = output.clone();
        }
        if let Some(locations) = &self.locations {
            paths.locations_file = locations.clone();
        }
    }
}

/// Asks for the target total score until a positive number is entered.
fn prompt_target_total() -> Result<u64> {
    let target: u64 = dialoguer::Input::new()
        .with_prompt("Enter your target total score")
        .validate_with(|value: &u64| {
            if *value > 0 {
                Ok(())
            } else {
                Err("Please enter a positive number.")
            }
        })
        .interact_text()?;
    Ok(target)
}

/// Runs a command line stage. `Gui` is handled by the caller.
pub fn run_command(command: Command, base: &AppConfig) -> Result<()> {
    let mut config = base.clone();

    match command {
        Command::Recognize { paths, force } => {
            paths.apply(&mut config);
            let summary = pipeline::run_recognize(&config, force, |_, _| true)?;
            println!("{}", pipeline::describe_recognize(&summary));
        }
        Command::Sort { paths } => {
            paths.apply(&mut config);
            let summary = pipeline::run_sort(&config, |_, _| true)?;
            println!("{}", pipeline::describe_sort(&summary));
        }
        Command::Run { paths, force } => {
            paths.apply(&mut config);
            let recognized = pipeline::run_recognize(&config, force, |_, _| true)?;
            let sorted = pipeline::run_sort(&config, |_, _| true)?;
            println!("{}", pipeline::describe_recognize(&recognized));
            println!("{}", pipeline::describe_sort(&sorted));
        }
        Command::Score {
            paths,
            target,
            ratio,
            report,
            json,
        } => {
            paths.apply(&mut config);
            if let Some(report) = report {
                config.paths.report_file = report;
            }
            if let Some(json) = json {
                config.paths.report_json = json;
            }

            let target_total = match target {
                Some(target) => target,
                None => prompt_target_total()?,
            };
            let ratio_percent = ratio.unwrap_or(config.scoring.target_ratio_percent);

            let report = pipeline::run_score(&config, target_total, ratio_percent)?;
            for line in report.lines() {
                println!("{}", line);
            }
        }
        Command::Gui => return Err(anyhow!("GUI must be started by the caller")),
    }

    Ok(())
}
