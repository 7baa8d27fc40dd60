//! Screenshot Sorter
//!
//! Recognizes the event overlay in game screenshots with Tesseract, sorts the
//! screenshots into a category/location folder tree and scores the result.
//! Runs a command line stage when given a subcommand, the GUI otherwise.

mod classify;
mod cli;
mod config;
mod gui;
mod ocr;
mod paths;
mod pipeline;
mod scoring;
mod sorting;

use anyhow::{anyhow, Result};
use chrono::Local;
use clap::Parser;
use std::fs::OpenOptions;
use std::io::Write;

use cli::{Cli, Command};

const LOG_FILE: &str = "samp_screenshot_sorter.log";

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join(LOG_FILE);
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprintln!("{}", log_msg);
        let log_path = paths::get_logs_dir().join(LOG_FILE);
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            let _ = file.write_all(log_msg.as_bytes());
        }
    }));

    let cli = Cli::parse();

    // Ensure output directories exist
    paths::ensure_directories()?;

    // Load configuration
    config::init_config();
    let config = config::get_config();

    match cli.command {
        None | Some(Command::Gui) => {
            log("Starting GUI...");
            gui::run_gui(config.clone()).map_err(|e| anyhow!("GUI error: {}", e))?;
            log("GUI closed");
        }
        Some(command) => {
            if let Err(e) = cli::run_command(command, config) {
                log(&format!("Error: {:#}", e));
                return Err(e);
            }
        }
    }

    Ok(())
}
