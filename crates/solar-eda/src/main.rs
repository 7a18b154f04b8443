//! `solar-eda` - CLI for the solar dataset analysis
//!
//! This binary runs the analysis pipeline and provides helpers for inspecting
//! the dataset registry and configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clap::Parser;

use solar_eda::cli::{Cli, Command, ConfigCommand, DatasetsCommand, RunCommand};
use solar_eda::{init_logging, pipeline, Config, DatasetFile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let mut config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        None => handle_run(&mut config, &RunCommand::default()),
        Some(Command::Run(run_cmd)) => handle_run(&mut config, &run_cmd),
        Some(Command::Datasets(datasets_cmd)) => handle_datasets(&config, &datasets_cmd),
        Some(Command::Config(config_cmd)) => handle_config(&config, config_cmd),
    }
}

fn handle_run(config: &mut Config, cmd: &RunCommand) -> Result<(), Box<dyn std::error::Error>> {
    cmd.apply(config)?;
    let selection = cmd.selection()?;

    let reports = pipeline::run(config, &selection)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print!("{}", report.render_text());
        }
    }
    Ok(())
}

fn handle_datasets(config: &Config, cmd: &DatasetsCommand) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = &config.paths.data_dir;
    if cmd.json {
        let datasets: Vec<_> = DatasetFile::ALL
            .iter()
            .map(|d| {
                let path = d.path_in(data_dir);
                serde_json::json!({
                    "name": d.name(),
                    "path": path,
                    "exists": path.exists(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&datasets)?);
    } else {
        for d in DatasetFile::ALL {
            let path = d.path_in(data_dir);
            let marker = if path.exists() { "" } else { "  (missing)" };
            println!("{:<22} {}{marker}", d.name(), path.display());
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Paths]");
                println!("  Data directory:     {}", config.paths.data_dir.display());
                println!("  Output directory:   {}", config.paths.output_dir.display());
                println!();
                println!("[Plots]");
                println!("  Enabled:            {}", config.plots.enabled);
                println!("  Format:             {}", config.plots.format);
                match config.bubble_point_limit() {
                    Some(limit) => println!("  Max bubble points:  {limit}"),
                    None => println!("  Max bubble points:  unlimited"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::validate_file(&path)?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
