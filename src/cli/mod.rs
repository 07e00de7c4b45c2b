//! Command-line interface for mapconf
//!
//! Validates a render configuration and prints the resolved worlds and maps.

use crate::config::{ConfigParser, MapSection, ValidationMap, WorldSection};
use crate::{MapconfError, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// mapconf command-line interface
#[derive(Parser)]
#[command(name = "mapconf")]
#[command(about = "Validate and inspect map renderer configuration files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct MapconfCli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check the configuration and print every error and warning
    Validate,

    /// Print the resolved configuration
    Show {
        /// Only show this map
        #[arg(short, long)]
        map: Option<String>,
    },
}

/// Default configuration location, `<config dir>/mapconf/render.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mapconf").join("render.toml"))
}

/// CLI command executor
pub struct MapconfCliExecutor {
    config_path: PathBuf,
    json_output: bool,
}

impl MapconfCliExecutor {
    /// Create a new CLI executor
    pub fn new(config_path: PathBuf, json_output: bool) -> Self {
        Self {
            config_path,
            json_output,
        }
    }

    /// Execute a CLI command. Returns `false` if the configuration is invalid.
    pub fn execute(&self, command: Commands) -> Result<bool> {
        match command {
            Commands::Validate => self.execute_validate(),
            Commands::Show { map } => self.execute_show(map.as_deref()),
        }
    }

    fn load(&self) -> Result<(ConfigParser, ValidationMap, bool)> {
        let mut parser = ConfigParser::new();
        let mut validation = ValidationMap::new();
        info!("Loading configuration from {}", self.config_path.display());
        let ok = parser.parse(&self.config_path, &mut validation)?;
        Ok((parser, validation, ok))
    }

    fn execute_validate(&self) -> Result<bool> {
        let (_, validation, ok) = self.load()?;

        if self.json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&validation_json(&self.config_path, &validation, ok))?
            );
        } else {
            print_validation(&validation);
            if ok {
                println!("Configuration file {} is valid", self.config_path.display());
            } else {
                println!(
                    "Configuration file {} is invalid",
                    self.config_path.display()
                );
            }
        }

        Ok(ok)
    }

    fn execute_show(&self, map: Option<&str>) -> Result<bool> {
        let (parser, validation, ok) = self.load()?;

        if !ok {
            if self.json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&validation_json(
                        &self.config_path,
                        &validation,
                        ok
                    ))?
                );
            } else {
                print_validation(&validation);
            }
            return Ok(false);
        }

        let maps: Vec<&MapSection> = match map {
            Some(name) => vec![parser
                .map(name)
                .ok_or_else(|| MapconfError::MapNotFound(name.to_string()))?],
            None => parser.maps().iter().collect(),
        };
        debug!("Showing {} map(s)", maps.len());

        if self.json_output {
            let output = json!({
                "output_dir": parser.output_dir(),
                "worlds": parser.worlds(),
                "maps": maps,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Output directory: {}", parser.output_dir().display());
            for world in parser.worlds().values() {
                print_world(world);
            }
            for map in maps {
                print_map(map);
            }
        }

        Ok(true)
    }
}

fn validation_json(path: &Path, validation: &ValidationMap, ok: bool) -> serde_json::Value {
    let sections: Vec<serde_json::Value> = validation
        .problems()
        .map(|(section, list)| json!({ "section": section, "messages": list }))
        .collect();

    json!({
        "file": path,
        "valid": ok,
        "errors": validation.error_count(),
        "warnings": validation.warning_count(),
        "sections": sections,
    })
}

fn print_validation(validation: &ValidationMap) {
    for (section, list) in validation.problems() {
        println!("[{}]", section);
        for message in list {
            println!("  {}", message);
        }
    }
    println!(
        "{} error(s), {} warning(s)",
        validation.error_count(),
        validation.warning_count()
    );
}

fn print_world(world: &WorldSection) {
    println!("World '{}':", world.name());
    if let Some(dir) = world.input_dir() {
        println!("  input_dir: {}", dir.display());
    }
}

fn print_map(map: &MapSection) {
    println!("Map '{}' ({}):", map.short_name(), map.long_name());
    println!("  world: {}", map.world().unwrap_or("-"));
    if let Some(dir) = map.texture_dir() {
        println!("  texture_dir: {}", dir.display());
    }
    let rotations: Vec<String> = map.rotations().iter().map(|r| r.to_string()).collect();
    println!("  rotations: {}", rotations.join(", "));
    println!("  rendermode: {}", map.rendermode().unwrap_or("-"));
    if let Some(size) = map.texture_size() {
        println!("  texture_size: {}", size);
    }
    println!("  render_unknown_blocks: {}", map.render_unknown_blocks());
    println!(
        "  render_leaves_transparent: {}",
        map.render_leaves_transparent()
    );
    println!("  render_biomes: {}", map.render_biomes());
}

/// Run the CLI interface. Returns `false` if the configuration is invalid.
pub fn run_cli(cli: MapconfCli) -> Result<bool> {
    if cli.verbose {
        debug!("Verbose output enabled");
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path().ok_or_else(|| {
            MapconfError::ConfigurationError(
                "No configuration file given and no config directory available".to_string(),
            )
        })?,
    };

    let executor = MapconfCliExecutor::new(config_path, cli.json);

    match executor.execute(cli.command) {
        Ok(ok) => Ok(ok),
        Err(e) => {
            if cli.json {
                let error_json = json!({
                    "error": true,
                    "message": e.to_string()
                });
                println!("{}", serde_json::to_string_pretty(&error_json)?);
            } else {
                error!("Command failed: {}", e);
                eprintln!("Error: {:#}", e);
            }
            Ok(false)
        }
    }
}
