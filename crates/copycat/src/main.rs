//! `copycat` - copy HTTP messages without the noisy headers
//!
//! This binary reads raw requests and responses from files or standard input
//! and publishes them with excluded header lines removed.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use copycat::adapters::{ClipboardSink, StaticSource, StdoutSink};
use copycat::cli::{Cli, Command, ConfigCommand, CopyCommand, PatternFlags, PatternsCommand};
use copycat::ports::ResultSink;
use copycat::{init_logging, Config, CopyOrchestrator, MessageFilter, Outcome, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Config subcommands load (or only locate) the file themselves
    match cli.command {
        Command::Copy(copy_cmd) => handle_copy(&load_config(cli.config)?, &copy_cmd).await,
        Command::Patterns(patterns_cmd) => {
            handle_patterns(&load_config(cli.config)?, patterns_cmd)
        }
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    Config::load_from(path).context("Failed to load configuration")
}

async fn handle_copy(config: &Config, cmd: &CopyCommand) -> Result<()> {
    let settings = Arc::new(Settings::from_config(config));
    apply_flags(&settings, cmd.flags());

    let stdin = PathBuf::from("-");
    let source = match cmd {
        CopyCommand::Request { file, .. } => {
            StaticSource::from_files(Some(file.as_deref().unwrap_or(stdin.as_path())), None)?
        }
        CopyCommand::Response { file, .. } => {
            StaticSource::from_files(None, Some(file.as_deref().unwrap_or(stdin.as_path())))?
        }
        CopyCommand::Both {
            request, response, ..
        } => {
            if request.is_none() && response.is_none() {
                bail!("copy both needs --request, --response, or both");
            }
            StaticSource::from_files(request.as_deref(), response.as_deref())?
        }
    };

    let sink: Rc<dyn ResultSink> = if cmd.flags().clipboard || config.output.clipboard {
        Rc::new(ClipboardSink)
    } else {
        Rc::new(StdoutSink)
    };

    let orchestrator =
        CopyOrchestrator::new(settings, sink).with_line_ending(config.output.line_ending);

    match orchestrator.copy(cmd.kind(), &source).await {
        Outcome::Published => Ok(()),
        Outcome::NothingAvailable => bail!("nothing was copied"),
    }
}

fn apply_flags(settings: &Settings, flags: &PatternFlags) {
    for pattern in &flags.exclude {
        settings.add_pattern(pattern);
    }
    settings.remove_patterns(&flags.keep);
}

fn handle_patterns(config: &Config, cmd: PatternsCommand) -> Result<()> {
    let settings = Settings::from_config(config);

    match cmd {
        PatternsCommand::List { json } => {
            let patterns = settings.list_patterns();
            if json {
                println!("{}", serde_json::to_string_pretty(&patterns)?);
            } else {
                println!("Excluded header patterns ({})", patterns.len());
                println!("========================");
                let rules = settings.rules();
                for pattern in &patterns {
                    let literal = rules
                        .get(pattern)
                        .is_some_and(|entry| entry.predicate().is_literal());
                    if literal {
                        println!("  {pattern}  (literal)");
                    } else {
                        println!("  {pattern}");
                    }
                }
            }
        }
        PatternsCommand::Test { name } => {
            let filter = MessageFilter::new(settings.rules());
            let matching = filter.explain(&name);
            if matching.is_empty() {
                println!("'{name}' is kept");
            } else {
                println!("'{name}' is excluded by:");
                for pattern in matching {
                    println!("  {pattern}");
                }
            }
        }
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Patterns]");
                println!("  Defaults:           {}", config.patterns.defaults.join(", "));
                println!(
                    "  Additional:         {}",
                    config.patterns.additional.join(", ")
                );
                println!();
                println!("[Output]");
                println!("  Line ending:        {:?}", config.output.line_ending);
                println!("  Clipboard:          {}", config.output.clipboard);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            validate_config(&path)?;
        }
    }
    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    println!("Validating configuration: {}", path.display());
    if !path.exists() {
        println!("No configuration file found; defaults apply.");
    }
    Config::load_from(Some(path.to_path_buf()))
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    println!("Configuration is valid.");
    Ok(())
}
