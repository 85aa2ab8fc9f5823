// src/main.rs
//! ambimix - music plus binaural beats in the terminal.

use std::{env, path::PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use ambimix::{catalog::Catalog, config::Config, logging, ui};

const USAGE: &str = "\
Usage: ambimix [play|manifest|serve] [--config <path>] [--library <dir>]

Commands:
  play       Start the terminal mixer (default)
  manifest   Scan <library>/audio/{music,binaural} and write the track manifest
  serve      Serve the library and the /api/audio track list over HTTP

Options:
  --config <path>   Config file (default: ./ambimix.json)
  --library <dir>   Library root, overriding the config file
  --help            Show this message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Manifest,
    Serve,
    Help,
}

#[derive(Debug, PartialEq)]
struct Cli {
    command: Command,
    config: Option<PathBuf>,
    library: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli> {
    let mut cli = Cli {
        command: Command::Play,
        config: None,
        library: None,
    };
    let mut command_seen = false;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => cli.command = Command::Help,
            "--config" => {
                let value = args.next().context("--config needs a path")?;
                cli.config = Some(PathBuf::from(value));
            }
            "--library" => {
                let value = args.next().context("--library needs a directory")?;
                cli.library = Some(PathBuf::from(value));
            }
            "play" | "manifest" | "serve" if !command_seen => {
                command_seen = true;
                if cli.command != Command::Help {
                    cli.command = match arg.as_str() {
                        "manifest" => Command::Manifest,
                        "serve" => Command::Serve,
                        _ => Command::Play,
                    };
                }
            }
            other => bail!("unexpected argument '{other}'\n\n{USAGE}"),
        }
    }
    Ok(cli)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(library) = &cli.library {
        config.library_root = library.clone();
    }
    Ok(config)
}

fn write_manifest(config: &Config) -> Result<()> {
    logging::init_stderr();
    let catalog = Catalog::scan(&config.library_root)?;
    let path = config.manifest_path();
    catalog.write(&path)?;
    println!(
        "Wrote {}: {} music, {} binaural",
        path.display(),
        catalog.music.len(),
        catalog.binaural.len()
    );
    Ok(())
}

fn serve(config: &Config) -> Result<()> {
    logging::init_stderr();
    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(ambimix::catalog::server::serve(
        config.library_root.clone(),
        &config.listen_addr,
    ))
}

fn main() -> Result<()> {
    let cli = parse_args(env::args().skip(1))?;
    if cli.command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = load_config(&cli)?;
    match cli.command {
        Command::Manifest => write_manifest(&config),
        Command::Serve => serve(&config),
        Command::Play => {
            logging::init_file(&config.log_file)?;
            info!(library = %config.library_root.display(), "starting mixer");
            ui::run(config)
        }
        Command::Help => Ok(()),
    }
}
