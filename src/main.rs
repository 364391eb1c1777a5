use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{error, info};

use rusbit_resume::bencode::{bvalue_to_json, looks_like_bencode};
use rusbit_resume::{BencodeParser, Config};

/// Extract torrent activity from BitTorrent client resume files.
#[derive(Parser)]
#[command(name = "rusbit-resume", version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a bencoded file as JSON
    Decode { file: PathBuf },
    /// Print the events found in each file, one JSON object per line
    Events {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading config")?;
    let parser = BencodeParser::new(&config);

    match cli.command {
        Command::Decode { file } => {
            let data = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let value = parser
                .decode(&data)
                .with_context(|| format!("decoding {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&bvalue_to_json(&value))?);
        }
        Command::Events { files } => {
            for file in files {
                let data = match fs::read(&file) {
                    Ok(data) => data,
                    Err(e) => {
                        error!("Skipping {}: {}", file.display(), e);
                        continue;
                    }
                };
                if !looks_like_bencode(&data) {
                    info!("Skipping {}: not a bencoded dictionary", file.display());
                    continue;
                }

                match parser.parse(&data) {
                    Ok(events) => {
                        for event in events {
                            let mut json = serde_json::to_value(&event)?;
                            json["filename"] = serde_json::Value::String(file.display().to_string());
                            println!("{}", json);
                        }
                    }
                    Err(e) => error!("Skipping {}: {}", file.display(), e),
                }
            }
        }
    }

    Ok(())
}
