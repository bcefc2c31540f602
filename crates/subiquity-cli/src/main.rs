#![deny(unsafe_code)]

//! subiquity-ctl: inspect and drive a running installer backend.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use subiquity_client::{Endpoint, KeyboardWizard, SubiquityClient, WizardAnswer, WizardError, WizardState};
use subiquity_config::ClientConfig;
use subiquity_types::Redact;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line client for the installer backend.
#[derive(Parser)]
#[command(name = "subiquity-ctl", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "subiquity-ctl.toml")]
    config: PathBuf,

    /// Backend socket; overrides the configured endpoint.
    #[arg(short, long)]
    socket: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv). `-vv` logs request and response bodies.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the installer state.
    Status,

    /// Show disks, partitions and gaps.
    Storage {
        /// Wait for storage probing to finish.
        #[arg(long)]
        wait: bool,
    },

    /// Show guided partitioning targets.
    Guided,

    /// Show the keyboard setting and available layouts.
    Keyboard,

    /// Detect the keyboard layout interactively.
    DetectKeyboard {
        /// Apply the detected layout when done.
        #[arg(long)]
        apply: bool,
    },

    /// Check whether a newer installer is available.
    Refresh {
        /// Wait for the check to finish.
        #[arg(long)]
        wait: bool,
    },

    /// Check whether a username is acceptable.
    ValidateUsername { name: String },

    /// Show the configured time zone.
    Timezone,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config).await?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose, &config))),
        )
        .with_writer(std::io::stderr)
        .init();

    let endpoint = resolve_endpoint(cli.socket.as_deref(), &config);
    info!(%endpoint, "connecting to installer backend");
    let mut client = SubiquityClient::connect(endpoint);

    let result = run(&client, cli.command).await;
    client.close();
    result
}

async fn run(client: &SubiquityClient, command: Commands) -> Result<()> {
    match command {
        Commands::Status => print_json(&client.status(None).await?),
        Commands::Storage { wait } => print_json(&client.storage_v2(wait).await?),
        Commands::Guided => print_json(&client.guided_storage_v2().await?.redacted()),
        Commands::Keyboard => print_json(&client.keyboard().await?),
        Commands::DetectKeyboard { apply } => cmd_detect_keyboard(client, apply).await,
        Commands::Refresh { wait } => print_json(&client.check_refresh(wait).await?),
        Commands::ValidateUsername { name } => {
            print_json(&client.validate_username(&name).await?)
        }
        Commands::Timezone => print_json(&client.timezone().await?),
    }
}

async fn cmd_detect_keyboard(client: &SubiquityClient, apply: bool) -> Result<()> {
    let mut wizard = KeyboardWizard::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let state = wizard.fetch(client).await?.clone();
        let answer = match state {
            WizardState::PressKey(step) => {
                println!(
                    "Press one of: {}  (enter the keycode reported by showkey)",
                    step.symbols.join(" ")
                );
                let Some(line) = lines.next_line().await? else {
                    anyhow::bail!("keyboard detection aborted");
                };
                match line.trim().parse() {
                    Ok(code) => WizardAnswer::KeyPressed(code),
                    Err(_) => {
                        eprintln!("not a keycode: {line:?}");
                        continue;
                    }
                }
            }
            WizardState::KeyPresent(step) => {
                println!("Is the key '{}' on your keyboard? [y/n]", step.symbol);
                let Some(line) = lines.next_line().await? else {
                    anyhow::bail!("keyboard detection aborted");
                };
                match line.trim() {
                    "y" | "Y" | "yes" => WizardAnswer::KeyPresent(true),
                    "n" | "N" | "no" => WizardAnswer::KeyPresent(false),
                    _ => continue,
                }
            }
            WizardState::Done(result) => {
                print_json(&result)?;
                if apply {
                    client.set_keyboard(&result.to_setting()).await?;
                    info!(layout = %result.layout, variant = %result.variant, "keyboard layout applied");
                }
                return Ok(());
            }
            WizardState::AwaitingStep(index) => {
                debug!(%index, "step still pending");
                continue;
            }
        };

        match wizard.answer(answer) {
            Ok(()) => {}
            Err(WizardError::UnknownKeycode(code)) => {
                warn!(code, "keycode does not match any of the expected keys");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `-v` count wins over the configured level.
fn log_filter(verbose: u8, config: &ClientConfig) -> String {
    match verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn resolve_endpoint(socket: Option<&Path>, config: &ClientConfig) -> Endpoint {
    match socket {
        Some(path) => Endpoint::unix(path),
        None => Endpoint::from_config(&config.endpoint),
    }
}

async fn load_config(path: &Path) -> Result<ClientConfig> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        ClientConfig::load(path)
            .await
            .with_context(|| format!("failed to load config from {}", path.display()))
    } else {
        Ok(ClientConfig::default())
    }
}
