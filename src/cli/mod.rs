//! Command-line interface for the uniadmin console.
//!
//! Subcommands map one-to-one to the screens of the admin console:
//! - `login` / `logout` - establish or tear down the stored session
//! - `dashboard` - summary statistics
//! - `students` - interactive student management screen
//! - `teachers` - interactive teacher management screen
//! - `config check` - validate the configuration file

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::types::UserRole;
use crate::api::ApiClient;
use crate::config::Config;
use crate::console;
use crate::session::Session;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "uniadmin")]
#[command(author, version, about = "Terminal admin console for a university management system", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "uniadmin.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API URL to connect to (overrides the config file)
    #[arg(long, env = "UNIADMIN_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token override (bypasses the stored session)
    #[arg(long, env = "UNIADMIN_TOKEN")]
    pub token: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store a session
    Login,

    /// Clear the stored session
    Logout,

    /// Show summary statistics
    Dashboard,

    /// Open the interactive student management screen
    Students,

    /// Open the interactive teacher management screen
    Teachers,

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Login => {
            let client = anonymous_client(cli, config)?;
            console::login(&client, config).await
        }
        Commands::Logout => console::logout(config),
        Commands::Dashboard => {
            let (client, session) = authenticated_client(cli, config)?;
            console::dashboard::run(&client, &session).await
        }
        Commands::Students => {
            let (client, _session) = authenticated_client(cli, config)?;
            console::students::run(&client, config.ui.page_size).await
        }
        Commands::Teachers => {
            let (client, _session) = authenticated_client(cli, config)?;
            console::teachers::run(&client, config.ui.page_size).await
        }
        Commands::Config(ConfigCommands::Check) => cmd_config_check(&cli.config),
    }
}

fn api_base_url<'a>(cli: &'a Cli, config: &'a Config) -> &'a str {
    cli.api_url.as_deref().unwrap_or(&config.api.base_url)
}

fn request_timeout(config: &Config) -> Duration {
    Duration::from_secs(config.api.timeout_secs)
}

/// Client without credentials, for the login call itself.
fn anonymous_client(cli: &Cli, config: &Config) -> Result<ApiClient> {
    Ok(ApiClient::new(
        api_base_url(cli, config),
        request_timeout(config),
        None,
    )?)
}

/// Resolve the session (stored file, or `--token` override) and build a
/// bearer-authenticated client from it.
fn authenticated_client(cli: &Cli, config: &Config) -> Result<(ApiClient, Session)> {
    let session = match &cli.token {
        Some(token) => Session {
            token: token.clone(),
            role: UserRole::Admin,
            display_name: "admin".to_string(),
        },
        None => Session::load(&config.session.store_dir)?.ok_or_else(|| {
            anyhow::anyhow!(
                "Not logged in. Run `uniadmin login` first, or pass --token / set UNIADMIN_TOKEN."
            )
        })?,
    };

    if session.role != UserRole::Admin {
        tracing::warn!(
            "Signed in as role '{}'; the management screens expect an admin account",
            session.role
        );
    }

    let client = ApiClient::new(
        api_base_url(cli, config),
        request_timeout(config),
        Some(&session.token),
    )?;
    Ok((client, session))
}

/// Validate configuration file
pub fn cmd_config_check(config_path: &Path) -> Result<()> {
    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("Default configuration will be used.");
        return Ok(());
    }

    match Config::load(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("API:");
            println!("  Base URL:   {}", config.api.base_url);
            println!("  Timeout:    {}s", config.api.timeout_secs);
            println!();
            println!("UI:");
            println!("  Page size:  {}", config.ui.page_size);
            println!();
            println!("Session:");
            println!("  Store dir:  {}", config.session.store_dir.display());
            println!();
            println!("Logging:");
            println!("  Level:      {}", config.logging.level);
            println!();
            Ok(())
        }
        Err(e) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {:#}", e);
            println!();
            anyhow::bail!("Invalid configuration file");
        }
    }
}
