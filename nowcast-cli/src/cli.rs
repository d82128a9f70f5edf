use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode};
use nowcast_core::{
    Config, Severity, WeatherApp, geolocator_from_config, provider_from_config, render_text,
};

use crate::interactive;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nowcast", version, about = "Current weather for a city or your location")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive session; looks up the current location on start.
    Run,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,
    },

    /// Show current weather for the current location.
    Here,

    /// Set the OpenWeather API key and geolocation preference.
    Configure,

    /// Print the config file location.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => {
                let app = build_app()?;
                interactive::run(app).await?;
            }
            Command::Show { city } => {
                let mut app = build_app()?;
                app.set_input(&city);
                app.submit_search().await;
                finish_one_shot(app)?;
            }
            Command::Here => {
                let mut app = build_app()?;
                app.use_current_location().await;
                finish_one_shot(app)?;
            }
            Command::Configure => configure()?,
            Command::ConfigPath => println!("{}", Config::config_file_path()?.display()),
        }

        Ok(())
    }
}

fn build_app() -> anyhow::Result<WeatherApp> {
    let config = Config::load()?.with_env_overrides();
    let provider = provider_from_config(&config)?;
    let geolocator = geolocator_from_config(&config.geolocation);

    Ok(WeatherApp::new(provider, geolocator))
}

/// Print the final page; a destructive notification makes the command fail.
fn finish_one_shot(mut app: WeatherApp) -> anyhow::Result<()> {
    let notes = app.take_notifications();
    interactive::print_notifications(&notes);
    print!("{}", render_text(app.state()));

    if let Some(note) = notes.iter().find(|n| n.severity == Severity::Destructive) {
        anyhow::bail!("{}", note.body);
    }
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    config.set_api_key(api_key);

    config.geolocation.enabled = Confirm::new("Allow looking up your location by IP address?")
        .with_default(config.geolocation.enabled)
        .prompt()
        .context("Failed to read geolocation preference")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
