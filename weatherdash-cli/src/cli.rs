use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Confirm, Password, Text};
use std::sync::Arc;
use weatherdash_core::{
    ApiKey, Config, Dashboard, LookupOutcome, RenderModel,
    config::DEFAULT_CITY,
    location::{FixedPosition, GeolocationSource, Unavailable},
    provider_from_config, verify_api_key,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    /// OpenWeather API key; overrides the one in the config file.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to look the weather up.
#[derive(Debug, Clone, clap::Args)]
pub struct Place {
    /// City name. Without it the device position is tried first, then the
    /// configured default city.
    pub city: Option<String>,

    /// Use the device position only, no fallback.
    #[arg(long, conflicts_with = "city")]
    pub here: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default city.
    Configure,

    /// Show current conditions and the 5-day forecast.
    Show {
        #[command(flatten)]
        place: Place,
    },

    /// Show the 3-hourly breakdown of one forecast day.
    Hourly {
        #[command(flatten)]
        place: Place,

        /// Day to expand: 0 is today, 4 the last forecast day.
        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..5))]
        day: u8,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(key) = self.api_key {
            config.set_api_key(ApiKey::new(key));
        }

        match self.command {
            Command::Configure => configure(config).await,
            Command::Show { place } => {
                let model = lookup(&config, &place).await?;
                render::print_current(&model.current);
                println!();
                render::print_daily(&model.daily);
                Ok(())
            }
            Command::Hourly { place, day } => {
                let model = lookup(&config, &place).await?;
                let day = usize::from(day);
                let Some(summary) = model.daily.get(day) else {
                    bail!(
                        "The forecast only covers {} day(s); day {day} is not available.",
                        model.daily.len()
                    );
                };
                render::print_hourly(summary, &model.hourly(day));
                Ok(())
            }
        }
    }
}

async fn lookup(config: &Config, place: &Place) -> anyhow::Result<RenderModel<chrono::Local>> {
    let provider = provider_from_config(config)?;
    let dashboard = Dashboard::new(provider, geolocation_source(config));

    let outcome = match (&place.city, place.here) {
        (Some(city), _) => dashboard.search(city).await?,
        (None, true) => dashboard.locate().await?,
        (None, false) => dashboard.locate_or_search(&config.default_city).await?,
    };

    match outcome {
        LookupOutcome::Applied(model) => Ok(model),
        LookupOutcome::Superseded => bail!("Lookup was superseded by a newer one."),
    }
}

fn geolocation_source(config: &Config) -> Arc<dyn GeolocationSource> {
    match &config.position {
        Some(position) => Arc::new(FixedPosition::from(position)),
        None => Arc::new(Unavailable),
    }
}

async fn configure(mut config: Config) -> anyhow::Result<()> {
    let key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Get a free key at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(ApiKey::new(key));

    let city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;
    let city = city.trim();
    config.default_city = if city.is_empty() { DEFAULT_CITY.to_string() } else { city.to_string() };

    let provider = provider_from_config(&config)?;
    println!("Checking API key...");
    if let Err(e) = verify_api_key(provider.as_ref(), &config.default_city).await {
        tracing::warn!(error = %e, city = %config.default_city, "API key check failed");
        println!("API key check failed: {e}");
        let save = Confirm::new("Save this key anyway?")
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
        if !save {
            bail!("Configuration not saved.");
        }
    } else {
        println!("API key is working.");
    }

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
