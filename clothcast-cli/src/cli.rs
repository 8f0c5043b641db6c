use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use clothcast_core::{
    AgeGroup, Config, Gender, RecommendationOutcome, Style, UserPreferences,
    generate_recommendations,
};
use inquire::{Password, Select};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clothcast", version, about = "What to wear for the weather outside")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Preference overrides shared by both subcommands.
#[derive(Debug, Default, clap::Args)]
pub struct PreferenceArgs {
    /// male, female or other.
    #[arg(long)]
    pub gender: Option<String>,

    /// teen, adult or senior.
    #[arg(long)]
    pub age_group: Option<String>,

    /// basic, sporty, casual or professional.
    #[arg(long)]
    pub style: Option<String>,
}

impl PreferenceArgs {
    /// Overlay the given flags on `base`, rejecting unknown values.
    fn apply(&self, base: UserPreferences) -> anyhow::Result<UserPreferences> {
        let mut prefs = base;
        if let Some(g) = &self.gender {
            prefs.gender = Gender::try_from(g.as_str())?;
        }
        if let Some(a) = &self.age_group {
            prefs.age_group = AgeGroup::try_from(a.as_str())?;
        }
        if let Some(s) = &self.style {
            prefs.style = Style::try_from(s.as_str())?;
        }
        Ok(prefs)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and default preferences.
    Configure {
        /// API key; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,

        #[command(flatten)]
        prefs: PreferenceArgs,
    },

    /// Suggest clothing for the current weather at a location.
    Recommend {
        /// City or place name, e.g. "Paris" or "Portland, US".
        location: String,

        #[command(flatten)]
        prefs: PreferenceArgs,

        /// Pick preferences interactively.
        #[arg(long)]
        ask: bool,

        /// Print the raw outcome as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key, prefs } => configure(api_key, &prefs),
            Command::Recommend { location, prefs, ask, json } => {
                recommend(&location, &prefs, ask, json).await
            }
        }
    }
}

fn configure(api_key: Option<String>, prefs: &PreferenceArgs) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeatherMap API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    config.preferences = prefs.apply(config.preferences)?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn recommend(
    location: &str,
    args: &PreferenceArgs,
    ask: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;

    let mut prefs = args.apply(config.preferences)?;
    if ask {
        prefs = ask_preferences(prefs)?;
    }
    debug!(?prefs, location, "resolved request");

    let outcome = tokio::select! {
        outcome = generate_recommendations(&config, location, &prefs) => outcome,
        _ = tokio::signal::ctrl_c() => bail!("Interrupted"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    match outcome {
        RecommendationOutcome::Success { weather, recommendations } => {
            if !json {
                print!("{}", render::report(&weather, &recommendations));
            }
            Ok(())
        }
        RecommendationOutcome::Failure { error } => bail!(error),
    }
}

fn ask_preferences(current: UserPreferences) -> anyhow::Result<UserPreferences> {
    Ok(UserPreferences {
        gender: select("Gender:", Gender::all(), current.gender)?,
        age_group: select("Age group:", AgeGroup::all(), current.age_group)?,
        style: select("Style:", Style::all(), current.style)?,
    })
}

fn select<T>(message: &str, options: &[T], current: T) -> anyhow::Result<T>
where
    T: Copy + PartialEq + std::fmt::Display,
{
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    Select::new(message, options.to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .with_context(|| format!("Failed to read {}", message.trim_end_matches(':')))
}
