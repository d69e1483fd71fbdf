use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, Weekday};
use dotenvy::dotenv;
use std::env;

use crate::domains::lunch::{EventWindow, LunchSettings};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub slack_signing_secret: String,
    pub slash_command: String,
    pub publish_channel_url: String,
    pub publish_channel_id: String,
    pub lunch_weekday: Weekday,
    pub publish_hour: u32,
    pub reminder_hour: u32,
    pub utc_offset_hours: i32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let config = Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            slack_signing_secret: env::var("SLACK_SIGNING_SECRET")
                .context("SLACK_SIGNING_SECRET must be set")?,
            slash_command: env::var("SLASH_COMMAND")
                .unwrap_or_else(|_| "/social-lunch".to_string()),
            publish_channel_url: env::var("PUBLISH_CHANNEL_URL")
                .context("PUBLISH_CHANNEL_URL must be set")?,
            publish_channel_id: env::var("PUBLISH_CHANNEL_ID")
                .unwrap_or_else(|_| "#social-lunch".to_string()),
            lunch_weekday: env::var("LUNCH_WEEKDAY")
                .unwrap_or_else(|_| "Fri".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("LUNCH_WEEKDAY must be a weekday name"))?,
            publish_hour: parse_hour("PUBLISH_HOUR", "11")?,
            reminder_hour: parse_hour("REMINDER_HOUR", "9")?,
            utc_offset_hours: env::var("EVENT_UTC_OFFSET_HOURS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("EVENT_UTC_OFFSET_HOURS must be a whole number of hours")?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.reminder_hour >= self.publish_hour {
            bail!(
                "REMINDER_HOUR ({}) must be before PUBLISH_HOUR ({})",
                self.reminder_hour,
                self.publish_hour
            );
        }
        self.utc_offset()?;
        Ok(())
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .with_context(|| format!("invalid UTC offset: {} hours", self.utc_offset_hours))
    }

    /// Lunch lifecycle settings derived from this configuration
    pub fn lunch_settings(&self) -> Result<LunchSettings> {
        Ok(LunchSettings {
            window: EventWindow::new(self.lunch_weekday, self.publish_hour, self.utc_offset()?),
            reminder_hour: self.reminder_hour,
            publish_channel_url: self.publish_channel_url.clone(),
            publish_channel_id: self.publish_channel_id.clone(),
            slash_command: self.slash_command.clone(),
        })
    }
}

fn parse_hour(name: &str, default: &str) -> Result<u32> {
    let hour: u32 = env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .with_context(|| format!("{} must be a valid hour", name))?;
    if hour > 23 {
        bail!("{} must be between 0 and 23, got {}", name, hour);
    }
    Ok(hour)
}
