use std::{collections::HashMap, path::PathBuf, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{
    notification::{DEFAULT_VIBRATE, Language},
    schedule::{DaySchedule, MealWindow, WeeklySchedule, parse_weekday},
};

const DEFAULT_SCHEDULE_KEY: &str = "default";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NotificationSettings {
    pub language: String,
    pub tick_interval_secs: u64,
    pub icon: Option<String>,
    pub vibrate: Vec<u32>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            language: Language::default().key().to_string(),
            tick_interval_secs: 60,
            icon: None,
            vibrate: DEFAULT_VIBRATE.to_vec(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MessSettings {
    pub selected: String,
    pub timezone: String,
    pub menu_path: PathBuf,
}

impl Default for MessSettings {
    fn default() -> Self {
        Self {
            selected: "mess1".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            menu_path: PathBuf::from("data/menu.json"),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct MealWindowSettings {
    pub name: String,
    pub start: String,
    pub end: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TelegramSettings {
    pub token: String,
    pub chat_id: i64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub mess: MessSettings,
    /// Keyed by lowercase weekday name or `default`.
    #[serde(default)]
    pub schedule: HashMap<String, Vec<MealWindowSettings>>,
    pub telegram: Option<TelegramSettings>,
}

impl AppSettings {
    /// `appsettings` is required, `appsettings.local` overrides it and
    /// `APP__SECTION__KEY` environment variables override both.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("appsettings").required(true))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn language(&self) -> Language {
        Language::from_key(&self.notifications.language)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.notifications.tick_interval_secs.max(1))
    }

    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.mess
            .timezone
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("Unknown timezone. [timezone = {}]", self.mess.timezone))
    }

    /// Falls back to the built-in schedule when no `schedule` table is configured.
    pub fn weekly_schedule(&self) -> anyhow::Result<WeeklySchedule> {
        if self.schedule.is_empty() {
            return Ok(WeeklySchedule::builtin());
        }

        let default = self
            .schedule
            .get(DEFAULT_SCHEDULE_KEY)
            .map(|windows| day_schedule(DEFAULT_SCHEDULE_KEY, windows))
            .transpose()?;
        let mut weekly = WeeklySchedule::new(default);

        for (key, windows) in &self.schedule {
            if key == DEFAULT_SCHEDULE_KEY {
                continue;
            }
            let Some(weekday) = parse_weekday(key) else {
                anyhow::bail!("Unknown schedule day. [day = {key}]");
            };
            weekly.set_day(weekday, day_schedule(key, windows)?);
        }

        Ok(weekly)
    }
}

fn day_schedule(day: &str, windows: &[MealWindowSettings]) -> anyhow::Result<DaySchedule> {
    let windows = windows
        .iter()
        .map(|window| {
            MealWindow::new(
                window.name.trim(),
                window.start.parse()?,
                window.end.parse()?,
            )
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .with_context(|| format!("Invalid meal window in schedule. [day = {day}]"))?;

    DaySchedule::new(windows).with_context(|| format!("Invalid schedule. [day = {day}]"))
}
