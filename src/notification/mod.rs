mod telegram;
pub mod templates;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::{
    classifier::{self, AlertState, MealPhase},
    schedule::{MealWindow, ScheduleProvider},
};

pub use telegram::TelegramNotificationSink;
pub use templates::{FixedRandom, Language, RandomSource, ThreadRandom};

pub const DEFAULT_VIBRATE: [u32; 3] = [200, 100, 200];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Notifications sharing a tag replace each other instead of stacking.
    pub tag: String,
    pub icon: Option<String>,
    pub vibrate: Vec<u32>,
}

#[derive(Debug, Error)]
pub enum NotificationSinkError {
    #[error(transparent)]
    Telegram(#[from] teloxide::RequestError),

    #[error("Notifications are not available: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn send_notification(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationSinkError>;
}

/// Writes notifications to the log. Used when no delivery channel is configured.
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn send_notification(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationSinkError> {
        log::info!(
            "[NOTIFY] {} {} [tag = {}]",
            notification.title,
            notification.body,
            notification.tag
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationKey {
    pub date: NaiveDate,
    pub meal: String,
    pub phase: MealPhase,
}

impl NotificationKey {
    pub fn new(date: NaiveDate, meal: &MealWindow, phase: MealPhase) -> Self {
        Self {
            date,
            meal: meal.name.clone(),
            phase,
        }
    }

    pub fn tag(&self) -> String {
        format!(
            "{}-{}-{}",
            self.date.format("%Y-%m-%d"),
            self.meal,
            self.phase.as_str()
        )
    }
}

/// In-memory record of what was already sent. Everything is forgotten as soon
/// as a key for a different date is recorded.
#[derive(Debug, Default)]
pub struct NotificationLedger {
    date: Option<NaiveDate>,
    sent: HashSet<NotificationKey>,
}

impl NotificationLedger {
    /// Returns `false` if the key was already recorded.
    pub fn record(&mut self, key: NotificationKey) -> bool {
        if self.date != Some(key.date) {
            if !self.sent.is_empty() {
                log::debug!(
                    "Date changed, clearing notification ledger. [entries = {}]",
                    self.sent.len()
                );
            }
            self.sent.clear();
            self.date = Some(key.date);
        }

        self.sent.insert(key)
    }

    pub fn contains(&self, key: &NotificationKey) -> bool {
        self.sent.contains(key)
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub alert: AlertState,
    pub notification: Option<Notification>,
}

/// Turns clock ticks into alert states and at most one "starting"
/// notification per meal and day.
pub struct MealNotifier {
    language: Language,
    icon: Option<String>,
    vibrate: Vec<u32>,
    ledger: NotificationLedger,
    random: Box<dyn RandomSource + Send>,
}

impl MealNotifier {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            icon: None,
            vibrate: DEFAULT_VIBRATE.to_vec(),
            ledger: NotificationLedger::default(),
            random: Box::new(ThreadRandom),
        }
    }

    pub fn with_random(mut self, random: impl RandomSource + Send + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_vibrate(mut self, vibrate: Vec<u32>) -> Self {
        self.vibrate = vibrate;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn ledger(&self) -> &NotificationLedger {
        &self.ledger
    }

    /// `items` is only consulted when a notification is about to be built.
    pub fn tick<F>(
        &mut self,
        now: NaiveDateTime,
        schedule: &dyn ScheduleProvider,
        items: F,
    ) -> TickOutcome
    where
        F: FnOnce(&MealWindow) -> Vec<String>,
    {
        let alert = classifier::classify_at(now, schedule);

        let notification = match &alert {
            AlertState::Starting { meal, .. } => {
                let key = NotificationKey::new(now.date(), meal, MealPhase::Starting);
                if self.ledger.record(key.clone()) {
                    let meal_items = items(meal);
                    Some(self.build_notification(meal, &meal_items, key.tag()))
                } else {
                    None
                }
            }
            _ => None,
        };

        TickOutcome {
            alert,
            notification,
        }
    }

    fn build_notification(&mut self, meal: &MealWindow, items: &[String], tag: String) -> Notification {
        let body =
            templates::flirty_message(self.language, &meal.name, items, self.random.as_mut());

        Notification {
            title: format!("🍽️ {} Time!", meal.name),
            body,
            tag,
            icon: self.icon.clone(),
            vibrate: self.vibrate.clone(),
        }
    }
}
