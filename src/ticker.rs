use std::{sync::Arc, time::Duration};

use chrono::{Datelike, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{
    classifier::AlertState,
    menu::MenuData,
    notification::{MealNotifier, Notification, NotificationSink},
    schedule::ScheduleProvider,
};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Source of the mess-local wall clock time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

pub struct MealTicker {
    notifier: MealNotifier,
    schedule: Arc<dyn ScheduleProvider>,
    menu: Arc<MenuData>,
    mess: String,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
}

impl MealTicker {
    pub fn new(
        notifier: MealNotifier,
        schedule: Arc<dyn ScheduleProvider>,
        menu: Arc<MenuData>,
        mess: impl Into<String>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifier,
            schedule,
            menu,
            mess: mess.into(),
            sink,
            clock,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub async fn run(mut self, cancellation_token: CancellationToken) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut current = AlertState::None;

        log::info!(
            "[TICKER] Meal ticker started. [mess = {}, interval_secs = {}, language = {}]",
            self.mess,
            self.tick_interval.as_secs(),
            self.notifier.language().label()
        );

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    log::info!("[TICKER] Meal ticker shutting down.");
                    break;
                }
                _ = interval.tick() => {
                    current = self.tick(current);
                }
            }
        }
    }

    fn tick(&mut self, previous: AlertState) -> AlertState {
        let now = self.clock.now();
        let weekday = now.weekday();
        let menu = &self.menu;
        let mess = &self.mess;

        let outcome = self.notifier.tick(now, self.schedule.as_ref(), |meal| {
            menu.items_for(mess, weekday, &meal.meal_key()).to_vec()
        });

        log::debug!("[TICK] {:?} [now = {}]", outcome.alert, now);
        if outcome.alert != previous {
            log_transition(&outcome.alert);
        }

        if let Some(notification) = outcome.notification {
            self.dispatch(notification);
        }

        outcome.alert
    }

    fn dispatch(&self, notification: Notification) {
        log::info!(
            "[STARTING] Dispatching notification. [tag = {}]",
            notification.tag
        );

        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(err) = sink.send_notification(&notification).await {
                log::warn!(
                    "Failed to deliver notification. [tag = {}, error = {}]",
                    notification.tag,
                    err
                );
            }
        });
    }
}

fn log_transition(alert: &AlertState) {
    match (alert.phase(), alert.headline()) {
        (Some(phase), Some(headline)) => {
            log::info!("[{}] {}", phase.as_str().to_uppercase(), headline)
        }
        _ => log::info!("[IDLE] No meal is being served."),
    }
}

#[cfg(test)]
mod tests;
