use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::schedule::{DaySchedule, MealWindow, ScheduleProvider};

/// Minutes before a meal starts (and before it ends) that get their own alert.
pub const ALERT_LEAD_MINUTES: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealPhase {
    Starting,
    Serving,
    Ending,
}

impl MealPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealPhase::Starting => "starting",
            MealPhase::Serving => "serving",
            MealPhase::Ending => "ending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertState {
    None,
    Starting {
        meal: MealWindow,
        minutes_until_start: i32,
    },
    Serving {
        meal: MealWindow,
        minutes_until_end: i32,
    },
    Ending {
        meal: MealWindow,
        minutes_until_end: i32,
    },
}

impl AlertState {
    pub fn meal(&self) -> Option<&MealWindow> {
        match self {
            AlertState::None => None,
            AlertState::Starting { meal, .. }
            | AlertState::Serving { meal, .. }
            | AlertState::Ending { meal, .. } => Some(meal),
        }
    }

    pub fn phase(&self) -> Option<MealPhase> {
        match self {
            AlertState::None => None,
            AlertState::Starting { .. } => Some(MealPhase::Starting),
            AlertState::Serving { .. } => Some(MealPhase::Serving),
            AlertState::Ending { .. } => Some(MealPhase::Ending),
        }
    }

    /// Short human readable headline, e.g. `"Lunch starts in 5 min"`.
    pub fn headline(&self) -> Option<String> {
        match self {
            AlertState::None => None,
            AlertState::Starting {
                meal,
                minutes_until_start,
            } => Some(format!(
                "{} starts in {} min (at {})",
                meal.name, minutes_until_start, meal.start
            )),
            AlertState::Serving { meal, .. } => {
                Some(format!("{} is live until {}", meal.name, meal.end))
            }
            AlertState::Ending {
                meal,
                minutes_until_end,
            } => Some(format!(
                "{} ends in {} min (closes at {})",
                meal.name, minutes_until_end, meal.end
            )),
        }
    }
}

/// Classifies `now` against the meal windows of a day. Windows are checked in
/// schedule order and the first one that claims `now` wins. Seconds are
/// ignored, so every minute count is a whole number of minutes.
///
/// A window shorter than [`ALERT_LEAD_MINUTES`] never reports `Serving`: its
/// ending threshold already lies at or before its start.
pub fn classify(now: NaiveTime, schedule: &DaySchedule) -> AlertState {
    let current = (now.hour() * 60 + now.minute()) as i32;

    for meal in schedule.windows() {
        let start = meal.start.minute_of_day();
        let end = meal.end.minute_of_day();

        if current >= start - ALERT_LEAD_MINUTES && current < start {
            return AlertState::Starting {
                meal: meal.clone(),
                minutes_until_start: start - current,
            };
        }

        if current >= start && current < end {
            let minutes_until_end = end - current;
            if current >= end - ALERT_LEAD_MINUTES {
                return AlertState::Ending {
                    meal: meal.clone(),
                    minutes_until_end,
                };
            }

            return AlertState::Serving {
                meal: meal.clone(),
                minutes_until_end,
            };
        }
    }

    AlertState::None
}

/// Looks the day up in `provider` first. No schedule means no active meal.
pub fn classify_at(now: NaiveDateTime, provider: &dyn ScheduleProvider) -> AlertState {
    match provider.schedule_for(now.date()) {
        Some(schedule) if !schedule.is_empty() => classify(now.time(), schedule),
        _ => AlertState::None,
    }
}
