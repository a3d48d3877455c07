use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MealTime {
    pub hour: u32,
    pub minute: u32,
}

impl MealTime {
    pub fn new(hour: u32, minute: u32) -> anyhow::Result<Self> {
        anyhow::ensure!(
            hour < 24 && minute < 60,
            "Meal time is out of range. [hour = {hour}, minute = {minute}]"
        );
        Ok(Self { hour, minute })
    }

    pub fn minute_of_day(&self) -> i32 {
        (self.hour * 60 + self.minute) as i32
    }
}

impl From<NaiveTime> for MealTime {
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }
}

impl FromStr for MealTime {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")?;
        Ok(time.into())
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealWindow {
    pub name: String,
    pub start: MealTime,
    pub end: MealTime,
}

impl MealWindow {
    pub fn new(name: impl Into<String>, start: MealTime, end: MealTime) -> anyhow::Result<Self> {
        let name = name.into();
        anyhow::ensure!(
            start < end,
            "Meal window must start before it ends. [meal = {name}, start = {start}, end = {end}]"
        );
        Ok(Self { name, start, end })
    }

    /// Key used by the menu data source, e.g. `"breakfast"`.
    pub fn meal_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Meal windows of a single day, ordered by start time and never overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySchedule {
    windows: Vec<MealWindow>,
}

impl DaySchedule {
    pub fn new(mut windows: Vec<MealWindow>) -> anyhow::Result<Self> {
        windows.sort_by_key(|w| w.start);
        for pair in windows.windows(2) {
            anyhow::ensure!(
                pair[0].end <= pair[1].start,
                "Meal windows overlap. [first = {}, second = {}]",
                pair[0].name,
                pair[1].name
            );
        }
        Ok(Self { windows })
    }

    pub fn windows(&self) -> &[MealWindow] {
        &self.windows
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

pub trait ScheduleProvider: Send + Sync {
    fn schedule_for(&self, date: NaiveDate) -> Option<&DaySchedule>;
}

#[derive(Debug, Clone, Default)]
pub struct WeeklySchedule {
    days: HashMap<Weekday, DaySchedule>,
    default: Option<DaySchedule>,
}

impl WeeklySchedule {
    pub fn new(default: Option<DaySchedule>) -> Self {
        Self {
            days: HashMap::new(),
            default,
        }
    }

    pub fn with_day(mut self, weekday: Weekday, schedule: DaySchedule) -> Self {
        self.days.insert(weekday, schedule);
        self
    }

    pub fn set_day(&mut self, weekday: Weekday, schedule: DaySchedule) {
        self.days.insert(weekday, schedule);
    }

    /// Weekdays: Breakfast 07:30, Lunch 12:30, Snacks 16:45, Dinner 19:30.
    /// Weekends push breakfast back by half an hour.
    pub fn builtin() -> Self {
        let weekday = day_schedule(&[
            ("Breakfast", (7, 30), (9, 30)),
            ("Lunch", (12, 30), (14, 15)),
            ("Snacks", (16, 45), (17, 45)),
            ("Dinner", (19, 30), (21, 30)),
        ]);
        let weekend = day_schedule(&[
            ("Breakfast", (8, 0), (10, 0)),
            ("Lunch", (12, 30), (14, 15)),
            ("Snacks", (16, 45), (17, 45)),
            ("Dinner", (19, 30), (21, 30)),
        ]);

        Self::new(Some(weekday))
            .with_day(Weekday::Sat, weekend.clone())
            .with_day(Weekday::Sun, weekend)
    }
}

impl ScheduleProvider for WeeklySchedule {
    fn schedule_for(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.days.get(&date.weekday()).or(self.default.as_ref())
    }
}

fn day_schedule(meals: &[(&str, (u32, u32), (u32, u32))]) -> DaySchedule {
    let windows = meals
        .iter()
        .map(|(name, (sh, sm), (eh, em))| MealWindow {
            name: name.to_string(),
            start: MealTime {
                hour: *sh,
                minute: *sm,
            },
            end: MealTime {
                hour: *eh,
                minute: *em,
            },
        })
        .collect();

    DaySchedule { windows }
}

/// Day key used by the menu data source, e.g. `"monday"`.
pub fn day_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub fn parse_weekday(key: &str) -> Option<Weekday> {
    key.trim().parse::<Weekday>().ok()
}
