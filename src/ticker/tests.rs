use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tokio::time::Instant;

use super::*;
use crate::{
    notification::{FixedRandom, Language, NotificationSinkError},
    schedule::{DaySchedule, MealWindow, WeeklySchedule},
};

type ReceivedNotifications = Arc<Mutex<Vec<Notification>>>;

/// Wall clock that follows tokio's (paused) clock from a fixed start.
struct PausedClock {
    start: NaiveDateTime,
    origin: Instant,
}

impl PausedClock {
    fn starting_at(start: NaiveDateTime) -> Self {
        Self {
            start,
            origin: Instant::now(),
        }
    }
}

impl Clock for PausedClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed = chrono::Duration::from_std(self.origin.elapsed()).unwrap();
        self.start + elapsed
    }
}

#[derive(Clone, Default)]
struct TestSink {
    received: ReceivedNotifications,
    fail: bool,
}

#[async_trait]
impl NotificationSink for TestSink {
    async fn send_notification(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationSinkError> {
        self.received.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(NotificationSinkError::Unavailable("test sink".to_string()));
        }
        Ok(())
    }
}

fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 2)
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
}

fn schedule() -> Arc<WeeklySchedule> {
    let lunch = MealWindow::new("Lunch", "12:30".parse().unwrap(), "14:00".parse().unwrap()).unwrap();
    Arc::new(WeeklySchedule::new(Some(DaySchedule::new(vec![lunch]).unwrap())))
}

fn menu() -> Arc<MenuData> {
    let menu = MenuData::from_json(
        r#"{ "mess1": { "monday": { "lunch": ["Rice", "Chicken Biryani", "Raita"] } } }"#,
    )
    .unwrap();
    Arc::new(menu)
}

fn ticker(sink: TestSink, start: NaiveDateTime) -> MealTicker {
    let notifier = MealNotifier::new(Language::English).with_random(FixedRandom(0));
    MealTicker::new(
        notifier,
        schedule(),
        menu(),
        "mess1",
        Arc::new(sink),
        Arc::new(PausedClock::starting_at(start)),
    )
}

#[tokio::test(start_paused = true)]
pub async fn ticking_through_lunch_sends_one_notification() {
    let sink = TestSink::default();
    let token = CancellationToken::new();
    let task = tokio::spawn(ticker(sink.clone(), monday_at(12, 0)).run(token.clone()));

    tokio::time::sleep(Duration::from_secs(3 * 60 * 60)).await;
    token.cancel();
    task.await.unwrap();

    let received = sink.received.lock().unwrap();
    assert_eq!(received.len(), 1, "received = {received:?}");
    assert_eq!(received[0].tag, "2025-06-02-Lunch-starting");
    assert_eq!(received[0].title, "🍽️ Lunch Time!");
    assert!(received[0].body.contains("Chicken"), "body = {}", received[0].body);
}

#[tokio::test(start_paused = true)]
pub async fn outside_meal_windows_nothing_is_sent() {
    let sink = TestSink::default();
    let token = CancellationToken::new();
    let task = tokio::spawn(ticker(sink.clone(), monday_at(15, 0)).run(token.clone()));

    tokio::time::sleep(Duration::from_secs(2 * 60 * 60)).await;
    token.cancel();
    task.await.unwrap();

    assert!(sink.received.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
pub async fn sink_failure_does_not_stop_ticker() {
    let sink = TestSink {
        fail: true,
        ..Default::default()
    };
    let token = CancellationToken::new();
    let task = tokio::spawn(ticker(sink.clone(), monday_at(12, 20)).run(token.clone()));

    tokio::time::sleep(Duration::from_secs(60 * 60)).await;
    assert!(!task.is_finished());

    token.cancel();
    task.await.unwrap();
    assert_eq!(sink.received.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
pub async fn cancelled_ticker_returns() {
    let token = CancellationToken::new();
    token.cancel();

    ticker(TestSink::default(), monday_at(12, 20))
        .with_tick_interval(Duration::from_secs(1))
        .run(token)
        .await;
}
