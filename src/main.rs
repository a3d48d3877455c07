use std::sync::Arc;

use messbell::{
    appsettings::AppSettings,
    menu::MenuData,
    notification::{LogNotificationSink, MealNotifier, NotificationSink, TelegramNotificationSink},
    ticker::{MealTicker, SystemClock},
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::load()?;
    let timezone = settings.timezone()?;
    let schedule = settings.weekly_schedule()?;

    let menu = match MenuData::load(&settings.mess.menu_path) {
        Ok(menu) => menu,
        Err(err) => {
            log::warn!("Menu unavailable, notifications will use meal names only. [error = {err:#}]");
            MenuData::default()
        }
    };

    let sink: Arc<dyn NotificationSink> = match &settings.telegram {
        Some(telegram) => {
            log::info!("Delivering notifications to Telegram. [chat_id = {}]", telegram.chat_id);
            Arc::new(TelegramNotificationSink::create(
                telegram.token.clone(),
                telegram.chat_id,
            ))
        }
        None => {
            log::info!("No Telegram settings, notifications will only be logged.");
            Arc::new(LogNotificationSink)
        }
    };

    let notifier = MealNotifier::new(settings.language())
        .with_icon(settings.notifications.icon.clone())
        .with_vibrate(settings.notifications.vibrate.clone());

    let ticker = MealTicker::new(
        notifier,
        Arc::new(schedule),
        Arc::new(menu),
        settings.mess.selected.clone(),
        sink,
        Arc::new(SystemClock::new(timezone)),
    )
    .with_tick_interval(settings.tick_interval());

    let cancellation_token = CancellationToken::new();
    let ticker_task = tokio::spawn(ticker.run(cancellation_token.clone()));

    tokio::signal::ctrl_c().await?;
    log::info!("Received Ctrl-C, shutting down.");
    cancellation_token.cancel();
    ticker_task.await?;

    Ok(())
}
