pub mod appsettings;
pub mod classifier;
pub mod corrections;
pub mod matcher;
pub mod menu;
pub mod notification;
pub mod ratings;
pub mod schedule;
pub mod ticker;
