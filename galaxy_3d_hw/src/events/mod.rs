/// Engine event hubs

pub mod app_events;

pub use app_events::{AppActivationListener, AppEvent, Subscription, SubscriptionKey};
