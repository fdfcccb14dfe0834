mod app;
mod message;
mod screens;
mod state;
mod widgets;

pub use app::{TagkeeperApp, run};
pub use message::Message;
pub use state::{AppState, Toast, ToastCollector};
