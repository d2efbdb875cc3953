pub mod manager;
pub mod notifier;
pub mod webhook;

pub use manager::NotifyManager;
pub use notifier::{Notifier, NotifyResult};
pub use webhook::{WebhookConfig, WebhookNotifier};
