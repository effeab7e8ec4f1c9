/// Side channel for failures of user actions, such as a toast in a UI.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, action: &str, message: &str);
}

/// Logs failures instead of showing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_error(&self, action: &str, message: &str) {
        tracing::warn!(action, "{}", message);
    }
}
