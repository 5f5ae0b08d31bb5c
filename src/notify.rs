//! Blocking notifications shown to the user.

use std::io::{self, Write as _};

use crate::ui::Ui;

/// Something which can get the user's attention.
pub trait Notifier: Send + Sync + 'static {
    /// Show `message` to the user. Returns once the message has been shown.
    fn alert(&self, message: &str);
}

/// Writes alerts to standard error, pausing any progress bars first.
#[derive(Clone)]
pub struct StderrNotifier {
    ui: Ui,
}

impl StderrNotifier {
    pub fn new(ui: Ui) -> Self {
        Self { ui }
    }
}

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        self.ui.multi_progress().suspend(|| {
            let mut stderr = io::stderr().lock();
            // Nowhere to report a failure to write to stderr.
            let _ = writeln!(stderr, "⚠️  {message}");
            let _ = stderr.flush();
        });
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::Notifier;

    /// Records every alert.
    #[derive(Default)]
    pub struct RecordingNotifier {
        alerts: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn alerts(&self) -> Vec<String> {
            self.alerts.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_owned());
        }
    }
}
