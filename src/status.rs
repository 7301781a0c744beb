//! Progress and error text sinks

use log::{error, info};

/// Receives human-readable progress and error text. Side-effect only;
/// never a decision-maker.
pub trait StatusReporter {
    fn status(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Prints to the console and mirrors everything to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleReporter;

impl StatusReporter for ConsoleReporter {
    fn status(&mut self, message: &str) {
        info!("{message}");
        println!("{message}");
    }

    fn error(&mut self, message: &str) {
        error!("{message}");
        eprintln!("{message}");
    }
}

/// Collects messages for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub messages: Vec<String>,
    pub errors: Vec<String>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusReporter for RecordingReporter {
    fn status(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
