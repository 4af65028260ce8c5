pub mod console_sink;
pub mod memory_sink;
pub mod types;

pub use self::console_sink::ConsoleLogSink;
pub use self::memory_sink::MemoryLogSink;
pub use self::types::{CheckAction, CheckLogEntry, CheckLogSink};

use crate::config::LoggingConfig;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Fans check log entries out to the configured sinks. Each sink runs on
/// its own channel so a slow sink never blocks the check path.
pub struct CheckLogger {
    sinks: Vec<mpsc::Sender<CheckLogEntry>>,
}

impl CheckLogger {
    pub fn new(config: LoggingConfig, extra_sinks: Vec<Box<dyn CheckLogSink>>) -> Arc<Self> {
        let mut sinks = Vec::new();

        for sink_type in &config.check_log_sinks {
            if sink_type == "console" {
                let console_sink = ConsoleLogSink::new(config.clone());
                sinks.push(Self::spawn_sink(Box::new(console_sink)));
            } else {
                eprintln!("Unknown check log sink type: {}", sink_type);
            }
        }

        for sink in extra_sinks {
            sinks.push(Self::spawn_sink(sink));
        }

        Arc::new(Self { sinks })
    }

    fn spawn_sink(sink: Box<dyn CheckLogSink>) -> mpsc::Sender<CheckLogEntry> {
        let (tx, mut rx) = mpsc::channel(1000);
        tokio::spawn(async move {
            while let Some(entry) = rx.recv().await {
                sink.log(&entry);
            }
        });
        tx
    }

    pub async fn log(&self, entry: CheckLogEntry) {
        let len = self.sinks.len();
        for (i, sink) in self.sinks.iter().enumerate() {
            // Fire and forget, don't block caller if buffer full
            if i == len - 1 {
                let _ = sink.try_send(entry);
                break;
            }
            let _ = sink.try_send(entry.clone());
        }
    }
}
