use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

const MAX_CONSOLE_LINES: usize = 400;
const OWN_TARGETS: [&str; 2] = ["lookdev", "render"];

/// Recent log lines shown in the console panel.
#[derive(Clone, Default)]
pub(crate) struct ConsoleBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl ConsoleBuffer {
    pub(crate) fn push_line(&self, line: String) {
        let mut lines = self.lines.lock().expect("console buffer lock");
        lines.push_back(line);
        while lines.len() > MAX_CONSOLE_LINES {
            lines.pop_front();
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<String> {
        let lines = self.lines.lock().expect("console buffer lock");
        lines.iter().cloned().collect()
    }

    pub(crate) fn clear(&self) {
        self.lines.lock().expect("console buffer lock").clear();
    }
}

/// Level applied to look-dev targets, adjustable while running.
#[derive(Clone)]
pub(crate) struct LogLevelHandle {
    level: Arc<AtomicU8>,
}

impl LogLevelHandle {
    fn new(level: LevelFilter) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(encode_level(level))),
        }
    }

    pub(crate) fn get(&self) -> LevelFilter {
        decode_level(self.level.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, level: LevelFilter) {
        self.level.store(encode_level(level), Ordering::Relaxed);
    }

    fn allows(&self, target: &str, level: &Level) -> bool {
        let own = OWN_TARGETS.iter().any(|prefix| target.starts_with(prefix));
        let limit = if own { self.get() } else { LevelFilter::WARN };
        limit >= *level
    }
}

struct ConsoleWriter {
    buffer: ConsoleBuffer,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for line in String::from_utf8_lossy(buf).lines() {
            self.buffer.push_line(line.to_string());
        }
        let _ = io::stdout().write_all(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

pub(crate) fn setup_tracing() -> (ConsoleBuffer, LogLevelHandle) {
    let console = ConsoleBuffer::default();
    let level = LogLevelHandle::new(LevelFilter::INFO);
    let filter_level = level.clone();
    let filter = tracing_subscriber::filter::filter_fn(move |metadata| {
        filter_level.allows(metadata.target(), metadata.level())
    });
    let writer_console = console.clone();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(move || ConsoleWriter {
            buffer: writer_console.clone(),
        });

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    (console, level)
}

fn encode_level(level: LevelFilter) -> u8 {
    match level {
        LevelFilter::OFF => 0,
        LevelFilter::ERROR => 1,
        LevelFilter::WARN => 2,
        LevelFilter::INFO => 3,
        LevelFilter::DEBUG => 4,
        LevelFilter::TRACE => 5,
    }
}

fn decode_level(value: u8) -> LevelFilter {
    match value {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
