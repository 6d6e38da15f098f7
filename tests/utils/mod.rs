#![allow(dead_code)]

use inmemory_flags::{Flag, ProviderEvent, EventReceiver};
use log::kv::Key;
use log::{set_max_level, Level, Log, Metadata, Record};
use std::cell::RefCell;

pub fn bool_flag() -> Flag {
    Flag::builder("bool-flag")
        .variant("on", true)
        .variant("off", false)
        .default_variant("on")
        .build()
        .unwrap()
}

pub fn str_flag(key: &str, value: &str) -> Flag {
    Flag::builder(key)
        .variant("default", value)
        .default_variant("default")
        .build()
        .unwrap()
}

pub fn drain(receiver: &mut EventReceiver) -> Vec<ProviderEvent> {
    let mut events = Vec::new();
    while let Some(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

pub struct RecordingLogger {}

impl RecordingLogger {
    thread_local!(pub static LOGS: RefCell<String> = RefCell::new(String::default()));
}

impl Log for RecordingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.target().contains("inmemory_flags")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        let event_id = record.key_values().get(Key::from("event_id")).unwrap();
        Self::LOGS.with_borrow_mut(|l| l.push_str(format!("{level} [{}] {}\n", event_id.to_u64().unwrap(), record.args()).as_str()));
    }

    fn flush(&self) {}
}

pub fn log_record_init() {
    set_max_level(log::LevelFilter::Info);
    _ = log::set_logger(&RecordingLogger {});
}
