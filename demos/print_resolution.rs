use inmemory_flags::*;
use log::kv::Key;
use log::{Level, LevelFilter, Log, Metadata, Record};

#[tokio::main]
async fn main() {
    // Info level shows resolution failures and lifecycle changes.
    log::set_max_level(LevelFilter::Info);
    log::set_logger(&PrintLog {}).unwrap();

    let provider = InMemoryProvider::with_flags(vec![
        Flag::builder("isAwesomeFeatureEnabled")
            .variant("on", true)
            .variant("off", false)
            .default_variant("on")
            .build()
            .unwrap(),
        Flag::builder("greeting")
            .variant("default", "hello")
            .default_variant("default")
            .build()
            .unwrap(),
    ])
    .unwrap();
    let mut events = provider.event_receiver().unwrap();

    let listener = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!(
                "event: {} from '{}', changed: {:?}",
                event.event_type, event.provider_name, event.flags_changed
            );
        }
    });

    let early = provider
        .resolve_bool("isAwesomeFeatureEnabled", false, None)
        .await;
    println!("before initialize: {early:?}");

    provider.initialize(None).await.unwrap();

    let context = EvaluationContext::new("#SOME-USER-ID#").custom("Email", "someone@example.com");
    let is_awesome_enabled = provider
        .resolve_bool("isAwesomeFeatureEnabled", false, Some(&context))
        .await;
    println!("isAwesomeFeatureEnabled: {}", is_awesome_enabled.value);

    let mismatch = provider.resolve_int("greeting", 0, None).await;
    println!("greeting as int: {mismatch:?}");

    provider
        .update_flag(
            Flag::builder("greeting")
                .variant("default", "szia")
                .default_variant("default")
                .build()
                .unwrap(),
        )
        .await;
    println!(
        "greeting: {}",
        provider.resolve_str("greeting", "", None).await.value
    );

    drop(provider);
    listener.await.unwrap();
}

pub struct PrintLog {}

impl Log for PrintLog {
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
        let event_id = record.key_values().get(Key::from("event_id"));
        match event_id {
            Some(id) => println!("{level} [{id}] {}", record.args()),
            None => println!("{level} {}", record.args()),
        }
    }

    fn flush(&self) {}
}
