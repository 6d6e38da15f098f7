use crate::utils::{bool_flag, log_record_init, str_flag, RecordingLogger};
use inmemory_flags::InMemoryProvider;

mod utils;

#[tokio::test]
async fn resolution_failures_are_logged() {
    log_record_init();

    let provider = InMemoryProvider::with_flags(vec![bool_flag(), str_flag("str-flag", "hello")]).unwrap();

    _ = provider.resolve_bool("bool-flag", false, None).await;
    let logs = RecordingLogger::LOGS.take();
    assert!(logs.contains("WARNING [1000] Failed to resolve flag 'bool-flag' (provider not yet initialized)."));

    provider.initialize(None).await.unwrap();
    let logs = RecordingLogger::LOGS.take();
    assert!(logs.contains("INFO [5000] Provider 'InMemoryProvider' initialized"));

    _ = provider.resolve_bool("missing", false, None).await;
    let logs = RecordingLogger::LOGS.take();
    assert!(logs.contains("WARNING [1001] Failed to resolve flag 'missing'"));

    _ = provider.resolve_int("str-flag", 0, None).await;
    let logs = RecordingLogger::LOGS.take();
    assert!(logs.contains("ERROR [2002] The type of flag 'str-flag' must match the requested type."));

    _ = provider.resolve_bool("bool-flag", false, None).await;
    assert!(RecordingLogger::LOGS.take().is_empty());
}
