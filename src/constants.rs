/// The version of the crate.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PROVIDER_NAME: &str = "InMemoryProvider";

pub const EVENT_DROPPED_EVENT_ID: u16 = 4001;

pub const INITIALIZED_EVENT_ID: u16 = 5000;
pub const FLAGS_REPLACED_EVENT_ID: u16 = 5001;
pub const FLAG_UPSERTED_EVENT_ID: u16 = 5002;
pub const STATUS_CHANGED_EVENT_ID: u16 = 5003;
