macro_rules! from_val_to_enum {
    ($ob:ident $to:ident $($t:ty)*) => ($(
        impl From<$t> for $ob {
            fn from(value: $t) -> Self {
                Self::$to(value)
            }
        }
    )*)
}

macro_rules! from_val_to_enum_into {
    ($ob:ident $to:ident $($t:ty)*) => ($(
        impl From<$t> for $ob {
            fn from(value: $t) -> Self {
                Self::$to(value.into())
            }
        }
    )*)
}

macro_rules! log_resolution_err {
    ($err:expr) => {
        match $err.error_type {
            $crate::errors::ErrorType::ProviderNotReady | $crate::errors::ErrorType::FlagNotFound => {
                log::warn!(event_id = $err.error_type.code(); "{}", $err)
            }
            _ => log::error!(event_id = $err.error_type.code(); "{}", $err),
        }
    };
}
