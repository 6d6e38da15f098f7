pub mod definition;
pub mod enums;
pub mod flag;
