//! Tabular input resolution

pub mod frame;
pub mod timestamp;

pub use frame::RawFrame;
pub use timestamp::parse_timestamp;
