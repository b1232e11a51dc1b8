//! Command implementations for papershelf

pub mod device;
pub mod dispatch;
pub mod ingest;
pub mod papers;
pub mod settings;
pub mod tags;
