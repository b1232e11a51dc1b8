//! Papershelf Core Library
//!
//! Storage, identity resolution and tag caching for the Papershelf paper
//! library: papers are identified by file name, observed at one or more
//! paths per device, and tagged through an in-memory cache that is flushed
//! to SQLite.

pub mod cache;
pub mod config;
pub mod db;
pub mod device;
pub mod error;
pub mod logging;
pub mod paths;
pub mod resolver;
pub mod scanner;
pub mod settings;
pub mod store;
