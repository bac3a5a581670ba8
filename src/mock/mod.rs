//! Mock services for testing

pub mod service;

pub use service::MockTsdbServer;
