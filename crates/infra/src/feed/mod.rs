//! Live item feed lifecycle

pub mod worker;

pub use worker::ItemFeedWorker;
