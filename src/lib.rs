pub mod cli;
pub mod config;
pub mod images;
pub mod lifecycle;
pub mod logging;
pub mod query;
pub mod recorder;
pub mod records;
pub mod session;
pub mod store;
