pub mod config;
pub mod installed;
pub mod monitor;
pub mod report;
pub mod version;
