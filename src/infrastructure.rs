pub mod config;
pub mod event_log;
pub mod process;
pub mod zed_db;
