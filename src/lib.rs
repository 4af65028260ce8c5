pub mod api;
pub mod cache;
pub mod checker;
pub mod client;
pub mod config;
pub mod init;
pub mod logger;
pub mod stats;
pub mod verdict;
