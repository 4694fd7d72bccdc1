pub mod config;
pub mod console;
pub mod environment;
pub mod error;
pub mod runner;
pub mod verdict;
pub mod version;
