pub mod config;
pub mod logging;

pub mod fetcher;
pub mod run;
pub mod schedule;
pub mod source;
pub mod storage;
