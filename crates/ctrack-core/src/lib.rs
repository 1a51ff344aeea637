pub mod config;
pub mod logging;

pub mod bed;
pub mod catalog;
pub mod conservation;
pub mod fetch;
pub mod storage;
