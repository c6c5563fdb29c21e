pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod runner;
pub mod storage;
pub mod xmfa;
