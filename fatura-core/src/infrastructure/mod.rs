pub mod authority;
pub mod config;
pub mod logging;
pub mod signing;
pub mod storage;
