pub mod config;
pub mod meals;
pub mod state;
pub mod storage;
