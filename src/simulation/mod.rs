pub mod cancel;
pub mod config;
pub mod inventory;
pub mod queueing;
