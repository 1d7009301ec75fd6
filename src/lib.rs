pub mod app;
pub mod config;
pub mod installer;
pub mod logging;
