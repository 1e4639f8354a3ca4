pub mod config;
pub mod input;
pub mod progress;
pub mod telemetry;
