pub mod config;
pub mod minimum;
pub mod priority;
pub mod profile;
pub mod report;
pub mod task;
