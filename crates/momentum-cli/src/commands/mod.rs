pub mod action;
pub mod completions;
pub mod config;
pub mod dashboard;
pub mod habit;
pub mod outcome;
pub mod review;
pub mod ritual;
pub mod stats;
pub mod timer;
pub mod watch;
pub mod week;
