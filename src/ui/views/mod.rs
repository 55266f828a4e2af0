pub mod check;
pub mod config;
pub mod list;
pub mod serve;
pub mod setup;
pub mod watch;
