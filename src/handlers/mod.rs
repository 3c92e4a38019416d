//! Command handlers, one module per subcommand.

pub mod equipment;
pub mod history;
pub mod init;
pub mod log;
pub mod status;
pub mod task;
pub mod unlog;
pub mod why;
