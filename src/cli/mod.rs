//! CLI command implementations

pub mod fs_host;
pub mod history;
pub mod init;
