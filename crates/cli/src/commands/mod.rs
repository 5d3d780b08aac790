//! CLI command implementations.

pub mod domain;
pub mod init;
pub mod limit;
