//! One module per command group.

pub mod entry;
pub mod init;
pub mod vault;
