//! Utility module - Constants, logging setup and filesystem helpers

pub mod constants;
pub mod fs;
pub mod logging;
