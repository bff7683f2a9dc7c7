// Platform-specific code module

pub mod command;

pub use command::{run_with_timeout, MAX_COMMAND_TIMEOUT};
