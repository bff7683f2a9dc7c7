// Command handlers module
pub mod backup;
pub mod backups;
pub mod config;
pub mod hardware;
pub mod kill;
pub mod logs;
pub mod network;
pub mod processes;
pub mod status;
pub mod uptime;
pub mod version;

// Re-exports for cleaner imports
pub use status::execute as status;
pub use version::execute as version;
