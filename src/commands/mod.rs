//! CLI command handlers.

mod config;
mod drafts;
mod sources;
mod store;
mod validate;

pub use config::run_config_show_command;
pub use drafts::run_drafts_command;
pub use sources::run_sources_command;
pub use store::run_store_command;
pub use validate::{run_placeholder_command, run_validate_command};
