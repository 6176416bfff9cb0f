//! CLI command handlers, one file per subcommand.

mod completions;
mod list;
mod show_config;
mod sync;

pub use completions::run_completions;
pub use list::run_list;
pub use show_config::run_show_config;
pub use sync::run_sync;
