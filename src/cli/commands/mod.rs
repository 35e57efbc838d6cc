//! CLI command implementations.

mod check;
mod config;
mod run;
mod tools;
mod validate;

pub use check::run_check;
pub use config::run_config;
pub use run::run_agents;
pub use tools::run_tools;
pub use validate::run_validate;
