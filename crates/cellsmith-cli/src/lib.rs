// Library half of the CLI so integration tests can reach the commands and renderers.

pub mod commands;
pub mod render;

pub use commands::{plan_command, plans_command, signin_command, SignInReport};
