//! CLI commands

mod init;
mod select;
mod strategies;
mod try_cmd;
mod validate;

pub use init::InitCommand;
pub use select::SelectCommand;
pub use strategies::StrategiesCommand;
pub use try_cmd::TryCommand;
pub use validate::ValidateCommand;
