//! Selection configuration

pub mod defaults;
pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{find_config, load_config, load_config_or_default, FileFormat};
pub use types::{ProjectSets, SelectionConfig, TrySyntaxConfig};
pub use validation::validate_config;
