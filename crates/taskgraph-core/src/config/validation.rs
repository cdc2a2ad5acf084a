//! Configuration validation

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::SelectionConfig;

/// Validate configuration
pub fn validate_config(config: &SelectionConfig) -> Result<()> {
    debug!("validating configuration");
    validate_projects(config)?;
    validate_try_syntax(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_projects(config: &SelectionConfig) -> Result<()> {
    let classes = [
        ("projects.integration", &config.projects.integration),
        ("projects.release", &config.projects.release),
    ];

    for (field, projects) in classes {
        if projects.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: "project names cannot be empty".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_try_syntax(config: &SelectionConfig) -> Result<()> {
    let try_syntax = &config.try_syntax;

    if try_syntax.marker.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "try_syntax.marker".to_string(),
            message: "marker cannot be empty".to_string(),
        }
        .into());
    }

    // a kind may belong to one class only
    let mut seen: HashMap<&str, &str> = HashMap::new();
    let classes = [
        ("try_syntax.build_kinds", &try_syntax.build_kinds),
        ("try_syntax.test_kinds", &try_syntax.test_kinds),
        ("try_syntax.job_kinds", &try_syntax.job_kinds),
    ];

    for (field, kinds) in classes {
        for kind in kinds {
            if let Some(other) = seen.insert(kind.as_str(), field) {
                if other != field {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        message: format!("kind '{}' is already listed in {}", kind, other),
                    }
                    .into());
                }
            }
        }
    }

    for (name, platforms) in &try_syntax.test_platform_aliases {
        if platforms.is_empty() || platforms.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "try_syntax.test_platform_aliases".to_string(),
                message: format!("'{}' must name at least one test platform", name),
            }
            .into());
        }
    }

    Ok(())
}
