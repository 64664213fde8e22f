//! Reflector configuration (strata.toml)
//!
//! ```toml
//! [platform]
//! version = "1.20.4"
//!
//! [constraints]
//! visibility = true
//! declared_type = true
//! class_kind = false
//!
//! [[renames]]
//! category = "field"
//! history = [{ from = "OLD", to = "NEW", version = "1.13" }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alias::{RenameError, RenameRecord, RenameTable, SymbolCategory};
use crate::constraint::{ClassKindConstraint, ConstraintEngine, DeclaredTypeConstraint, VisibilityConstraint};
use crate::version::PlatformVersion;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML (including invalid versions)
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A rename history is not a valid lineage
    #[error("Invalid rename history: {0}")]
    RenameError(#[from] RenameError),

    /// Neither the configuration nor the process names a platform version
    #[error("No platform version configured or initialized")]
    MissingVersion,
}

/// Reflector configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReflectConfig {
    /// Running platform
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Built-in constraint switches
    #[serde(default)]
    pub constraints: ConstraintConfig,

    /// Rename histories, one per symbol
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub renames: Vec<RenameConfig>,
}

/// `[platform]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlatformConfig {
    /// Running version; falls back to the process-wide version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PlatformVersion>,
}

/// `[constraints]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstraintConfig {
    /// `visibility/modifiers`
    #[serde(default = "enabled")]
    pub visibility: bool,

    /// `type/declared-type`
    #[serde(default = "enabled")]
    pub declared_type: bool,

    /// `class/kind`
    #[serde(default = "enabled")]
    pub class_kind: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            visibility: true,
            declared_type: true,
            class_kind: true,
        }
    }
}

/// Rename history of one symbol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenameConfig {
    /// Symbol category
    pub category: SymbolCategory,

    /// Renames, oldest first
    pub history: Vec<RenameStep>,
}

/// One rename in a history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenameStep {
    /// Name before the change
    pub from: String,

    /// Name after the change
    pub to: String,

    /// First version carrying `to`
    pub version: PlatformVersion,
}

impl ReflectConfig {
    /// Parse from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), renames = config.renames.len(), "loaded reflector config");
        Ok(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Rename table holding every configured history
    pub fn rename_table(&self) -> Result<RenameTable, ConfigError> {
        let mut table = RenameTable::new();
        for rename in &self.renames {
            table.register(rename.history.iter().map(|step| {
                RenameRecord::new(rename.category, step.from.clone(), step.to.clone(), step.version)
            }))?;
        }
        Ok(table)
    }

    /// Constraint chain with the enabled built-ins
    pub fn constraint_engine(&self) -> ConstraintEngine {
        let mut engine = ConstraintEngine::new();
        if self.constraints.visibility {
            engine.register(VisibilityConstraint);
        }
        if self.constraints.declared_type {
            engine.register(DeclaredTypeConstraint);
        }
        if self.constraints.class_kind {
            engine.register(ClassKindConstraint);
        }
        engine
    }
}
