//! Activator settings
//!
//! Settings can be built in code or loaded from TOML:
//!
//! ```toml
//! start_bus = false
//!
//! [bus]
//! name = "orders"
//! max_handlers_per_message = 16
//! ```

use courier_bus::{BusError, BusOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading [`ActivatorSettings`]
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("Failed to read settings file {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Invalid bus options: {0}")]
	InvalidBus(#[from] BusError),
}

/// Construction-time settings for the handler activator.
///
/// # Examples
///
/// ```
/// use courier_activator::ActivatorSettings;
///
/// let settings = ActivatorSettings::from_toml_str("start_bus = false").unwrap();
/// assert!(!settings.start_bus);
/// assert_eq!(settings.bus.name, "courier");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActivatorSettings {
	/// Resolve the bus as soon as the container is built
	pub start_bus: bool,
	/// Options handed to the bus configurer before the configure callback runs
	pub bus: BusOptions,
}

impl Default for ActivatorSettings {
	fn default() -> Self {
		Self {
			start_bus: true,
			bus: BusOptions::default(),
		}
	}
}

impl ActivatorSettings {
	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(content)?;
		settings.bus.validate()?;
		Ok(settings)
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}
}
