//! Bus options

use crate::error::BusError;
use serde::{Deserialize, Serialize};

/// Options applied when the bus starts.
///
/// # Examples
///
/// ```
/// use courier_bus::BusOptions;
///
/// let options: BusOptions = serde_json::from_str(r#"{"name": "orders"}"#).unwrap();
/// assert_eq!(options.name, "orders");
/// assert_eq!(options.max_handlers_per_message, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusOptions {
	/// Name used in diagnostics
	pub name: String,
	/// Upper bound on handlers invoked per message; `0` means unlimited
	pub max_handlers_per_message: usize,
}

impl BusOptions {
	pub fn validate(&self) -> Result<(), BusError> {
		if self.name.trim().is_empty() {
			return Err(BusError::InvalidOptions(
				"bus name must not be empty".to_string(),
			));
		}
		Ok(())
	}
}

impl Default for BusOptions {
	fn default() -> Self {
		Self {
			name: "courier".to_string(),
			max_handlers_per_message: 0,
		}
	}
}
