//! Bus error types

use thiserror::Error;

/// Boxed error used at handler and activator boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while configuring or running a bus
#[derive(Debug, Error)]
pub enum BusError {
	/// Options failed validation in [`BusConfigurer::start`](crate::BusConfigurer::start)
	#[error("Invalid bus options: {0}")]
	InvalidOptions(String),

	/// The bus was stopped before the message arrived
	#[error("Bus `{0}` is not running")]
	Stopped(String),

	/// The handler activator could not produce handlers
	#[error("Handler activation failed: {0}")]
	Activation(#[source] BoxError),

	/// A handler returned an error
	#[error("Handler for `{message_type}` failed: {source}")]
	Handler {
		message_type: &'static str,
		#[source]
		source: BoxError,
	},

	/// More handlers were resolved than the bus allows per message
	#[error("{count} handlers resolved for `{message_type}`, limit is {limit}")]
	TooManyHandlers {
		message_type: &'static str,
		count: usize,
		limit: usize,
	},
}

/// An item in a transaction's extension slot has a different type than requested
#[derive(Debug, Error)]
#[error("Transaction item `{key}` holds a value of a different type")]
pub struct ItemTypeMismatch {
	pub key: String,
}
