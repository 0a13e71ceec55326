//! Activator error types

use courier_bus::ItemTypeMismatch;
use courier_di::DiError;
use thiserror::Error;

/// Setup misuse detected while wiring the activator into a container.
///
/// Always fatal: these abort startup and are never retried.
#[derive(Debug, Error)]
pub enum ConfigurationError {
	/// More than one bus is registered in the container being built
	#[error(
		"Found {count} message bus registrations in the container. The handler activator \
		 was installed more than once on the same container builder; install it exactly \
		 once per builder"
	)]
	MultipleBusRegistrations { count: usize },

	/// The activator was already bound to a built container
	#[error("A root container has already been bound to this handler activator")]
	AlreadyBound,

	/// Resolving the bus during container build failed
	#[error("The message bus failed to start: {0}")]
	BusStartup(#[source] DiError),
}

/// Errors that can occur while installing the activator or resolving handlers
#[derive(Debug, Error)]
pub enum ActivatorError {
	/// Unrecoverable setup misuse
	#[error("Configuration error: {0}")]
	Configuration(#[from] ConfigurationError),

	/// An operation was invoked before the required initialization
	#[error("Illegal state: {0}")]
	IllegalState(String),

	/// A required construction parameter was not supplied
	#[error("Missing required argument `{0}`")]
	Argument(&'static str),

	/// Container resolution failure, passed through untranslated
	#[error(transparent)]
	Container(DiError),
}

impl From<DiError> for ActivatorError {
	/// Build callbacks installed by the activator report `ActivatorError`s
	/// through the container; those are unwrapped again here.
	fn from(err: DiError) -> Self {
		match err {
			DiError::BuildCallback(source) => match source.downcast::<ActivatorError>() {
				Ok(activator_error) => *activator_error,
				Err(source) => Self::Container(DiError::BuildCallback(source)),
			},
			other => Self::Container(other),
		}
	}
}

impl From<ItemTypeMismatch> for ActivatorError {
	fn from(err: ItemTypeMismatch) -> Self {
		Self::IllegalState(err.to_string())
	}
}

/// Result type for activator operations
pub type ActivatorResult<T> = Result<T, ActivatorError>;
