//! Container error types

use thiserror::Error;

/// Boxed error used at factory and callback boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building the container or resolving services.
#[derive(Debug, Error)]
pub enum DiError {
	/// No component is registered for the requested service
	#[error("No registration found for service `{0}`")]
	NotRegistered(&'static str),

	/// A component factory returned an error
	#[error("Factory for service `{service}` failed: {source}")]
	Factory {
		service: &'static str,
		#[source]
		source: BoxError,
	},

	/// The service depends on itself, directly or transitively
	#[error("Circular dependency detected for `{service}`: {path}")]
	CircularDependency { service: &'static str, path: String },

	/// Resolution went deeper than the container allows
	#[error("Maximum resolution depth exceeded: {0}")]
	MaxDepthExceeded(usize),

	/// A cached instance did not have the type its key promised
	#[error("Instance registered for `{0}` has an unexpected type")]
	TypeMismatch(&'static str),

	/// The scope was disposed before the resolution request arrived
	#[error("Lifetime scope {0} has already been disposed")]
	ScopeDisposed(u64),

	/// A build-completion callback failed, aborting the build
	#[error("Container build callback failed: {0}")]
	BuildCallback(#[source] BoxError),
}

impl DiError {
	/// Wraps an arbitrary factory failure for the given service type.
	pub fn factory<E>(service: &'static str, source: E) -> Self
	where
		E: Into<BoxError>,
	{
		Self::Factory {
			service,
			source: source.into(),
		}
	}
}

/// Result type for container operations
pub type DiResult<T> = Result<T, DiError>;
