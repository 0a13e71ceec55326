//! One-time binding of the built root container

use crate::error::{ActivatorError, ActivatorResult, ConfigurationError};
use courier_di::{ComponentRegistry, Container, ServiceKey};
use once_cell::sync::OnceCell;
use std::fmt;

/// Holds the root container once it has been built.
///
/// The slot can be filled exactly once; a second [`bind`](Self::bind) fails
/// instead of replacing the container.
///
/// # Examples
///
/// ```
/// use courier_activator::{ConfigurationError, ContainerBinder};
/// use courier_di::ContainerBuilder;
///
/// let binder = ContainerBinder::new();
/// assert!(!binder.is_bound());
///
/// let container = ContainerBuilder::new().build().unwrap();
/// binder.bind(&container).unwrap();
///
/// let other = ContainerBuilder::new().build().unwrap();
/// assert!(matches!(binder.bind(&other), Err(ConfigurationError::AlreadyBound)));
/// assert!(binder.container().unwrap().ptr_eq(&container));
/// ```
#[derive(Default)]
pub struct ContainerBinder {
	container: OnceCell<Container>,
}

impl ContainerBinder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store `container` as the root. Fails if a container is already bound.
	pub fn bind(&self, container: &Container) -> Result<(), ConfigurationError> {
		self.container
			.set(container.clone())
			.map_err(|_| ConfigurationError::AlreadyBound)?;
		tracing::debug!(
			registrations = container.registry().len(),
			"Root container bound to handler activator"
		);
		Ok(())
	}

	/// The bound root container.
	pub fn container(&self) -> ActivatorResult<&Container> {
		self.container.get().ok_or_else(|| {
			ActivatorError::IllegalState(
				"no root container has been bound yet; handlers cannot be resolved before \
				 the container has finished building"
					.to_string(),
			)
		})
	}

	pub fn is_bound(&self) -> bool {
		self.container.get().is_some()
	}

	/// Reject registries holding more than one registration of `bus`.
	pub fn ensure_single_bus(
		registry: &ComponentRegistry,
		bus: &ServiceKey,
	) -> Result<(), ConfigurationError> {
		let count = registry.count(bus);
		if count > 1 {
			return Err(ConfigurationError::MultipleBusRegistrations { count });
		}
		Ok(())
	}

	/// Build-completion routine: validate, bind, then optionally start the
	/// bus `B` by resolving it.
	pub fn on_container_built<B>(&self, container: &Container, start_bus: bool) -> ActivatorResult<()>
	where
		B: ?Sized + Send + Sync + 'static,
	{
		Self::ensure_single_bus(container.registry(), &ServiceKey::of::<B>())?;
		self.bind(container)?;
		if start_bus {
			container
				.resolve::<B>()
				.map_err(ConfigurationError::BusStartup)?;
		}
		Ok(())
	}
}

impl fmt::Debug for ContainerBinder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContainerBinder")
			.field("bound", &self.is_bound())
			.finish()
	}
}
