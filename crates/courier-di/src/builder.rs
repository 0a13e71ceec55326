//! Container construction

use crate::container::Container;
use crate::error::{BoxError, DiError, DiResult};
use crate::key::ServiceKey;
use crate::registration::{ComponentRegistry, ErasedInstance, Lifetime, Registration, RegistrationId};
use crate::scope::LifetimeScope;
use std::sync::Arc;

type BuildCallback = Box<dyn FnOnce(&Container) -> Result<(), BoxError> + Send>;

/// Collects registrations and build-completion callbacks, then produces the
/// immutable root [`Container`].
///
/// # Examples
///
/// ```
/// use courier_di::{ContainerBuilder, Lifetime};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock;
///
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 {
///         42
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register::<dyn Clock, _>(Lifetime::Singleton, |_| Ok(Arc::new(FixedClock)));
///
/// let container = builder.build().unwrap();
/// assert_eq!(container.resolve::<dyn Clock>().unwrap().now(), 42);
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
	registrations: Vec<Registration>,
	callbacks: Vec<BuildCallback>,
}

impl ContainerBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a component for service type `T`.
	///
	/// Registering the same service more than once adds to its collection;
	/// single resolution returns the last registration.
	pub fn register<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
	where
		T: ?Sized + Send + Sync + 'static,
		F: Fn(&LifetimeScope) -> DiResult<Arc<T>> + Send + Sync + 'static,
	{
		let id = RegistrationId(self.registrations.len());
		let erased = move |scope: &LifetimeScope| -> DiResult<ErasedInstance> {
			let instance: Arc<T> = factory(scope)?;
			let instance: ErasedInstance = Arc::new(instance);
			Ok(instance)
		};
		self.registrations.push(Registration::new(
			id,
			ServiceKey::of::<T>(),
			lifetime,
			Arc::new(erased),
		));
		self
	}

	/// Register an existing instance as a singleton.
	pub fn register_instance<T>(&mut self, instance: Arc<T>) -> &mut Self
	where
		T: ?Sized + Send + Sync + 'static,
	{
		self.register::<T, _>(Lifetime::Singleton, move |_| Ok(instance.clone()))
	}

	/// Run `callback` once the container has been built.
	///
	/// Callbacks run in registration order; the first failure aborts
	/// [`build`](Self::build).
	pub fn on_built<F>(&mut self, callback: F) -> &mut Self
	where
		F: FnOnce(&Container) -> Result<(), BoxError> + Send + 'static,
	{
		self.callbacks.push(Box::new(callback));
		self
	}

	/// Number of registrations so far.
	pub fn len(&self) -> usize {
		self.registrations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.registrations.is_empty()
	}

	/// Build the root container and fire the build callbacks.
	pub fn build(self) -> DiResult<Container> {
		let container = Container::new(ComponentRegistry::new(self.registrations));
		tracing::debug!(
			registrations = container.registry().len(),
			callbacks = self.callbacks.len(),
			"Container built"
		);
		for callback in self.callbacks {
			callback(&container).map_err(DiError::BuildCallback)?;
		}
		Ok(container)
	}
}
