//! Component registrations and the immutable registry built from them

use crate::error::DiResult;
use crate::key::ServiceKey;
use crate::scope::LifetimeScope;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A type-erased instance. The concrete value is always an `Arc<T>` for the
/// service type `T` of the registration that produced it.
pub type ErasedInstance = Arc<dyn Any + Send + Sync>;

pub(crate) type Factory = Arc<dyn Fn(&LifetimeScope) -> DiResult<ErasedInstance> + Send + Sync>;

/// How long an instance produced by a registration is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
	/// One instance for the root container and every scope derived from it
	Singleton,
	/// One instance per lifetime scope
	Scoped,
	/// A fresh instance on every resolution
	#[default]
	Transient,
}

/// Position of a registration inside its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(pub(crate) usize);

/// A single component registered under a service type.
#[derive(Clone)]
pub struct Registration {
	id: RegistrationId,
	service_key: ServiceKey,
	lifetime: Lifetime,
	factory: Factory,
}

impl Registration {
	pub(crate) fn new(
		id: RegistrationId,
		service_key: ServiceKey,
		lifetime: Lifetime,
		factory: Factory,
	) -> Self {
		Self {
			id,
			service_key,
			lifetime,
			factory,
		}
	}

	pub fn id(&self) -> RegistrationId {
		self.id
	}

	/// The service type this component is resolvable as.
	pub fn service_key(&self) -> &ServiceKey {
		&self.service_key
	}

	pub fn lifetime(&self) -> Lifetime {
		self.lifetime
	}

	pub(crate) fn create(&self, scope: &LifetimeScope) -> DiResult<ErasedInstance> {
		(self.factory)(scope)
	}
}

impl fmt::Debug for Registration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registration")
			.field("id", &self.id)
			.field("service", &self.service_key)
			.field("lifetime", &self.lifetime)
			.finish()
	}
}

/// Read-only view over every component registered in a container.
///
/// Registrations keep their registration order, both globally and per
/// service key.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
	registrations: Vec<Registration>,
	by_key: HashMap<ServiceKey, Vec<usize>>,
}

impl ComponentRegistry {
	pub(crate) fn new(registrations: Vec<Registration>) -> Self {
		let mut by_key: HashMap<ServiceKey, Vec<usize>> = HashMap::new();
		for (index, registration) in registrations.iter().enumerate() {
			by_key
				.entry(registration.service_key)
				.or_default()
				.push(index);
		}
		Self {
			registrations,
			by_key,
		}
	}

	pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
		self.registrations.iter()
	}

	/// Registrations for exactly `key`, in registration order.
	pub fn registrations_for<'a>(
		&'a self,
		key: &ServiceKey,
	) -> impl Iterator<Item = &'a Registration> + 'a {
		self.by_key
			.get(key)
			.map(|indices| indices.as_slice())
			.unwrap_or_default()
			.iter()
			.map(|&index| &self.registrations[index])
	}

	/// Number of registrations whose service type is exactly `key`.
	pub fn count(&self, key: &ServiceKey) -> usize {
		self.by_key.get(key).map_or(0, Vec::len)
	}

	pub fn len(&self) -> usize {
		self.registrations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.registrations.is_empty()
	}
}
