//! The root container

use crate::error::DiResult;
use crate::key::ServiceKey;
use crate::registration::{ComponentRegistry, ErasedInstance};
use crate::scope::{LifetimeScope, Shared};
use std::fmt;
use std::sync::Arc;

/// The built, immutable dependency graph.
///
/// Cloning is cheap; every clone refers to the same registry and singleton
/// cache. The container itself acts as the root lifetime scope.
#[derive(Clone)]
pub struct Container {
	root: LifetimeScope,
}

impl Container {
	pub(crate) fn new(registry: ComponentRegistry) -> Self {
		Self {
			root: LifetimeScope::root(Arc::new(Shared::new(registry))),
		}
	}

	pub fn registry(&self) -> &ComponentRegistry {
		self.root.registry()
	}

	/// The root scope. Scoped registrations resolved here live as long as
	/// the container.
	pub fn root_scope(&self) -> &LifetimeScope {
		&self.root
	}

	pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
		self.root.is_registered::<T>()
	}

	pub fn resolve<T>(&self) -> DiResult<Arc<T>>
	where
		T: ?Sized + Send + Sync + 'static,
	{
		self.root.resolve::<T>()
	}

	pub fn resolve_all<T>(&self) -> DiResult<Vec<Arc<T>>>
	where
		T: ?Sized + Send + Sync + 'static,
	{
		self.root.resolve_all::<T>()
	}

	pub fn resolve_all_erased(&self, key: &ServiceKey) -> DiResult<Vec<ErasedInstance>> {
		self.root.resolve_all_erased(key)
	}

	pub fn begin_scope(&self) -> LifetimeScope {
		self.root.begin_scope()
	}

	pub fn begin_tagged_scope(&self, tag: impl Into<String>) -> LifetimeScope {
		self.root.begin_tagged_scope(tag)
	}

	/// Returns `true` if both handles refer to the same built container.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		self.root.ptr_eq(&other.root)
	}

	/// Dispose the root scope. Child scopes are disposed by their owners.
	pub fn dispose(&self) -> bool {
		self.root.dispose()
	}
}

impl fmt::Debug for Container {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Container")
			.field("registrations", &self.registry().len())
			.field("disposed", &self.root.is_disposed())
			.finish()
	}
}
