//! Lifetime scopes and their instance caches

use crate::cycle_detection;
use crate::error::{DiError, DiResult};
use crate::key::ServiceKey;
use crate::registration::{ComponentRegistry, ErasedInstance, Lifetime, Registration, RegistrationId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

type Disposer = Box<dyn FnOnce() + Send>;

/// Instances cached per registration.
///
/// Lookups take the read lock only. Insertion never runs a factory under the
/// lock; when two threads race to create the same instance, the first one
/// stored wins and both callers receive it.
#[derive(Default)]
pub(crate) struct InstanceCache {
	cache: RwLock<HashMap<RegistrationId, ErasedInstance>>,
}

impl InstanceCache {
	pub(crate) fn get(&self, id: RegistrationId) -> Option<ErasedInstance> {
		self.cache.read().get(&id).cloned()
	}

	pub(crate) fn get_or_insert(&self, id: RegistrationId, instance: ErasedInstance) -> ErasedInstance {
		self.cache.write().entry(id).or_insert(instance).clone()
	}

	pub(crate) fn len(&self) -> usize {
		self.cache.read().len()
	}

	fn clear(&self) {
		// Drop instances outside the lock; their destructors may be arbitrary.
		let drained = std::mem::take(&mut *self.cache.write());
		drop(drained);
	}
}

/// State shared by the root container and every scope derived from it.
pub(crate) struct Shared {
	pub(crate) registry: Arc<ComponentRegistry>,
	pub(crate) singletons: InstanceCache,
	next_scope_id: AtomicU64,
}

impl Shared {
	pub(crate) fn new(registry: ComponentRegistry) -> Self {
		Self {
			registry: Arc::new(registry),
			singletons: InstanceCache::default(),
			next_scope_id: AtomicU64::new(0),
		}
	}
}

struct ScopeInner {
	id: u64,
	tag: Option<String>,
	shared: Arc<Shared>,
	/// The root scope; `None` for the root itself.
	root: Option<Arc<ScopeInner>>,
	instances: InstanceCache,
	disposers: Mutex<Vec<Disposer>>,
	disposed: AtomicBool,
}

impl ScopeInner {
	fn dispose(&self) -> bool {
		if self.disposed.swap(true, Ordering::AcqRel) {
			return false;
		}
		let disposers = std::mem::take(&mut *self.disposers.lock());
		for disposer in disposers.into_iter().rev() {
			disposer();
		}
		self.instances.clear();
		tracing::trace!(scope = self.id, tag = ?self.tag, "Lifetime scope disposed");
		true
	}
}

impl Drop for ScopeInner {
	fn drop(&mut self) {
		self.dispose();
	}
}

/// A bounded-lifetime view of the container.
///
/// Scoped registrations get one instance per `LifetimeScope`; singletons are
/// shared with the root. Cloning the handle does not create a new scope.
///
/// # Examples
///
/// ```
/// use courier_di::{ContainerBuilder, Lifetime};
/// use std::sync::Arc;
///
/// let mut builder = ContainerBuilder::new();
/// builder.register::<String, _>(Lifetime::Scoped, |_| Ok(Arc::new("conn".to_string())));
/// let container = builder.build().unwrap();
///
/// let scope = container.begin_scope();
/// let a = scope.resolve::<String>().unwrap();
/// let b = scope.resolve::<String>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// let other = container.begin_scope();
/// assert!(!Arc::ptr_eq(&a, &other.resolve::<String>().unwrap()));
/// ```
#[derive(Clone)]
pub struct LifetimeScope {
	inner: Arc<ScopeInner>,
}

impl LifetimeScope {
	pub(crate) fn root(shared: Arc<Shared>) -> Self {
		Self::with_shared(shared, None, None)
	}

	fn with_shared(shared: Arc<Shared>, root: Option<Arc<ScopeInner>>, tag: Option<String>) -> Self {
		let id = shared.next_scope_id.fetch_add(1, Ordering::Relaxed);
		Self {
			inner: Arc::new(ScopeInner {
				id,
				tag,
				shared,
				root,
				instances: InstanceCache::default(),
				disposers: Mutex::new(Vec::new()),
				disposed: AtomicBool::new(false),
			}),
		}
	}

	/// Process-unique (per container) scope identifier. The root is `0`.
	pub fn id(&self) -> u64 {
		self.inner.id
	}

	pub fn tag(&self) -> Option<&str> {
		self.inner.tag.as_deref()
	}

	/// Returns `true` if both handles refer to the same scope.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	pub fn registry(&self) -> &ComponentRegistry {
		&self.inner.shared.registry
	}

	/// Derive a child scope sharing this container's singletons.
	pub fn begin_scope(&self) -> LifetimeScope {
		let scope = Self::with_shared(self.inner.shared.clone(), Some(self.root_inner()), None);
		tracing::trace!(scope = scope.id(), parent = self.id(), "Lifetime scope created");
		scope
	}

	/// Derive a child scope carrying a diagnostic tag.
	pub fn begin_tagged_scope(&self, tag: impl Into<String>) -> LifetimeScope {
		let scope = Self::with_shared(
			self.inner.shared.clone(),
			Some(self.root_inner()),
			Some(tag.into()),
		);
		tracing::trace!(
			scope = scope.id(),
			parent = self.id(),
			tag = ?scope.tag(),
			"Lifetime scope created"
		);
		scope
	}

	pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
		self.registry().count(&ServiceKey::of::<T>()) > 0
	}

	/// Resolve the last component registered for `T`.
	pub fn resolve<T>(&self) -> DiResult<Arc<T>>
	where
		T: ?Sized + Send + Sync + 'static,
	{
		let key = ServiceKey::of::<T>();
		self.ensure_live()?;
		let registration = self
			.registry()
			.registrations_for(&key)
			.last()
			.ok_or(DiError::NotRegistered(key.type_name()))?;
		let instance = self.instantiate(registration)?;
		downcast::<T>(&instance, &key)
	}

	/// Resolve every component registered for `T`, in registration order.
	///
	/// An unregistered service yields an empty collection.
	pub fn resolve_all<T>(&self) -> DiResult<Vec<Arc<T>>>
	where
		T: ?Sized + Send + Sync + 'static,
	{
		let key = ServiceKey::of::<T>();
		self.resolve_all_erased(&key)?
			.iter()
			.map(|instance| downcast::<T>(instance, &key))
			.collect()
	}

	/// Resolve every component registered for `key` without naming its type.
	///
	/// Each returned instance holds an `Arc<T>` for the service type `T`
	/// identified by `key`.
	pub fn resolve_all_erased(&self, key: &ServiceKey) -> DiResult<Vec<ErasedInstance>> {
		self.ensure_live()?;
		self.registry()
			.registrations_for(key)
			.map(|registration| self.instantiate(registration))
			.collect()
	}

	/// Run `callback` when this scope is disposed.
	///
	/// Callbacks run once, most recently registered first. If the scope is
	/// already disposed the callback runs immediately.
	pub fn on_dispose<F>(&self, callback: F)
	where
		F: FnOnce() + Send + 'static,
	{
		{
			let mut disposers = self.inner.disposers.lock();
			if !self.inner.disposed.load(Ordering::Acquire) {
				disposers.push(Box::new(callback));
				return;
			}
		}
		callback();
	}

	/// Release this scope's instances and run its disposal callbacks.
	///
	/// Returns `false` if the scope had already been disposed.
	pub fn dispose(&self) -> bool {
		self.inner.dispose()
	}

	pub fn is_disposed(&self) -> bool {
		self.inner.disposed.load(Ordering::Acquire)
	}

	/// Number of scoped instances currently cached by this scope.
	pub fn cached_instances(&self) -> usize {
		self.inner.instances.len()
	}

	fn ensure_live(&self) -> DiResult<()> {
		if self.is_disposed() {
			return Err(DiError::ScopeDisposed(self.inner.id));
		}
		Ok(())
	}

	fn instantiate(&self, registration: &Registration) -> DiResult<ErasedInstance> {
		match registration.lifetime() {
			Lifetime::Transient => self.create(registration),
			Lifetime::Scoped => self.cached(&self.inner.instances, registration),
			Lifetime::Singleton => {
				// Singletons are built against the root so they never capture
				// instances owned by a child scope.
				let root = Self {
					inner: self.root_inner(),
				};
				root.cached(&self.inner.shared.singletons, registration)
			}
		}
	}

	fn cached(&self, cache: &InstanceCache, registration: &Registration) -> DiResult<ErasedInstance> {
		if let Some(instance) = cache.get(registration.id()) {
			return Ok(instance);
		}
		let created = self.create(registration)?;
		Ok(cache.get_or_insert(registration.id(), created))
	}

	fn root_inner(&self) -> Arc<ScopeInner> {
		self.inner.root.clone().unwrap_or_else(|| self.inner.clone())
	}

	fn create(&self, registration: &Registration) -> DiResult<ErasedInstance> {
		let _guard = cycle_detection::begin_resolution(*registration.service_key())?;
		registration.create(self)
	}
}

impl fmt::Debug for LifetimeScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LifetimeScope")
			.field("id", &self.inner.id)
			.field("tag", &self.inner.tag)
			.field("disposed", &self.is_disposed())
			.finish()
	}
}

fn downcast<T>(instance: &ErasedInstance, key: &ServiceKey) -> DiResult<Arc<T>>
where
	T: ?Sized + Send + Sync + 'static,
{
	instance
		.downcast_ref::<Arc<T>>()
		.cloned()
		.ok_or(DiError::TypeMismatch(key.type_name()))
}
