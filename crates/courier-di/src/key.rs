//! Service identity

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a service type inside the container.
///
/// Keys compare by [`TypeId`] only; the type name is carried along for
/// diagnostics. Unsized types such as `dyn Trait` are valid services.
///
/// # Examples
///
/// ```
/// use courier_di::ServiceKey;
///
/// trait Greeter {}
///
/// let key = ServiceKey::of::<dyn Greeter>();
/// assert_eq!(key, ServiceKey::of::<dyn Greeter>());
/// assert_ne!(key, ServiceKey::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct ServiceKey {
	type_id: TypeId,
	type_name: &'static str,
}

impl ServiceKey {
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			type_name: type_name::<T>(),
		}
	}

	/// Builds a key from an already computed type identity.
	pub fn from_raw(type_id: TypeId, type_name: &'static str) -> Self {
		Self { type_id, type_name }
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}
}

impl PartialEq for ServiceKey {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state);
	}
}

impl fmt::Debug for ServiceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ServiceKey").field(&self.type_name).finish()
	}
}

impl fmt::Display for ServiceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.type_name)
	}
}
