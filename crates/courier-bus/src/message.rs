//! Message type hierarchies
//!
//! Rust has no inheritance, so a message spells out which base types and
//! capabilities it can be handled as. Each entry pairs the handler lookup
//! key of the ancestor with a projection from the message to it:
//!
//! ```text
//! OrderPlaced ──project──▶ DomainEvent ──project──▶ dyn Auditable
//!      │                        │                        │
//!  Handler<OrderPlaced>   Handler<DomainEvent>   Handler<dyn Auditable>
//! ```

use crate::handler::{Handler, Projected};
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

/// A message that can be dispatched to handlers.
///
/// # Examples
///
/// ```rust
/// use courier_bus::{Hierarchy, Message};
///
/// pub trait Auditable: Send + Sync {
///     fn actor(&self) -> &str;
/// }
///
/// pub struct DomainEvent {
///     pub actor: String,
/// }
///
/// impl Auditable for DomainEvent {
///     fn actor(&self) -> &str {
///         &self.actor
///     }
/// }
///
/// impl Message for DomainEvent {
///     fn ancestors(hierarchy: &mut Hierarchy<Self>) {
///         hierarchy.ancestor::<dyn Auditable>(|event| event);
///     }
/// }
///
/// pub struct OrderPlaced {
///     pub event: DomainEvent,
///     pub order_id: u64,
/// }
///
/// impl Message for OrderPlaced {
///     fn ancestors(hierarchy: &mut Hierarchy<Self>) {
///         hierarchy.inherit::<DomainEvent>(|order| &order.event);
///     }
/// }
///
/// let keys: Vec<_> = Hierarchy::<OrderPlaced>::of()
///     .keys()
///     .map(|key| key.message_type())
///     .collect();
/// assert_eq!(keys.len(), 3);
/// assert!(keys[0].contains("Auditable"));
/// assert!(keys[2].ends_with("OrderPlaced"));
/// ```
pub trait Message: Send + Sync + 'static {
	/// Declare the types this message can also be handled as, most general
	/// first. The message type itself is always appended last.
	fn ancestors(hierarchy: &mut Hierarchy<Self>)
	where
		Self: Sized,
	{
		let _ = hierarchy;
	}
}

/// Identifies the collection of handlers declared for exactly one type.
#[derive(Clone, Copy)]
pub struct HandlerKey {
	handler_type: TypeId,
	message_type: &'static str,
}

impl HandlerKey {
	/// The key for `dyn Handler<M>`.
	pub fn of<M: ?Sized + Send + Sync + 'static>() -> Self {
		Self {
			handler_type: TypeId::of::<dyn Handler<M>>(),
			message_type: type_name::<M>(),
		}
	}

	/// Type id of `dyn Handler<M>`; this is the service a container
	/// registers handlers under.
	pub fn handler_type(&self) -> TypeId {
		self.handler_type
	}

	pub fn message_type(&self) -> &'static str {
		self.message_type
	}

	/// Type name of `dyn Handler<M>`, for diagnostics.
	pub fn handler_type_name(&self) -> String {
		format!("dyn Handler<{}>", self.message_type)
	}
}

impl PartialEq for HandlerKey {
	fn eq(&self, other: &Self) -> bool {
		self.handler_type == other.handler_type
	}
}

impl Eq for HandlerKey {}

impl std::hash::Hash for HandlerKey {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.handler_type.hash(state);
	}
}

impl fmt::Debug for HandlerKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("HandlerKey").field(&self.message_type).finish()
	}
}

type Lift<M> =
	Arc<dyn Fn(&(dyn Any + Send + Sync)) -> Option<Arc<dyn Handler<M>>> + Send + Sync>;

/// One entry of a message hierarchy.
///
/// Knows the handler key of the ancestor and how to turn a type-erased
/// `Arc<dyn Handler<Ancestor>>` into a handler of the message itself.
pub struct Ancestor<M: ?Sized + Send + Sync + 'static> {
	key: HandlerKey,
	lift: Lift<M>,
}

impl<M: ?Sized + Send + Sync + 'static> Ancestor<M> {
	/// The entry for `M` itself.
	pub fn identity() -> Self {
		Self {
			key: HandlerKey::of::<M>(),
			lift: Arc::new(|erased: &(dyn Any + Send + Sync)| {
				erased.downcast_ref::<Arc<dyn Handler<M>>>().cloned()
			}),
		}
	}

	/// Re-target this entry at a type `N` that projects onto `M`.
	pub fn project<N>(self, project: fn(&N) -> &M) -> Ancestor<N>
	where
		N: ?Sized + Send + Sync + 'static,
	{
		let lift = self.lift;
		Ancestor {
			key: self.key,
			lift: Arc::new(move |erased: &(dyn Any + Send + Sync)| {
				lift(erased).map(|inner| {
					let projected: Arc<dyn Handler<N>> = Arc::new(Projected { inner, project });
					projected
				})
			}),
		}
	}

	pub fn key(&self) -> HandlerKey {
		self.key
	}

	/// Turn a resolved handler instance into a handler of `M`.
	///
	/// `erased` must hold an `Arc<dyn Handler<A>>` for the ancestor `A` this
	/// entry was built for; anything else yields `None`.
	pub fn lift(&self, erased: &(dyn Any + Send + Sync)) -> Option<Arc<dyn Handler<M>>> {
		(self.lift)(erased)
	}
}

impl<M: ?Sized + Send + Sync + 'static> Clone for Ancestor<M> {
	fn clone(&self) -> Self {
		Self {
			key: self.key,
			lift: self.lift.clone(),
		}
	}
}

impl<M: ?Sized + Send + Sync + 'static> fmt::Debug for Ancestor<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Ancestor").field("key", &self.key).finish()
	}
}

/// The ordered, deduplicated set of types a message can be handled as.
pub struct Hierarchy<M: Message> {
	entries: Vec<Ancestor<M>>,
}

impl<M: Message> Hierarchy<M> {
	/// Enumerate the full hierarchy of `M`: declared ancestors in order, then
	/// `M` itself. Repeated types keep their first position.
	pub fn of() -> Self {
		let mut hierarchy = Self {
			entries: Vec::new(),
		};
		M::ancestors(&mut hierarchy);
		hierarchy.push(Ancestor::identity());
		hierarchy
	}

	/// Declare that `M` can be handled as `A`.
	pub fn ancestor<A>(&mut self, project: fn(&M) -> &A) -> &mut Self
	where
		A: ?Sized + Send + Sync + 'static,
	{
		self.push(Ancestor::<A>::identity().project(project));
		self
	}

	/// Declare that `M` can be handled as the message `A` and as everything
	/// `A` can be handled as.
	pub fn inherit<A: Message>(&mut self, project: fn(&M) -> &A) -> &mut Self {
		for entry in Hierarchy::<A>::of().entries {
			self.push(entry.project(project));
		}
		self
	}

	pub fn keys(&self) -> impl Iterator<Item = HandlerKey> + '_ {
		self.entries.iter().map(Ancestor::key)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Ancestor<M>> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn push(&mut self, entry: Ancestor<M>) {
		if self.entries.iter().all(|existing| existing.key != entry.key) {
			self.entries.push(entry);
		}
	}
}

impl<M: Message> IntoIterator for Hierarchy<M> {
	type Item = Ancestor<M>;
	type IntoIter = std::vec::IntoIter<Ancestor<M>>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}
