//! Memoized resolution plans
//!
//! A [`ResolutionPlan`] lists, for one message type, the container keys
//! holding handlers that apply to it: one key per type in the message's
//! hierarchy, ancestors first. Plans depend only on the message type, so
//! [`PlanCache`] computes each one once and keeps it for the life of the
//! process. Handlers themselves are resolved fresh every time.

use crate::error::ActivatorResult;
use courier_bus::{Ancestor, Handler, Hierarchy, Message};
use courier_di::{DiError, LifetimeScope, ServiceKey};
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

struct PlanStep<M: Message> {
	key: ServiceKey,
	ancestor: Ancestor<M>,
}

/// The ordered, deduplicated handler lookup keys for message type `M`.
pub struct ResolutionPlan<M: Message> {
	steps: Vec<PlanStep<M>>,
}

impl<M: Message> ResolutionPlan<M> {
	/// Derive the plan from the message's hierarchy.
	pub fn compute() -> Self {
		let steps = Hierarchy::<M>::of()
			.into_iter()
			.map(|ancestor| {
				let handler_key = ancestor.key();
				PlanStep {
					key: ServiceKey::from_raw(handler_key.handler_type(), handler_key.message_type()),
					ancestor,
				}
			})
			.collect();
		Self { steps }
	}

	pub fn message_type(&self) -> &'static str {
		type_name::<M>()
	}

	/// Container keys to query, in plan order.
	pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
		self.steps.iter().map(|step| &step.key)
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	/// Resolve every key against `scope` and concatenate the handlers.
	///
	/// No deduplication: a component registered under several keys appears
	/// once per key.
	pub fn resolve(&self, scope: &LifetimeScope) -> ActivatorResult<Vec<Arc<dyn Handler<M>>>> {
		let mut handlers = Vec::new();
		for step in &self.steps {
			for instance in scope.resolve_all_erased(&step.key)? {
				let handler = step
					.ancestor
					.lift(&*instance)
					.ok_or(DiError::TypeMismatch(step.key.type_name()))?;
				handlers.push(handler);
			}
		}
		Ok(handlers)
	}
}

impl<M: Message> fmt::Debug for ResolutionPlan<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResolutionPlan")
			.field("message_type", &self.message_type())
			.field("keys", &self.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Process-lifetime cache of resolution plans keyed by message type.
///
/// Plans are computed outside the lock. When several callers race on the
/// first request for one type, each may compute a plan, but only the first
/// stored one is kept and every caller receives it.
#[derive(Default)]
pub struct PlanCache {
	plans: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl PlanCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn plan_for<M: Message>(&self) -> Arc<ResolutionPlan<M>> {
		let type_id = TypeId::of::<M>();

		if let Some(plan) = self
			.plans
			.read()
			.get(&type_id)
			.cloned()
			.and_then(|plan| plan.downcast::<ResolutionPlan<M>>().ok())
		{
			return plan;
		}

		let computed = Arc::new(ResolutionPlan::<M>::compute());
		tracing::debug!(
			message_type = computed.message_type(),
			keys = computed.len(),
			"Resolution plan computed"
		);

		let erased: Arc<dyn Any + Send + Sync> = computed.clone();
		let stored = self.plans.write().entry(type_id).or_insert(erased).clone();
		stored.downcast::<ResolutionPlan<M>>().unwrap_or(computed)
	}

	/// Number of message types with a cached plan.
	pub fn len(&self) -> usize {
		self.plans.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.plans.read().is_empty()
	}
}

impl fmt::Debug for PlanCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PlanCache").field("plans", &self.len()).finish()
	}
}
