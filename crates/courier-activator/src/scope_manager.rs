//! Per-transaction lifetime scopes

use crate::binder::ContainerBinder;
use crate::error::{ActivatorError, ActivatorResult};
use courier_bus::TransactionContext;
use courier_di::LifetimeScope;
use std::sync::Arc;

/// Extension slot key under which a transaction's scope is stored.
pub const SCOPE_ITEM_KEY: &str = "courier:lifetime-scope";

/// Hands out one lifetime scope per transaction.
///
/// The scope is created on first use, tagged with the transaction id,
/// cached in the transaction's extension slot and disposed by the
/// transaction's completion callback, whatever the outcome.
#[derive(Debug, Clone)]
pub struct ScopeManager {
	binder: Arc<ContainerBinder>,
}

impl ScopeManager {
	pub fn new(binder: Arc<ContainerBinder>) -> Self {
		Self { binder }
	}

	/// The scope owned by `tx`, created if this is its first use.
	///
	/// Fails with [`ActivatorError::IllegalState`] once `tx` has completed.
	pub fn scope_for(&self, tx: &TransactionContext) -> ActivatorResult<LifetimeScope> {
		if let Some(outcome) = tx.outcome() {
			return Err(ActivatorError::IllegalState(format!(
				"transaction {} has already completed ({outcome:?}); no scope can be created for it",
				tx.id()
			)));
		}
		let scope = tx.get_or_try_add_item::<LifetimeScope, ActivatorError, _>(SCOPE_ITEM_KEY, || {
			let scope = self.binder.container()?.begin_tagged_scope(tx.id());
			tracing::trace!(
				transaction = %tx.id(),
				scope = scope.id(),
				"Created lifetime scope for transaction"
			);

			let release = scope.clone();
			tx.on_completed(move |outcome| {
				if release.dispose() {
					tracing::trace!(scope = release.id(), ?outcome, "Released transaction scope");
				}
			});
			Ok(scope)
		})?;
		Ok(LifetimeScope::clone(&scope))
	}
}
