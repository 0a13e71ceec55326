//! Transaction context - the unit of work around one message
//!
//! A [`TransactionContext`] carries per-message state in a string-keyed
//! extension slot and notifies completion callbacks exactly once when the
//! work ends, whether it was committed, failed or simply dropped.

use crate::error::ItemTypeMismatch;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Item = Arc<dyn Any + Send + Sync>;
type CompletionCallback = Box<dyn FnOnce(Outcome) + Send>;

/// How a transaction ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// All handlers succeeded
	Committed,
	/// A handler or the activation itself failed
	Failed,
	/// The context was dropped without being completed
	Abandoned,
}

/// The unit of work representing one message's processing attempt.
///
/// # Examples
///
/// ```
/// use courier_bus::{Outcome, TransactionContext};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// let tx = TransactionContext::new();
/// let released = Arc::new(AtomicBool::new(false));
/// let flag = released.clone();
/// tx.on_completed(move |outcome| {
///     assert_eq!(outcome, Outcome::Committed);
///     flag.store(true, Ordering::SeqCst);
/// });
///
/// assert!(tx.complete(Outcome::Committed));
/// assert!(released.load(Ordering::SeqCst));
/// assert!(!tx.complete(Outcome::Failed));
/// ```
pub struct TransactionContext {
	id: String,
	items: Mutex<HashMap<String, Item>>,
	callbacks: Mutex<Vec<CompletionCallback>>,
	outcome: OnceCell<Outcome>,
}

impl TransactionContext {
	/// Create a context with a random identifier.
	pub fn new() -> Self {
		Self::with_id(uuid::Uuid::new_v4().to_string())
	}

	pub fn with_id(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			items: Mutex::new(HashMap::new()),
			callbacks: Mutex::new(Vec::new()),
			outcome: OnceCell::new(),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	/// Retrieve an item from the extension slot.
	///
	/// Returns `None` if the key is absent or holds a different type.
	pub fn get_item<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
		self.items
			.lock()
			.get(key)
			.and_then(|item| item.clone().downcast::<T>().ok())
	}

	/// Store an item, replacing whatever the key held before.
	pub fn insert_item<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) -> Arc<T> {
		let value = Arc::new(value);
		self.items.lock().insert(key.into(), value.clone());
		value
	}

	/// Get the item stored under `key`, creating it with `create` if absent.
	///
	/// The slot stays locked while `create` runs, so concurrent callers on the
	/// same context never create two items for one key. `create` must not
	/// access this context's extension slot. A failed `create` leaves the key
	/// absent.
	pub fn get_or_try_add_item<T, E, F>(&self, key: &str, create: F) -> Result<Arc<T>, E>
	where
		T: Any + Send + Sync,
		E: From<ItemTypeMismatch>,
		F: FnOnce() -> Result<T, E>,
	{
		let mut items = self.items.lock();
		if let Some(existing) = items.get(key) {
			return existing.clone().downcast::<T>().map_err(|_| {
				E::from(ItemTypeMismatch {
					key: key.to_string(),
				})
			});
		}
		let created = Arc::new(create()?);
		items.insert(key.to_string(), created.clone());
		Ok(created)
	}

	/// Run `callback` when the transaction ends.
	///
	/// Callbacks run once each, in registration order, on whichever thread
	/// completes the transaction. A callback registered after completion runs
	/// immediately with the recorded outcome.
	pub fn on_completed<F>(&self, callback: F)
	where
		F: FnOnce(Outcome) + Send + 'static,
	{
		let outcome = {
			let mut callbacks = self.callbacks.lock();
			match self.outcome.get() {
				Some(outcome) => *outcome,
				None => {
					callbacks.push(Box::new(callback));
					return;
				}
			}
		};
		callback(outcome);
	}

	/// End the transaction and fire the completion callbacks.
	///
	/// Returns `false` if the transaction had already ended; the first
	/// outcome is kept.
	pub fn complete(&self, outcome: Outcome) -> bool {
		if self.outcome.set(outcome).is_err() {
			return false;
		}
		let callbacks = std::mem::take(&mut *self.callbacks.lock());
		tracing::trace!(
			transaction = %self.id,
			?outcome,
			callbacks = callbacks.len(),
			"Transaction completed"
		);
		for callback in callbacks {
			callback(outcome);
		}
		true
	}

	pub fn outcome(&self) -> Option<Outcome> {
		self.outcome.get().copied()
	}

	pub fn is_completed(&self) -> bool {
		self.outcome.get().is_some()
	}
}

impl Default for TransactionContext {
	fn default() -> Self {
		Self::new()
	}
}

impl Drop for TransactionContext {
	fn drop(&mut self) {
		self.complete(Outcome::Abandoned);
	}
}

impl fmt::Debug for TransactionContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TransactionContext")
			.field("id", &self.id)
			.field("outcome", &self.outcome.get())
			.finish_non_exhaustive()
	}
}
