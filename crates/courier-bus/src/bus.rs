//! In-process bus runtime

use crate::activator::HandlerActivator;
use crate::error::BusError;
use crate::message::Message;
use crate::options::BusOptions;
use crate::transaction::{Outcome, TransactionContext};
use std::any::type_name;
use std::sync::atomic::{AtomicBool, Ordering};

/// Summary of one dispatched message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
	pub transaction_id: String,
	pub handlers_invoked: usize,
}

/// Dispatches messages to the handlers an activator resolves for them.
///
/// Each message gets its own [`TransactionContext`], completed as
/// [`Outcome::Committed`] when every handler succeeds and
/// [`Outcome::Failed`] otherwise. Handlers run sequentially in the order the
/// activator returns them. Transport, retries and error queues are left to
/// the host.
pub struct Bus<A> {
	activator: A,
	options: BusOptions,
	running: AtomicBool,
}

impl<A: HandlerActivator> Bus<A> {
	pub(crate) fn new(activator: A, options: BusOptions) -> Self {
		Self {
			activator,
			options,
			running: AtomicBool::new(true),
		}
	}

	pub fn name(&self) -> &str {
		&self.options.name
	}

	pub fn options(&self) -> &BusOptions {
		&self.options
	}

	pub fn activator(&self) -> &A {
		&self.activator
	}

	pub fn is_running(&self) -> bool {
		self.running.load(Ordering::Acquire)
	}

	/// Stop accepting messages. Returns `false` if already stopped.
	pub fn stop(&self) -> bool {
		let was_running = self.running.swap(false, Ordering::AcqRel);
		if was_running {
			tracing::debug!(bus = %self.name(), "Bus stopped");
		}
		was_running
	}

	/// Dispatch `message` in a fresh transaction.
	pub async fn send<M: Message>(&self, message: M) -> Result<DispatchReport, BusError> {
		let tx = TransactionContext::new();
		let result = self.dispatch(&message, &tx).await;
		tx.complete(if result.is_ok() {
			Outcome::Committed
		} else {
			Outcome::Failed
		});
		result
	}

	/// Dispatch `message` inside a transaction owned by the caller.
	///
	/// The transaction is left open; completing it is the caller's job.
	pub async fn dispatch<M: Message>(
		&self,
		message: &M,
		tx: &TransactionContext,
	) -> Result<DispatchReport, BusError> {
		if !self.is_running() {
			return Err(BusError::Stopped(self.options.name.clone()));
		}

		let handlers = self
			.activator
			.get_handlers(message, tx)
			.await
			.map_err(BusError::Activation)?;

		let limit = self.options.max_handlers_per_message;
		if limit > 0 && handlers.len() > limit {
			return Err(BusError::TooManyHandlers {
				message_type: type_name::<M>(),
				count: handlers.len(),
				limit,
			});
		}

		for handler in &handlers {
			handler
				.handle(message, tx)
				.await
				.map_err(|source| BusError::Handler {
					message_type: type_name::<M>(),
					source,
				})?;
		}

		Ok(DispatchReport {
			transaction_id: tx.id().to_string(),
			handlers_invoked: handlers.len(),
		})
	}
}
