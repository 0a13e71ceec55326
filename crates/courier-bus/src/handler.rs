//! The message handler capability

use crate::error::BoxError;
use crate::transaction::TransactionContext;
use async_trait::async_trait;
use std::sync::Arc;

/// Result returned by [`Handler::handle`]
pub type HandlerResult = Result<(), BoxError>;

/// A component that processes messages of type `M`.
///
/// `M` may be a concrete message type or a capability shared by several
/// message types (`dyn Trait`). Handlers for a capability receive any
/// message that declares it in its [`Hierarchy`](crate::Hierarchy).
///
/// # Examples
///
/// ```rust
/// use courier_bus::{Handler, HandlerResult, TransactionContext};
/// use async_trait::async_trait;
///
/// struct OrderPlaced {
///     order_id: u64,
/// }
///
/// struct SendConfirmation;
///
/// #[async_trait]
/// impl Handler<OrderPlaced> for SendConfirmation {
///     async fn handle(&self, message: &OrderPlaced, _tx: &TransactionContext) -> HandlerResult {
///         println!("confirming order {}", message.order_id);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<M: ?Sized + Send + Sync>: Send + Sync {
	async fn handle(&self, message: &M, tx: &TransactionContext) -> HandlerResult;
}

/// Adapts a handler of `A` into a handler of `M` through a projection.
pub(crate) struct Projected<M: ?Sized, A: ?Sized + Send + Sync + 'static> {
	pub(crate) inner: Arc<dyn Handler<A>>,
	pub(crate) project: fn(&M) -> &A,
}

#[async_trait]
impl<M, A> Handler<M> for Projected<M, A>
where
	M: ?Sized + Send + Sync + 'static,
	A: ?Sized + Send + Sync + 'static,
{
	async fn handle(&self, message: &M, tx: &TransactionContext) -> HandlerResult {
		self.inner.handle((self.project)(message), tx).await
	}
}
