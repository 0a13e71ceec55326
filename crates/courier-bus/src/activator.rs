//! The seam between the bus and whatever produces handler instances

use crate::error::BoxError;
use crate::handler::Handler;
use crate::message::Message;
use crate::transaction::TransactionContext;
use async_trait::async_trait;
use std::sync::Arc;

/// Produces the handler instances for one message within its transaction.
#[async_trait]
pub trait HandlerActivator: Send + Sync + 'static {
	async fn get_handlers<M: Message>(
		&self,
		message: &M,
		tx: &TransactionContext,
	) -> Result<Vec<Arc<dyn Handler<M>>>, BoxError>;
}
