//! Handler registration helpers

use courier_bus::Handler;
use courier_di::{ContainerBuilder, DiResult, Lifetime, LifetimeScope};
use std::sync::Arc;

/// Registers message handlers on a [`ContainerBuilder`].
///
/// A handler is stored under the handler capability of the type it handles,
/// `dyn Handler<M>`, which is the key the activator resolves for every
/// message whose hierarchy contains `M`. A component that handles several
/// types is registered once per type.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use courier_activator::ContainerBuilderExt;
/// use courier_bus::{Handler, HandlerResult, TransactionContext};
/// use courier_di::{ContainerBuilder, Lifetime};
///
/// struct PaymentReceived;
/// struct Ledger;
///
/// #[async_trait]
/// impl Handler<PaymentReceived> for Ledger {
///     async fn handle(&self, _message: &PaymentReceived, _tx: &TransactionContext) -> HandlerResult {
///         Ok(())
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_handler::<PaymentReceived, _, _>(Lifetime::Scoped, |_| Ok(Ledger));
///
/// let container = builder.build().unwrap();
/// assert!(container.is_registered::<dyn Handler<PaymentReceived>>());
/// ```
pub trait ContainerBuilderExt {
	fn register_handler<M, H, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
	where
		M: ?Sized + Send + Sync + 'static,
		H: Handler<M> + 'static,
		F: Fn(&LifetimeScope) -> DiResult<H> + Send + Sync + 'static;
}

impl ContainerBuilderExt for ContainerBuilder {
	fn register_handler<M, H, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
	where
		M: ?Sized + Send + Sync + 'static,
		H: Handler<M> + 'static,
		F: Fn(&LifetimeScope) -> DiResult<H> + Send + Sync + 'static,
	{
		self.register::<dyn Handler<M>, _>(lifetime, move |scope| {
			let handler: Arc<dyn Handler<M>> = Arc::new(factory(scope)?);
			Ok(handler)
		})
	}
}
