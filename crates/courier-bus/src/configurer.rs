//! Builder-style bus configuration

use crate::activator::HandlerActivator;
use crate::bus::Bus;
use crate::error::BusError;
use crate::options::BusOptions;
use std::sync::Arc;

/// Configures a [`Bus`] around a handler activator, then starts it.
///
/// # Examples
///
/// ```rust
/// use courier_bus::{BusConfigurer, Handler, HandlerActivator, Message, TransactionContext, BoxError};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// struct NoHandlers;
///
/// #[async_trait]
/// impl HandlerActivator for NoHandlers {
///     async fn get_handlers<M: Message>(
///         &self,
///         _message: &M,
///         _tx: &TransactionContext,
///     ) -> Result<Vec<Arc<dyn Handler<M>>>, BoxError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let bus = BusConfigurer::with(NoHandlers).named("orders").start().unwrap();
/// assert_eq!(bus.name(), "orders");
/// assert!(bus.is_running());
/// ```
pub struct BusConfigurer<A> {
	activator: A,
	options: BusOptions,
}

impl<A: HandlerActivator> BusConfigurer<A> {
	pub fn with(activator: A) -> Self {
		Self {
			activator,
			options: BusOptions::default(),
		}
	}

	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.options.name = name.into();
		self
	}

	pub fn max_handlers_per_message(mut self, limit: usize) -> Self {
		self.options.max_handlers_per_message = limit;
		self
	}

	/// Replace every option at once.
	pub fn options(mut self, options: BusOptions) -> Self {
		self.options = options;
		self
	}

	pub fn current_options(&self) -> &BusOptions {
		&self.options
	}

	/// Validate the options and start the bus.
	pub fn start(self) -> Result<Arc<Bus<A>>, BusError> {
		self.options.validate()?;
		let bus = Bus::new(self.activator, self.options);
		tracing::debug!(bus = %bus.name(), "Bus started");
		Ok(Arc::new(bus))
	}
}
