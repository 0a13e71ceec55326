//! # Courier
//!
//! Dependency-injection backed handler activation for in-process message buses.
//!
//! For every inbound message Courier resolves the handlers that apply to it
//! from a container built once for the whole process, inside a lifetime
//! scope owned by the message's transaction.
//!
//! ## Feature Flags
//!
//! - `bus` - message contracts, transactions and the in-process bus
//! - `activator` - container-backed handler activation (implies `bus`)
//! - `full` (default) - everything
//!
//! The dependency injection container in [`di`] is always available.
//!
//! ## Quick Example
//!
//! ```rust
//! use courier::prelude::*;
//!
//! struct DomainEvent;
//! impl Message for DomainEvent {}
//!
//! struct OrderPlaced {
//!     event: DomainEvent,
//! }
//!
//! impl Message for OrderPlaced {
//!     fn ancestors(hierarchy: &mut Hierarchy<Self>) {
//!         hierarchy.inherit::<DomainEvent>(|order| &order.event);
//!     }
//! }
//!
//! struct PublishToOutbox;
//!
//! #[async_trait]
//! impl Handler<DomainEvent> for PublishToOutbox {
//!     async fn handle(&self, _event: &DomainEvent, _tx: &TransactionContext) -> HandlerResult {
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut builder = ContainerBuilder::new();
//! builder.register_handler::<DomainEvent, _, _>(Lifetime::Scoped, |_| Ok(PublishToOutbox));
//!
//! let activator = ContainerActivator::builder()
//!     .container(&mut builder)
//!     .configure(|bus, _scope| bus.named("orders"))
//!     .install()
//!     .unwrap();
//! let _container = builder.build().unwrap();
//!
//! let report = activator
//!     .bus()
//!     .unwrap()
//!     .send(OrderPlaced { event: DomainEvent })
//!     .await
//!     .unwrap();
//! assert_eq!(report.handlers_invoked, 1);
//! # }
//! ```

#[cfg(feature = "activator")]
pub mod activator;
#[cfg(feature = "bus")]
pub mod bus;
pub mod di;

/// Commonly used types
pub mod prelude {
	pub use crate::di::{Container, ContainerBuilder, DiError, Lifetime, LifetimeScope};

	#[cfg(feature = "bus")]
	pub use crate::bus::{
		Bus, BusConfigurer, BusError, Handler, HandlerResult, Hierarchy, Message, Outcome,
		TransactionContext,
	};

	#[cfg(feature = "activator")]
	pub use crate::activator::{
		ActivatorError, ActivatorSettings, ContainerActivator, ContainerBuilderExt, ContainerBus,
	};

	#[cfg(feature = "bus")]
	pub use async_trait::async_trait;
}
