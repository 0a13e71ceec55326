//! # Courier Activator
//!
//! Resolves message handlers from a [`courier_di`] container, one lifetime
//! scope per transaction.
//!
//! ## Overview
//!
//! - [`ContainerBinder`]: holds the root container once it is built and
//!   rejects containers carrying more than one bus
//! - [`PlanCache`]: memoized handler lookup keys per message type
//! - [`ScopeManager`]: one lifetime scope per [`TransactionContext`],
//!   disposed when the transaction completes
//! - [`ContainerActivator`]: the [`HandlerActivator`] tying the three together
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use courier_activator::{ContainerActivator, ContainerBuilderExt};
//! use courier_bus::{Handler, HandlerResult, Hierarchy, Message, TransactionContext};
//! use courier_di::{ContainerBuilder, Lifetime};
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
//! struct AuditTrail;
//!
//! #[async_trait]
//! impl Handler<DomainEvent> for AuditTrail {
//!     async fn handle(&self, _event: &DomainEvent, _tx: &TransactionContext) -> HandlerResult {
//!         Ok(())
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let mut builder = ContainerBuilder::new();
//! builder.register_handler::<DomainEvent, _, _>(Lifetime::Scoped, |_| Ok(AuditTrail));
//!
//! let activator = ContainerActivator::builder()
//!     .container(&mut builder)
//!     .configure(|bus, _scope| bus)
//!     .install()
//!     .unwrap();
//! let _container = builder.build().unwrap();
//!
//! let tx = TransactionContext::new();
//! let order = OrderPlaced { event: DomainEvent };
//! let handlers = activator.resolve_handlers(&order, &tx).await.unwrap();
//! assert_eq!(handlers.len(), 1);
//! # });
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ContainerBuilder::build()
//!     → ContainerBinder::on_container_built (validate, bind, optional eager start)
//!
//! ContainerActivator::resolve_handlers(message, tx)
//!     → ScopeManager::scope_for(tx)        (created once, disposed on completion)
//!     → PlanCache::plan_for::<M>()         (computed once per message type)
//!     → ResolutionPlan::resolve(scope)     (fresh handlers, plan order)
//! ```

pub mod activator;
pub mod binder;
pub mod error;
pub mod plan;
pub mod registration;
pub mod scope_manager;
pub mod settings;

pub use activator::{ActivatorBuilder, ContainerActivator, ContainerBus};
pub use binder::ContainerBinder;
pub use error::{ActivatorError, ActivatorResult, ConfigurationError};
pub use plan::{PlanCache, ResolutionPlan};
pub use registration::ContainerBuilderExt;
pub use scope_manager::{SCOPE_ITEM_KEY, ScopeManager};
pub use settings::{ActivatorSettings, SettingsError};

#[doc(no_inline)]
pub use courier_bus::{HandlerActivator, TransactionContext};
