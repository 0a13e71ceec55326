//! # Courier Bus
//!
//! Message-processing contracts that Courier's handler activation plugs into.
//!
//! ## Overview
//!
//! - [`Message`] and [`Hierarchy`]: which handler collections apply to a message
//! - [`Handler`]: the capability a component implements to process a message type
//! - [`TransactionContext`]: per-message extension slot and completion callbacks
//! - [`HandlerActivator`]: produces handler instances for a message
//! - [`BusConfigurer`] and [`Bus`]: configure, start and run an in-process bus
//!
//! ## Architecture
//!
//! ```text
//! Bus::send(message)
//!     → TransactionContext::new()
//!     → HandlerActivator::get_handlers(message, tx)
//!     → Handler::handle(message, tx) for each handler
//!     → tx.complete(Committed | Failed)
//! ```

pub mod activator;
pub mod bus;
pub mod configurer;
pub mod error;
pub mod handler;
pub mod message;
pub mod options;
pub mod transaction;

pub use activator::HandlerActivator;
pub use bus::{Bus, DispatchReport};
pub use configurer::BusConfigurer;
pub use error::{BoxError, BusError, ItemTypeMismatch};
pub use handler::{Handler, HandlerResult};
pub use message::{Ancestor, HandlerKey, Hierarchy, Message};
pub use options::BusOptions;
pub use transaction::{Outcome, TransactionContext};
