//! Message contracts and the in-process bus.
//!
//! # Examples
//!
//! ```rust
//! use courier::bus::{Outcome, TransactionContext};
//!
//! let tx = TransactionContext::new();
//! assert!(tx.complete(Outcome::Committed));
//! assert_eq!(tx.outcome(), Some(Outcome::Committed));
//! ```

pub use courier_bus::*;
