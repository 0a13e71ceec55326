//! Dependency injection container.
//!
//! # Examples
//!
//! ```rust
//! use courier::di::{ContainerBuilder, Lifetime};
//! use std::sync::Arc;
//!
//! let mut builder = ContainerBuilder::new();
//! builder.register::<String, _>(Lifetime::Singleton, |_| Ok(Arc::new("orders".to_string())));
//! let container = builder.build().unwrap();
//! assert_eq!(*container.resolve::<String>().unwrap(), "orders");
//! ```

pub use courier_di::*;
