//! # Courier Dependency Injection
//!
//! The container that powers Courier's handler activation.
//!
//! ## Features
//!
//! - **Unsized services**: register and resolve `dyn Trait` directly
//! - **Collections**: several components per service, resolved in order
//! - **Lifetimes**: singleton, scoped and transient components
//! - **Lifetime scopes**: child scopes with deterministic disposal
//! - **Build callbacks**: observe the one-time build of the root container
//! - **Cycle detection**: circular factories fail instead of overflowing
//!
//! ## Example
//!
//! ```rust
//! use courier_di::{ContainerBuilder, Lifetime};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let built = Arc::new(AtomicUsize::new(0));
//! let observed = built.clone();
//!
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .register::<u32, _>(Lifetime::Singleton, |_| Ok(Arc::new(7)))
//!     .on_built(move |_| {
//!         observed.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     });
//!
//! let container = builder.build().unwrap();
//! assert_eq!(built.load(Ordering::SeqCst), 1);
//!
//! let scope = container.begin_scope();
//! assert_eq!(*scope.resolve::<u32>().unwrap(), 7);
//! assert!(scope.dispose());
//! ```

pub mod builder;
pub mod container;
mod cycle_detection;
pub mod error;
pub mod key;
pub mod registration;
pub mod scope;

pub use builder::ContainerBuilder;
pub use container::Container;
pub use cycle_detection::MAX_RESOLUTION_DEPTH;
pub use error::{BoxError, DiError, DiResult};
pub use key::ServiceKey;
pub use registration::{ComponentRegistry, ErasedInstance, Lifetime, Registration, RegistrationId};
pub use scope::LifetimeScope;
