//! Container-backed handler activation.
//!
//! See [`ContainerActivator`] for installation on a container builder.

pub use courier_activator::*;
