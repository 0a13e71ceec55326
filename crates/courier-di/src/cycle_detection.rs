//! Thread-local circular dependency detection
//!
//! Factories run synchronously, so the chain of services currently being
//! constructed on a thread is exactly the resolution path. Every factory
//! invocation pushes its service onto that path through a
//! [`ResolutionGuard`], which pops it again when dropped.

use crate::error::DiError;
use crate::key::ServiceKey;
use std::cell::RefCell;

/// Maximum resolution depth (prevents pathological cases)
pub const MAX_RESOLUTION_DEPTH: usize = 100;

thread_local! {
	static RESOLUTION_PATH: RefCell<Vec<ServiceKey>> = const { RefCell::new(Vec::new()) };
}

/// Record the start of a service construction.
///
/// Fails if `key` is already being constructed further up the path, or if
/// the path is already [`MAX_RESOLUTION_DEPTH`] entries long.
pub(crate) fn begin_resolution(key: ServiceKey) -> Result<ResolutionGuard, DiError> {
	RESOLUTION_PATH.with(|path| {
		let mut path = path.borrow_mut();

		if let Some(start) = path.iter().position(|entry| *entry == key) {
			let cycle = path[start..]
				.iter()
				.chain(std::iter::once(&key))
				.map(ServiceKey::type_name)
				.collect::<Vec<_>>()
				.join(" -> ");
			return Err(DiError::CircularDependency {
				service: key.type_name(),
				path: cycle,
			});
		}

		if path.len() >= MAX_RESOLUTION_DEPTH {
			return Err(DiError::MaxDepthExceeded(path.len() + 1));
		}

		path.push(key);
		Ok(ResolutionGuard { _private: () })
	})
}

/// Pops the current service off the resolution path when dropped.
pub(crate) struct ResolutionGuard {
	_private: (),
}

impl Drop for ResolutionGuard {
	fn drop(&mut self) {
		RESOLUTION_PATH.with(|path| {
			path.borrow_mut().pop();
		});
	}
}
