//! Lifetime scope isolation and disposal tests

use courier_di::{ContainerBuilder, DiError, Lifetime};
use rstest::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Connection {
	id: usize,
}

#[fixture]
fn container() -> courier_di::Container {
	let opened = Arc::new(AtomicUsize::new(0));
	let mut builder = ContainerBuilder::new();
	builder.register::<Connection, _>(Lifetime::Scoped, move |_| {
		Ok(Arc::new(Connection {
			id: opened.fetch_add(1, Ordering::SeqCst),
		}))
	});
	builder.build().unwrap()
}

#[rstest]
fn test_scoped_instance_is_reused_within_scope(container: courier_di::Container) {
	// Arrange
	let scope = container.begin_scope();

	// Act
	let a = scope.resolve::<Connection>().unwrap();
	let b = scope.clone().resolve::<Connection>().unwrap();

	// Assert
	assert!(Arc::ptr_eq(&a, &b));
	assert_eq!(scope.cached_instances(), 1);
}

#[rstest]
fn test_scopes_are_isolated(container: courier_di::Container) {
	// Arrange
	let first = container.begin_scope();
	let second = container.begin_scope();

	// Act
	let a = first.resolve::<Connection>().unwrap();
	let b = second.resolve::<Connection>().unwrap();

	// Assert
	assert_ne!(a.id, b.id);
	assert_ne!(first.id(), second.id());
	assert!(!first.ptr_eq(&second));
}

#[rstest]
fn test_tagged_scope_keeps_tag(container: courier_di::Container) {
	let scope = container.begin_tagged_scope("tx-42");

	assert_eq!(scope.tag(), Some("tx-42"));
	assert_eq!(container.begin_scope().tag(), None);
}

#[rstest]
fn test_dispose_runs_callbacks_once_in_reverse_order(container: courier_di::Container) {
	// Arrange
	let scope = container.begin_scope();
	let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
	let first = order.clone();
	let second = order.clone();
	scope.on_dispose(move || first.lock().push(1));
	scope.on_dispose(move || second.lock().push(2));

	// Act
	let disposed = scope.dispose();
	let disposed_again = scope.dispose();

	// Assert
	assert!(disposed);
	assert!(!disposed_again);
	assert_eq!(*order.lock(), vec![2, 1]);
}

#[rstest]
fn test_disposed_scope_rejects_resolution(container: courier_di::Container) {
	// Arrange
	let scope = container.begin_scope();
	scope.resolve::<Connection>().unwrap();

	// Act
	scope.dispose();
	let result = scope.resolve::<Connection>();

	// Assert
	assert!(matches!(result, Err(DiError::ScopeDisposed(id)) if id == scope.id()));
	assert_eq!(scope.cached_instances(), 0);
}

#[rstest]
fn test_callback_registered_after_dispose_runs_immediately(container: courier_di::Container) {
	// Arrange
	let scope = container.begin_scope();
	scope.dispose();
	let ran = Arc::new(AtomicUsize::new(0));
	let flag = ran.clone();

	// Act
	scope.on_dispose(move || {
		flag.fetch_add(1, Ordering::SeqCst);
	});

	// Assert
	assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[rstest]
fn test_dropping_last_handle_disposes_scope(container: courier_di::Container) {
	// Arrange
	let ran = Arc::new(AtomicUsize::new(0));
	let flag = ran.clone();
	let scope = container.begin_scope();
	scope.on_dispose(move || {
		flag.fetch_add(1, Ordering::SeqCst);
	});

	// Act
	drop(scope);

	// Assert
	assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_converges_on_one_scoped_instance(
	container: courier_di::Container,
) {
	// Arrange
	let scope = container.begin_scope();

	// Act
	let handles: Vec<_> = (0..16)
		.map(|_| {
			let scope = scope.clone();
			tokio::spawn(async move { scope.resolve::<Connection>().unwrap() })
		})
		.collect();
	let mut resolved = Vec::new();
	for handle in handles {
		resolved.push(handle.await.unwrap());
	}

	// Assert
	assert!(resolved.iter().all(|c| Arc::ptr_eq(c, &resolved[0])));
	assert_eq!(scope.cached_instances(), 1);
}

struct Repository {
	connection: Arc<Connection>,
}

#[rstest]
fn test_singleton_dependencies_resolve_from_root_scope() {
	// Arrange
	let mut builder = ContainerBuilder::new();
	builder
		.register::<Connection, _>(Lifetime::Scoped, |scope| {
			Ok(Arc::new(Connection {
				id: scope.id() as usize,
			}))
		})
		.register::<Repository, _>(Lifetime::Singleton, |scope| {
			Ok(Arc::new(Repository {
				connection: scope.resolve::<Connection>()?,
			}))
		});
	let container = builder.build().unwrap();
	let child = container.begin_tagged_scope("tx-1");

	// Act
	let from_child = child.resolve::<Repository>().unwrap();
	child.dispose();
	let from_other = container.begin_scope().resolve::<Repository>().unwrap();

	// Assert
	assert!(Arc::ptr_eq(&from_child, &from_other));
	assert_eq!(from_child.connection.id, container.root_scope().id() as usize);
	assert_ne!(from_child.connection.id, child.id() as usize);
	assert!(Arc::ptr_eq(
		&from_child.connection,
		&container.resolve::<Connection>().unwrap()
	));
}

#[rstest]
fn test_scopes_derived_from_children_share_root_singletons() {
	// Arrange
	let mut builder = ContainerBuilder::new();
	builder.register::<Connection, _>(Lifetime::Singleton, |scope| {
		Ok(Arc::new(Connection {
			id: scope.id() as usize,
		}))
	});
	let container = builder.build().unwrap();
	let grandchild = container.begin_scope().begin_scope();

	// Act
	let connection = grandchild.resolve::<Connection>().unwrap();

	// Assert
	assert_eq!(connection.id, container.root_scope().id() as usize);
}
