//! In-process bus dispatch tests

use async_trait::async_trait;
use courier_bus::{
	BoxError, BusConfigurer, BusError, BusOptions, Handler, HandlerActivator, HandlerResult,
	Hierarchy, Message, Outcome, TransactionContext,
};
use parking_lot::Mutex;
use rstest::*;
use std::sync::Arc;

struct Ping(u32);

impl Message for Ping {}

struct Recorder {
	label: &'static str,
	log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Handler<Ping> for Recorder {
	async fn handle(&self, message: &Ping, _tx: &TransactionContext) -> HandlerResult {
		self.log.lock().push(format!("{}:{}", self.label, message.0));
		Ok(())
	}
}

struct Failing;

#[async_trait]
impl Handler<Ping> for Failing {
	async fn handle(&self, _message: &Ping, _tx: &TransactionContext) -> HandlerResult {
		Err("handler exploded".into())
	}
}

/// Hands out a fixed list of `Ping` handlers and records every outcome.
#[derive(Clone, Default)]
struct FixedActivator {
	handlers: Arc<Mutex<Vec<Arc<dyn Handler<Ping>>>>>,
	outcomes: Arc<Mutex<Vec<Outcome>>>,
}

#[async_trait]
impl HandlerActivator for FixedActivator {
	async fn get_handlers<M: Message>(
		&self,
		_message: &M,
		tx: &TransactionContext,
	) -> Result<Vec<Arc<dyn Handler<M>>>, BoxError> {
		let outcomes = self.outcomes.clone();
		tx.on_completed(move |outcome| outcomes.lock().push(outcome));

		let handlers = self.handlers.lock().clone();
		let mut resolved = Vec::new();
		for entry in Hierarchy::<M>::of() {
			for handler in &handlers {
				let erased: Arc<dyn std::any::Any + Send + Sync> = Arc::new(handler.clone());
				if let Some(lifted) = entry.lift(&*erased) {
					resolved.push(lifted);
				}
			}
		}
		Ok(resolved)
	}
}

#[fixture]
fn log() -> Arc<Mutex<Vec<String>>> {
	Arc::new(Mutex::new(Vec::new()))
}

#[rstest]
#[tokio::test]
async fn test_send_invokes_handlers_in_order_and_commits(log: Arc<Mutex<Vec<String>>>) {
	// Arrange
	let activator = FixedActivator::default();
	activator.handlers.lock().extend([
		Arc::new(Recorder { label: "a", log: log.clone() }) as Arc<dyn Handler<Ping>>,
		Arc::new(Recorder { label: "b", log: log.clone() }),
	]);
	let bus = BusConfigurer::with(activator.clone()).start().unwrap();

	// Act
	let report = bus.send(Ping(7)).await.unwrap();

	// Assert
	assert_eq!(report.handlers_invoked, 2);
	assert_eq!(*log.lock(), vec!["a:7", "b:7"]);
	assert_eq!(*activator.outcomes.lock(), vec![Outcome::Committed]);
}

#[rstest]
#[tokio::test]
async fn test_handler_failure_fails_transaction(log: Arc<Mutex<Vec<String>>>) {
	// Arrange
	let activator = FixedActivator::default();
	activator.handlers.lock().extend([
		Arc::new(Failing) as Arc<dyn Handler<Ping>>,
		Arc::new(Recorder { label: "after", log: log.clone() }),
	]);
	let bus = BusConfigurer::with(activator.clone()).start().unwrap();

	// Act
	let result = bus.send(Ping(1)).await;

	// Assert
	assert!(matches!(result, Err(BusError::Handler { .. })));
	assert!(log.lock().is_empty());
	assert_eq!(*activator.outcomes.lock(), vec![Outcome::Failed]);
}

#[rstest]
#[tokio::test]
async fn test_handler_limit_is_enforced(log: Arc<Mutex<Vec<String>>>) {
	// Arrange
	let activator = FixedActivator::default();
	activator.handlers.lock().extend([
		Arc::new(Recorder { label: "a", log: log.clone() }) as Arc<dyn Handler<Ping>>,
		Arc::new(Recorder { label: "b", log: log.clone() }),
	]);
	let bus = BusConfigurer::with(activator)
		.max_handlers_per_message(1)
		.start()
		.unwrap();

	// Act
	let result = bus.send(Ping(3)).await;

	// Assert
	assert!(matches!(
		result,
		Err(BusError::TooManyHandlers { count: 2, limit: 1, .. })
	));
	assert!(log.lock().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_stopped_bus_rejects_messages() {
	// Arrange
	let bus = BusConfigurer::with(FixedActivator::default()).named("orders").start().unwrap();

	// Act
	assert!(bus.stop());
	let result = bus.send(Ping(0)).await;

	// Assert
	assert!(!bus.stop());
	assert!(matches!(result, Err(BusError::Stopped(name)) if name == "orders"));
}

#[rstest]
#[case("")]
#[case("   ")]
fn test_blank_name_is_rejected(#[case] name: &str) {
	let result = BusConfigurer::with(FixedActivator::default()).named(name).start();

	assert!(matches!(result, Err(BusError::InvalidOptions(_))));
}

#[rstest]
fn test_options_replace_defaults() {
	// Arrange
	let options = BusOptions {
		name: "billing".to_string(),
		max_handlers_per_message: 4,
	};

	// Act
	let bus = BusConfigurer::with(FixedActivator::default())
		.options(options.clone())
		.start()
		.unwrap();

	// Assert
	assert_eq!(bus.options(), &options);
}
