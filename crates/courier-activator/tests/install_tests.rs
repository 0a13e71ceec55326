//! Installing the activator and binding the built container

use courier_activator::{
	ActivatorError, ActivatorSettings, ConfigurationError, ContainerActivator, ContainerBus,
};
use courier_bus::{BusConfigurer, BusError};
use courier_di::{ContainerBuilder, DiError, LifetimeScope};
use rstest::*;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn passthrough(
	bus: BusConfigurer<ContainerActivator>,
	_scope: &LifetimeScope,
) -> BusConfigurer<ContainerActivator> {
	bus
}

#[rstest]
fn test_missing_configure_callback_is_argument_error() {
	// Arrange
	let mut builder = ContainerBuilder::new();

	// Act
	let result = ContainerActivator::builder().container(&mut builder).install();

	// Assert
	assert!(matches!(result, Err(ActivatorError::Argument("configure"))));
	assert!(builder.is_empty());
	assert!(builder.build().is_ok());
}

#[rstest]
fn test_missing_container_builder_is_argument_error() {
	let result = ContainerActivator::builder().configure(passthrough).install();

	assert!(matches!(result, Err(ActivatorError::Argument("container"))));
}

#[rstest]
fn test_install_registers_one_bus() {
	let mut builder = ContainerBuilder::new();

	let _activator = ContainerActivator::builder()
		.container(&mut builder)
		.configure(passthrough)
		.install()
		.unwrap();

	assert_eq!(builder.len(), 1);
}

#[rstest]
fn test_installing_twice_aborts_build() {
	// Arrange
	let mut builder = ContainerBuilder::new();
	let mut activators = Vec::new();
	for _ in 0..2 {
		let activator = ContainerActivator::builder()
			.container(&mut builder)
			.configure(passthrough)
			.install()
			.unwrap();
		activators.push(activator);
	}

	// Act
	let error = ActivatorError::from(builder.build().unwrap_err());

	// Assert
	assert!(matches!(
		error,
		ActivatorError::Configuration(ConfigurationError::MultipleBusRegistrations { count: 2 })
	));
	for activator in &activators {
		assert!(!activator.binder().is_bound());
		assert!(activator.plans().is_empty());
	}
}

#[rstest]
fn test_second_bind_is_rejected() {
	// Arrange
	let mut builder = ContainerBuilder::new();
	let activator = ContainerActivator::builder()
		.container(&mut builder)
		.configure(passthrough)
		.install()
		.unwrap();
	let container = builder.build().unwrap();

	// Act
	let result = activator.binder().bind(&container);

	// Assert
	assert!(matches!(result, Err(ConfigurationError::AlreadyBound)));
	assert!(activator.binder().container().unwrap().ptr_eq(&container));
}

#[rstest]
#[case(true, 1)]
#[case(false, 0)]
fn test_start_bus_controls_eager_configuration(#[case] start_bus: bool, #[case] expected: usize) {
	// Arrange
	let configured = Arc::new(AtomicUsize::new(0));
	let counter = configured.clone();
	let mut builder = ContainerBuilder::new();
	let activator = ContainerActivator::builder()
		.container(&mut builder)
		.configure(move |bus, _scope: &LifetimeScope| {
			counter.fetch_add(1, Ordering::SeqCst);
			bus
		})
		.start_bus(start_bus)
		.install()
		.unwrap();

	// Act
	let _container = builder.build().unwrap();
	let configured_at_build = configured.load(Ordering::SeqCst);
	let first = activator.bus().unwrap();
	let second = activator.bus().unwrap();

	// Assert
	assert_eq!(configured_at_build, expected);
	assert_eq!(configured.load(Ordering::SeqCst), 1);
	assert!(Arc::ptr_eq(&first, &second));
	assert!(first.is_running());
}

#[rstest]
fn test_eager_start_failure_is_bus_startup_error() {
	// Arrange
	let mut builder = ContainerBuilder::new();
	ContainerActivator::builder()
		.container(&mut builder)
		.configure(|bus, _scope: &LifetimeScope| bus.named(""))
		.install()
		.unwrap();

	// Act
	let error = ActivatorError::from(builder.build().unwrap_err());

	// Assert
	match error {
		ActivatorError::Configuration(ConfigurationError::BusStartup(DiError::Factory {
			source,
			..
		})) => {
			assert!(matches!(
				source.downcast_ref::<BusError>(),
				Some(BusError::InvalidOptions(_))
			));
		}
		other => panic!("expected bus startup error, got {other:?}"),
	}
}

#[rstest]
fn test_lazy_start_failure_surfaces_on_first_access() {
	// Arrange
	let mut builder = ContainerBuilder::new();
	let activator = ContainerActivator::builder()
		.container(&mut builder)
		.configure(|bus, _scope: &LifetimeScope| bus.named(" "))
		.start_bus(false)
		.install()
		.unwrap();
	let _container = builder.build().unwrap();

	// Act
	let result = activator.bus();

	// Assert
	assert!(matches!(
		result,
		Err(ActivatorError::Container(DiError::Factory { .. }))
	));
}

#[rstest]
fn test_bus_before_build_is_illegal_state() {
	let mut builder = ContainerBuilder::new();
	let activator = ContainerActivator::builder()
		.container(&mut builder)
		.configure(passthrough)
		.install()
		.unwrap();

	let result = activator.bus();

	assert!(matches!(result, Err(ActivatorError::IllegalState(_))));
}

#[rstest]
fn test_settings_file_configures_bus() {
	// Arrange
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(
		file,
		"start_bus = false\n\n[bus]\nname = \"billing\"\nmax_handlers_per_message = 8"
	)
	.unwrap();
	let settings = ActivatorSettings::from_file(file.path()).unwrap();
	let mut builder = ContainerBuilder::new();
	let activator = ContainerActivator::builder()
		.container(&mut builder)
		.configure(passthrough)
		.settings(settings)
		.install()
		.unwrap();
	let container = builder.build().unwrap();

	// Act
	let bus = container.resolve::<ContainerBus>().unwrap();

	// Assert
	assert_eq!(bus.name(), "billing");
	assert_eq!(bus.options().max_handlers_per_message, 8);
	assert!(Arc::ptr_eq(&bus, &activator.bus().unwrap()));
}

#[rstest]
fn test_configure_callback_overrides_settings() {
	let mut builder = ContainerBuilder::new();
	let activator = ContainerActivator::builder()
		.container(&mut builder)
		.settings(ActivatorSettings::from_toml_str("[bus]\nname = \"billing\"").unwrap())
		.configure(|bus, _scope: &LifetimeScope| bus.named("invoicing"))
		.install()
		.unwrap();
	let _container = builder.build().unwrap();

	assert_eq!(activator.bus().unwrap().name(), "invoicing");
}
