//! The container-backed handler activator

use crate::binder::ContainerBinder;
use crate::error::{ActivatorError, ActivatorResult};
use crate::plan::PlanCache;
use crate::scope_manager::ScopeManager;
use crate::settings::ActivatorSettings;
use async_trait::async_trait;
use courier_bus::{
	BoxError, Bus, BusConfigurer, Handler, HandlerActivator, Message, TransactionContext,
};
use courier_di::{ContainerBuilder, DiError, Lifetime, LifetimeScope};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// The bus type the activator registers in the container.
pub type ContainerBus = Bus<ContainerActivator>;

type ConfigureFn = dyn Fn(BusConfigurer<ContainerActivator>, &LifetimeScope) -> BusConfigurer<ContainerActivator>
	+ Send
	+ Sync;

/// Resolves message handlers from a dependency injection container.
///
/// Every transaction gets its own lifetime scope, and the handler lookup
/// keys for each message type are computed once and cached. Handlers are
/// resolved fresh on every call.
///
/// Created through [`ContainerActivator::builder`], which also registers
/// the bus in the container.
#[derive(Clone)]
pub struct ContainerActivator {
	binder: Arc<ContainerBinder>,
	plans: Arc<PlanCache>,
	scopes: ScopeManager,
}

impl ContainerActivator {
	fn new() -> Self {
		let binder = Arc::new(ContainerBinder::new());
		Self {
			scopes: ScopeManager::new(binder.clone()),
			plans: Arc::new(PlanCache::new()),
			binder,
		}
	}

	pub fn builder<'a>() -> ActivatorBuilder<'a> {
		ActivatorBuilder::new()
	}

	pub fn binder(&self) -> &ContainerBinder {
		&self.binder
	}

	pub fn plans(&self) -> &PlanCache {
		&self.plans
	}

	pub fn scopes(&self) -> &ScopeManager {
		&self.scopes
	}

	/// Resolve every handler that applies to `message` within `tx`.
	///
	/// Handlers come back in plan order, ancestors before the message type
	/// itself. Container failures are returned as
	/// [`ActivatorError::Container`] without translation.
	pub async fn resolve_handlers<M: Message>(
		&self,
		_message: &M,
		tx: &TransactionContext,
	) -> ActivatorResult<Vec<Arc<dyn Handler<M>>>> {
		let scope = self.scopes.scope_for(tx)?;
		let plan = self.plans.plan_for::<M>();
		plan.resolve(&scope)
	}

	/// The bus registered by this activator, started on first access.
	pub fn bus(&self) -> ActivatorResult<Arc<ContainerBus>> {
		Ok(self.binder.container()?.resolve::<ContainerBus>()?)
	}
}

#[async_trait]
impl HandlerActivator for ContainerActivator {
	async fn get_handlers<M: Message>(
		&self,
		message: &M,
		tx: &TransactionContext,
	) -> Result<Vec<Arc<dyn Handler<M>>>, BoxError> {
		self.resolve_handlers(message, tx).await.map_err(Into::into)
	}
}

impl fmt::Debug for ContainerActivator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContainerActivator")
			.field("binder", &self.binder)
			.field("plans", &self.plans)
			.finish()
	}
}

/// Installs a [`ContainerActivator`] on a container builder.
///
/// Both [`container`](Self::container) and [`configure`](Self::configure)
/// are required.
///
/// # Examples
///
/// ```
/// use courier_activator::{ContainerActivator, ContainerBus};
/// use courier_di::ContainerBuilder;
///
/// let mut builder = ContainerBuilder::new();
/// let activator = ContainerActivator::builder()
///     .container(&mut builder)
///     .configure(|bus, _scope| bus.named("orders"))
///     .install()
///     .unwrap();
///
/// let container = builder.build().unwrap();
/// let bus = container.resolve::<ContainerBus>().unwrap();
/// assert_eq!(bus.name(), "orders");
/// assert!(activator.binder().is_bound());
/// ```
pub struct ActivatorBuilder<'a> {
	container: Option<&'a mut ContainerBuilder>,
	configure: Option<Arc<ConfigureFn>>,
	settings: ActivatorSettings,
}

impl<'a> ActivatorBuilder<'a> {
	pub fn new() -> Self {
		Self {
			container: None,
			configure: None,
			settings: ActivatorSettings::default(),
		}
	}

	/// The builder of the container that will own the bus.
	pub fn container(mut self, builder: &'a mut ContainerBuilder) -> Self {
		self.container = Some(builder);
		self
	}

	/// Bus configuration callback.
	///
	/// Runs once, when the bus is first resolved, with a configurer already
	/// carrying the bus options from the settings and the scope resolving
	/// the bus.
	pub fn configure<F>(mut self, configure: F) -> Self
	where
		F: Fn(BusConfigurer<ContainerActivator>, &LifetimeScope) -> BusConfigurer<ContainerActivator>
			+ Send
			+ Sync
			+ 'static,
	{
		self.configure = Some(Arc::new(configure));
		self
	}

	/// Whether to start the bus as soon as the container is built.
	pub fn start_bus(mut self, start_bus: bool) -> Self {
		self.settings.start_bus = start_bus;
		self
	}

	/// Replace all settings at once.
	pub fn settings(mut self, settings: ActivatorSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Register the bus and the build callback, then return the activator.
	///
	/// Fails with [`ActivatorError::Argument`] before touching the container
	/// builder if either required parameter is missing.
	pub fn install(self) -> ActivatorResult<ContainerActivator> {
		let configure = self.configure.ok_or(ActivatorError::Argument("configure"))?;
		let builder = self.container.ok_or(ActivatorError::Argument("container"))?;

		let activator = ContainerActivator::new();
		let bus_activator = activator.clone();
		let options = self.settings.bus;
		builder.register::<ContainerBus, _>(Lifetime::Singleton, move |scope| {
			let configurer = BusConfigurer::with(bus_activator.clone()).options(options.clone());
			configure(configurer, scope)
				.start()
				.map_err(|err| DiError::factory(type_name::<ContainerBus>(), err))
		});

		let binder = activator.binder.clone();
		let start_bus = self.settings.start_bus;
		builder.on_built(move |container| {
			binder
				.on_container_built::<ContainerBus>(container, start_bus)
				.map_err(Into::into)
		});

		tracing::debug!(start_bus, "Handler activator installed");
		Ok(activator)
	}
}

impl Default for ActivatorBuilder<'_> {
	fn default() -> Self {
		Self::new()
	}
}
