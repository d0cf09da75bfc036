//! Application state shared by every request handler.

use std::sync::Arc;

use hostgate_common::GatewayConfig;

use crate::dispatch::OperationDispatcher;
use crate::identity::IdentityStore;
use crate::producers::{OperationProducer, SimulatedHost};
use crate::registry::{AddressPolicy, ServerRegistry};

/// Stores and dispatcher, built once at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<ServerRegistry>,
    pub identity: Arc<IdentityStore>,
    pub dispatcher: OperationDispatcher,
}

impl AppState {
    /// State backed by the simulated producer.
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_producer(config, Arc::new(SimulatedHost))
    }

    pub fn with_producer(config: &GatewayConfig, producer: Arc<dyn OperationProducer>) -> Self {
        let policy = if config.unique_addresses {
            AddressPolicy::Unique
        } else {
            AddressPolicy::AllowDuplicates
        };
        let registry = Arc::new(ServerRegistry::with_policy(policy));
        let identity = Arc::new(IdentityStore::new());
        let dispatcher = OperationDispatcher::new(Arc::clone(&registry), producer);

        tracing::info!(address_policy = ?policy, "gateway state initialised");

        Self {
            registry,
            identity,
            dispatcher,
        }
    }
}
