//! hostgate gateway: server registry, identity store and operation
//! dispatch behind an axum HTTP API.

pub mod dispatch;
pub mod error;
pub mod identity;
pub mod producers;
pub mod registry;
pub mod routes;
pub mod state;

pub use dispatch::{OperationDispatcher, OperationOutput, OperationRequest};
pub use error::{AuthError, OperationError, RegisterError, RegistryError};
pub use identity::IdentityStore;
pub use producers::{OperationProducer, SimulatedHost};
pub use registry::{AddressPolicy, ServerRegistry};
pub use routes::{ApiError, router};
pub use state::AppState;
