pub mod docker;
pub mod error;
pub mod state;

pub use docker::{DockerEngine, Engine};
pub use error::EngineError;
pub use state::DashboardState;
