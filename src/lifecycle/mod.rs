//! Session orchestration and tracing setup.

pub mod session;
pub mod tracing;

pub use session::InspectorSession;
pub use self::tracing::setup_tracing;
