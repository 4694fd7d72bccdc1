pub mod orchestrator;
pub mod scope;
pub mod traits;

pub use orchestrator::{FixOrchestrator, FixReport};
pub use scope::FixScope;
