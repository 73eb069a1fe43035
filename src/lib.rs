//! Agent orchestration core.
//!
//! - [`extract`] recovers structured documents from LLM responses.
//! - [`dag`] orders agents by their declared dependencies and maps change
//!   categories to the agents they trigger.
//! - [`agents`] is the agent catalog; [`config`] loads `agentry.toml`.

pub mod agents;
pub mod config;
pub mod dag;
pub mod errors;
pub mod extract;

pub use agents::{AgentId, ChangeCategory};
pub use dag::AgentScheduler;
pub use extract::{Document, ExtractOptions, extract_document};
