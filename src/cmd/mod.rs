//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                          |
//! |------------|-------------------------------------------|
//! | `extract`  | `Extract`                                 |
//! | `schedule` | `Order`, `Affected`, `Impact`, `Agents`   |
//! | `config`   | `Config`                                  |

pub mod config;
pub mod extract;
pub mod schedule;

pub use config::cmd_config;
pub use extract::{ExtractMode, cmd_extract};
pub use schedule::{cmd_affected, cmd_agents, cmd_impact, cmd_order};
