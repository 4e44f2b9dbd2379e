//! Node assembly for the callscope tracker.
//!
//! Pulls the store, engines, broadcast hub, and HTTP surface together
//! behind a single configuration, and owns process concerns: logging,
//! listening, graceful shutdown.

pub mod config;
pub mod error;
pub mod logging;
pub mod node;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::CallscopeNode;
