// Application layer - session state and orchestration on top of the ledger.

pub mod config;
pub mod error;
pub mod service;
pub mod shared;

pub use config::*;
pub use error::*;
pub use service::*;
pub use shared::*;
