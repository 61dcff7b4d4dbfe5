//! JSON-RPC API Layer
//!
//! On-demand trigger surface over the `Operations` facade: the same entry
//! points the periodic jobs call.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
