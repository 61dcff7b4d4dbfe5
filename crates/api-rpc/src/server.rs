//! JSON-RPC Server
//!
//! JSON-RPC 2.0 over HTTP on a loopback TCP port. Every method is a thin
//! trigger for one `Operations` entry point.

use crate::handler::RpcHandler;
use crate::types::{ListPredictionsRequest, SquadRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::{ErrorObjectOwned, Params};
use jsonrpsee::RpcModule;
use matchday_core::application::Operations;
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9527;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

/// Decode a request object sent by name (`{..}`) or as the single
/// positional parameter (`[{..}]`)
fn request<T: DeserializeOwned>(params: &Params<'_>) -> Result<T, ErrorObjectOwned> {
    match params.as_str() {
        Some(raw) if raw.trim_start().starts_with('[') => params.one(),
        _ => params.parse(),
    }
}

/// Registers a parameterless method that forwards to one handler call
macro_rules! register_trigger {
    ($module:expr, $handler:expr, $name:literal, $method:ident) => {{
        let handler = Arc::clone(&$handler);
        $module
            .register_async_method($name, move |_, _, _| {
                let handler = Arc::clone(&handler);
                async move { handler.$method().await }
            })
            .map_err(|e| e.to_string())?;
    }};
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, operations: Operations) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(operations)),
        }
    }

    /// Bind and start serving; returns the bound address and the stop handle
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let mut module = RpcModule::new(());

        register_trigger!(module, self.handler, "data.refresh.v1", refresh);
        register_trigger!(module, self.handler, "data.squads.v1", squads);
        register_trigger!(module, self.handler, "predictions.generate.v1", generate);
        register_trigger!(module, self.handler, "predictions.clear.v1", clear);
        register_trigger!(module, self.handler, "predictions.regenerate.v1", regenerate);
        register_trigger!(module, self.handler, "admin.stats.v1", stats);

        let handler = Arc::clone(&self.handler);
        module
            .register_async_method("data.squad.v1", move |params, _, _| {
                let handler = Arc::clone(&handler);
                async move {
                    let req: SquadRequest = request(&params)?;
                    handler.squad(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = Arc::clone(&self.handler);
        module
            .register_async_method("predictions.list.v1", move |params, _, _| {
                let handler = Arc::clone(&handler);
                async move {
                    // Parameters are optional: no params lists everything
                    let req: ListPredictionsRequest = match params.as_str().map(str::trim) {
                        None | Some("[]") | Some("{}") => ListPredictionsRequest::default(),
                        Some(_) => request(&params)?,
                    };
                    handler.list(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!(address = %local_addr, "JSON-RPC server listening");

        Ok((local_addr, server.start(module)))
    }
}
