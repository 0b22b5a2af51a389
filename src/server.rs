//! Server helpers for running the provider as a plugin.
//!
//! This module provides the `ProviderService` trait the provider implements,
//! and the `serve` function that starts a gRPC server and prints the handshake
//! line the host waits for.
//!
//! # Signal Handling
//!
//! The server handles OS signals (SIGTERM, SIGINT) for graceful shutdown.
//! When a signal is received, the server:
//! 1. Stops accepting new connections
//! 2. Waits for in-flight requests to complete (with configurable timeout)
//! 3. Calls the provider's `stop()` method
//! 4. Exits cleanly

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tonic::transport::Server;
use tracing::{debug, error, info, instrument, warn};

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSeverity, Diagnostics};
use crate::error::ProviderError;
use crate::schema::ProviderSchema;
use crate::types::{ProviderMetadata, HANDSHAKE_PREFIX, PROTOCOL_VERSION};

/// Capabilities a provider exposes to the host.
///
/// Configuration payloads arrive as JSON values; see
/// [`value`](crate::value) for how unresolved values are encoded.
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    /// Return the provider type name, version, and registered type names.
    fn metadata(&self) -> ProviderMetadata;

    /// Return the provider's schema including all resources and data sources.
    fn schema(&self) -> ProviderSchema;

    /// Validate the provider configuration without configuring.
    /// Returns diagnostics (errors and warnings).
    async fn validate_provider_config(
        &self,
        config: serde_json::Value,
    ) -> Result<Diagnostics, ProviderError> {
        let _ = config;
        Ok(Diagnostics::new())
    }

    /// Configure the provider with credentials and settings.
    /// Returns diagnostics (errors and warnings).
    async fn configure(&self, config: serde_json::Value) -> Result<Diagnostics, ProviderError>;

    /// Stop the provider gracefully.
    async fn stop(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Wrapper that implements the generated gRPC trait.
struct ProviderGrpcService<P: ProviderService> {
    provider: Arc<P>,
}

impl<P: ProviderService> ProviderGrpcService<P> {
    fn diagnostics_to_proto(&self, diagnostics: Diagnostics) -> Vec<crate::generated::Diagnostic> {
        diagnostics
            .into_iter()
            .map(|d| crate::generated::Diagnostic {
                severity: match d.severity {
                    DiagnosticSeverity::Error => {
                        crate::generated::diagnostic::Severity::Error as i32
                    },
                    DiagnosticSeverity::Warning => {
                        crate::generated::diagnostic::Severity::Warning as i32
                    },
                },
                summary: d.summary,
                detail: d.detail.unwrap_or_default(),
                attribute: d.attribute.unwrap_or_default(),
            })
            .collect()
    }

    fn error_to_diagnostics(&self, err: ProviderError) -> Vec<crate::generated::Diagnostic> {
        vec![crate::generated::Diagnostic {
            severity: crate::generated::diagnostic::Severity::Error as i32,
            summary: err.to_string(),
            detail: String::new(),
            attribute: String::new(),
        }]
    }

    /// Run a diagnostics-returning call and convert its outcome for the wire.
    fn finish(
        &self,
        operation: &'static str,
        result: Result<Diagnostics, ProviderError>,
    ) -> Vec<crate::generated::Diagnostic> {
        match result {
            Ok(diagnostics) => {
                if diagnostics.has_error() {
                    warn!(
                        diagnostics = diagnostics.len(),
                        "{} completed with errors", operation
                    );
                } else {
                    info!("{} completed successfully", operation);
                }
                self.diagnostics_to_proto(diagnostics)
            },
            Err(e) => {
                error!(error = %e, "{} failed", operation);
                self.error_to_diagnostics(e)
            },
        }
    }
}

fn schema_to_proto(
    schema: &crate::schema::Schema,
) -> Result<crate::generated::Schema, ProviderError> {
    let attributes = schema
        .block
        .attributes
        .iter()
        .map(|(name, attr)| {
            Ok(crate::generated::Attribute {
                name: name.clone(),
                r#type: serde_json::to_vec(&attr.attr_type)?,
                required: attr.flags.required,
                optional: attr.flags.optional,
                computed: attr.flags.computed,
                sensitive: attr.flags.sensitive,
                description: attr.description.clone().unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, ProviderError>>()?;

    Ok(crate::generated::Schema {
        version: schema.version as i64,
        block: Some(crate::generated::Block {
            attributes,
            description: schema.block.description.clone().unwrap_or_default(),
        }),
    })
}

fn schemas_to_proto<'a>(
    schemas: impl IntoIterator<Item = (&'a String, &'a crate::schema::Schema)>,
) -> Result<std::collections::HashMap<String, crate::generated::Schema>, ProviderError> {
    schemas
        .into_iter()
        .map(|(name, schema)| Ok((name.clone(), schema_to_proto(schema)?)))
        .collect()
}

/// Decode a JSON configuration payload. An empty payload reads as null.
fn decode_config(bytes: &[u8]) -> Result<serde_json::Value, ProviderError> {
    if bytes.is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_slice(bytes)?)
}

fn malformed_config(err: &ProviderError) -> Diagnostics {
    Diagnostics::from(
        Diagnostic::error("Invalid provider configuration")
            .with_detail(err.to_string())
            .with_kind(DiagnosticKind::InvalidConfigValue),
    )
}

#[tonic::async_trait]
impl<P: ProviderService> crate::generated::provider_server::Provider for ProviderGrpcService<P> {
    #[instrument(skip(self, _request), name = "grpc.get_metadata")]
    async fn get_metadata(
        &self,
        _request: tonic::Request<crate::generated::GetMetadataRequest>,
    ) -> Result<tonic::Response<crate::generated::GetMetadataResponse>, tonic::Status> {
        debug!("GetMetadata called");
        let metadata = self.provider.metadata();
        info!(
            type_name = %metadata.type_name,
            resources = metadata.resources.len(),
            data_sources = metadata.data_sources.len(),
            "GetMetadata completed"
        );
        Ok(tonic::Response::new(
            crate::generated::GetMetadataResponse {
                type_name: metadata.type_name,
                version: metadata.version,
                resources: metadata.resources,
                data_sources: metadata.data_sources,
                diagnostics: vec![],
            },
        ))
    }

    #[instrument(skip(self, _request), name = "grpc.get_schema")]
    async fn get_schema(
        &self,
        _request: tonic::Request<crate::generated::GetSchemaRequest>,
    ) -> Result<tonic::Response<crate::generated::GetSchemaResponse>, tonic::Status> {
        debug!("GetSchema called");
        let schema = self.provider.schema();
        info!(
            resources = schema.resources.len(),
            data_sources = schema.data_sources.len(),
            "GetSchema completed"
        );
        Ok(tonic::Response::new(crate::generated::GetSchemaResponse {
            provider: Some(schema_to_proto(&schema.provider)?),
            resources: schemas_to_proto(&schema.resources)?,
            data_sources: schemas_to_proto(&schema.data_sources)?,
            diagnostics: vec![],
        }))
    }

    // Request bodies carry the client secret and are never recorded.
    #[instrument(skip(self, request), name = "grpc.validate_provider_config")]
    async fn validate_provider_config(
        &self,
        request: tonic::Request<crate::generated::ValidateProviderConfigRequest>,
    ) -> Result<tonic::Response<crate::generated::ValidateProviderConfigResponse>, tonic::Status>
    {
        debug!("ValidateProviderConfig called");
        let req = request.into_inner();
        let result = match decode_config(&req.config) {
            Ok(config) => self.provider.validate_provider_config(config).await,
            Err(e) => Ok(malformed_config(&e)),
        };

        Ok(tonic::Response::new(
            crate::generated::ValidateProviderConfigResponse {
                diagnostics: self.finish("ValidateProviderConfig", result),
            },
        ))
    }

    #[instrument(skip(self, request), name = "grpc.configure")]
    async fn configure(
        &self,
        request: tonic::Request<crate::generated::ConfigureRequest>,
    ) -> Result<tonic::Response<crate::generated::ConfigureResponse>, tonic::Status> {
        let req = request.into_inner();
        debug!(host_version = %req.host_version, "Configure called");
        let result = match decode_config(&req.config) {
            Ok(config) => self.provider.configure(config).await,
            Err(e) => Ok(malformed_config(&e)),
        };

        Ok(tonic::Response::new(crate::generated::ConfigureResponse {
            diagnostics: self.finish("Configure", result),
        }))
    }

    #[instrument(skip(self, _request), name = "grpc.stop")]
    async fn stop(
        &self,
        _request: tonic::Request<crate::generated::StopRequest>,
    ) -> Result<tonic::Response<crate::generated::StopResponse>, tonic::Status> {
        info!("Stop called");
        match self.provider.stop().await {
            Ok(()) => {
                info!("Stop completed successfully");
                Ok(tonic::Response::new(crate::generated::StopResponse {
                    error: String::new(),
                }))
            },
            Err(e) => {
                error!(error = %e, "Stop failed");
                Ok(tonic::Response::new(crate::generated::StopResponse {
                    error: e.to_string(),
                }))
            },
        }
    }
}

/// Options for configuring the provider server.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Timeout for graceful shutdown. After receiving a shutdown signal,
    /// the server will wait this long for in-flight requests to complete.
    /// Default: 30 seconds.
    pub shutdown_timeout: Duration,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServeOptions {
    /// Create new serve options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// On Unix, this waits for SIGTERM or SIGINT.
/// On Windows, this waits for CTRL+C.
/// If a handler cannot be installed, the server runs until the host kills it.
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(error = %e, "Failed to install signal handlers");
                    std::future::pending::<()>().await;
                    return;
                },
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, initiating graceful shutdown");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, initiating graceful shutdown");
            }
        }
    }

    #[cfg(windows)]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received CTRL+C, initiating graceful shutdown"),
            Err(e) => {
                warn!(error = %e, "Failed to install CTRL+C handler");
                std::future::pending::<()>().await;
            },
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        std::future::pending::<()>().await;
    }
}

/// Serve a provider implementation as a gRPC server.
///
/// This function:
/// 1. Finds an available port
/// 2. Starts the gRPC server
/// 3. Outputs the handshake string to stdout
/// 4. Handles shutdown signals (SIGTERM/SIGINT) gracefully
///
/// The handshake format is: `TIDAL_PROVIDER|<version>|<address>`
///
/// For custom configuration, use [`serve_with_options`].
pub async fn serve<P: ProviderService>(provider: P) -> Result<(), ProviderError> {
    serve_with_options(provider, ServeOptions::default()).await
}

/// Serve a provider with custom options.
///
/// See [`serve`] for details. This function allows configuring
/// shutdown behavior via [`ServeOptions`].
pub async fn serve_with_options<P: ProviderService>(
    provider: P,
    options: ServeOptions,
) -> Result<(), ProviderError> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    serve_on_listener(provider, listener, addr, options, wait_for_shutdown_signal()).await
}

/// Serve a provider on a specific address.
///
/// Unlike [`serve`], this function binds to the specified address rather than
/// finding an available port.
pub async fn serve_on<P: ProviderService>(
    provider: P,
    addr: SocketAddr,
) -> Result<(), ProviderError> {
    serve_on_with_options(provider, addr, ServeOptions::default()).await
}

/// Serve a provider on a specific address with custom options.
pub async fn serve_on_with_options<P: ProviderService>(
    provider: P,
    addr: SocketAddr,
    options: ServeOptions,
) -> Result<(), ProviderError> {
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    serve_on_listener(provider, listener, actual_addr, options, wait_for_shutdown_signal()).await
}

/// Format the handshake line printed on stdout.
pub fn handshake_line(addr: SocketAddr) -> String {
    format!("{}|{}|{}", HANDSHAKE_PREFIX, PROTOCOL_VERSION, addr)
}

async fn serve_on_listener<P: ProviderService>(
    provider: P,
    listener: TcpListener,
    addr: SocketAddr,
    options: ServeOptions,
    shutdown: impl std::future::Future<Output = ()> + Send,
) -> Result<(), ProviderError> {
    println!("{}", handshake_line(addr));

    info!(address = %addr, "Provider server starting");

    let provider = Arc::new(provider);
    let provider_for_shutdown = Arc::clone(&provider);

    let grpc_service = ProviderGrpcService { provider };
    let server = crate::generated::provider_server::ProviderServer::new(grpc_service);

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server_future = Server::builder()
        .add_service(server)
        .serve_with_incoming_shutdown(
            tokio_stream::wrappers::TcpListenerStream::new(listener),
            async move {
                shutdown.await;
                let _ = signalled_tx.send(());
            },
        );
    tokio::pin!(server_future);

    // The timeout only bounds the drain of in-flight requests after a signal.
    let shutdown_result = tokio::select! {
        biased;
        result = &mut server_future => Some(result),
        _ = signalled_rx => {
            tokio::time::timeout(options.shutdown_timeout, &mut server_future)
                .await
                .ok()
        }
    };

    match shutdown_result {
        Some(Ok(())) => {
            info!("Server shutdown complete");
        }
        Some(Err(e)) => {
            error!(error = %e, "Server error during shutdown");
            return Err(e.into());
        }
        None => {
            warn!(
                timeout = ?options.shutdown_timeout,
                "Shutdown timeout exceeded, forcing shutdown"
            );
        }
    }

    debug!("Calling provider stop()");
    if let Err(e) = provider_for_shutdown.stop().await {
        warn!(error = %e, "Provider stop() returned error");
    }

    info!("Provider shutdown complete");
    Ok(())
}
