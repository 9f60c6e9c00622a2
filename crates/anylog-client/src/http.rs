//! Blocking GET executor for AnyLog nodes

use reqwest::StatusCode;
use reqwest::blocking::{Client, Request};
use reqwest::header::USER_AGENT as USER_AGENT_HEADER;
use tracing::{debug, instrument, warn};

use crate::config::{ConnectionRegistry, ConnectionState};
use crate::error::{ClientError, Result};

/// Client identifier sent with every request
pub const USER_AGENT: &str = "AnyLog/1.23";

/// Header carrying the command
pub const COMMAND_HEADER: &str = "command";

/// Header carrying the routing hint
pub const DESTINATION_HEADER: &str = "destination";

/// Where the node should run a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Only the node that receives the request
    Local,
    /// Broadcast to the node's network
    Network,
    /// Forward to specific peers (`ip:port`, comma separated)
    Node(String),
}

impl Destination {
    /// Resolve the routing flags
    ///
    /// An explicit destination wins over the broadcast flag.
    #[must_use]
    pub fn resolve(broadcast_to_network: bool, explicit_destination: &str) -> Self {
        if !explicit_destination.is_empty() {
            Destination::Node(explicit_destination.to_string())
        } else if broadcast_to_network {
            Destination::Network
        } else {
            Destination::Local
        }
    }

    /// Value of the `destination` header, `None` for local commands
    #[must_use]
    pub fn header_value(&self) -> Option<&str> {
        match self {
            Destination::Local => None,
            Destination::Network => Some("network"),
            Destination::Node(peer) => Some(peer),
        }
    }
}

/// Result of a single request attempt
///
/// `body` is empty unless `succeeded` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Whether the node answered 200 and the body was read
    pub succeeded: bool,
    /// Response payload, verbatim
    pub body: String,
}

impl RequestOutcome {
    /// Successful outcome carrying `body`
    #[must_use]
    pub fn success(body: String) -> Self {
        Self {
            succeeded: true,
            body,
        }
    }

    /// Failed outcome
    #[must_use]
    pub fn failure() -> Self {
        Self::default()
    }
}

/// Sends commands to the configured node, one blocking GET at a time
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
    registry: ConnectionRegistry,
}

impl RequestExecutor {
    /// Create an executor with an unconfigured registry
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_registry(ConnectionRegistry::new())
    }

    /// Create an executor for an existing registry
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_registry(registry: ConnectionRegistry) -> Result<Self> {
        // Deadlines are applied per request from the registry.
        let client = Client::builder().timeout(None).build()?;
        Ok(Self::with_client(client, registry))
    }

    /// Create an executor with a custom `reqwest::blocking::Client`
    #[must_use]
    pub fn with_client(client: Client, registry: ConnectionRegistry) -> Self {
        Self { client, registry }
    }

    /// Create an executor already pointed at `host_port`
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    ///
    /// # Example
    /// ```no_run
    /// use anylog_client::RequestExecutor;
    ///
    /// let executor = RequestExecutor::connect("127.0.0.1:32049", "", "", 30)?;
    /// let outcome = executor.execute_get("get status", false, "", true);
    /// if outcome.succeeded {
    ///     println!("{}", outcome.body);
    /// }
    /// # Ok::<(), anylog_client::ClientError>(())
    /// ```
    pub fn connect(
        host_port: &str,
        username: &str,
        password: &str,
        timeout_seconds: u64,
    ) -> Result<Self> {
        Self::with_registry(ConnectionRegistry::configured(
            host_port,
            username,
            password,
            timeout_seconds,
        ))
    }

    /// Replace the connection target
    pub fn configure(
        &mut self,
        host_port: &str,
        username: &str,
        password: &str,
        timeout_seconds: u64,
    ) {
        self.registry.configure(host_port, username, password, timeout_seconds);
    }

    /// Connection registry in use
    #[must_use]
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Build the GET request for `command` without sending it
    ///
    /// # Errors
    /// Returns an error if the registry is unconfigured or a header value is
    /// not valid (e.g. the command contains a newline).
    pub fn build_request(&self, command: &str, destination: &Destination) -> Result<Request> {
        let state = self.registry.current()?;
        Ok(self.request_for(&state, command, destination).build()?)
    }

    fn request_for(
        &self,
        state: &ConnectionState,
        command: &str,
        destination: &Destination,
    ) -> reqwest::blocking::RequestBuilder {
        let mut builder = self
            .client
            .get(state.base_url.as_str())
            .header(COMMAND_HEADER, command)
            .header(USER_AGENT_HEADER, USER_AGENT);

        if let Some(value) = destination.header_value() {
            builder = builder.header(DESTINATION_HEADER, value);
        }
        if state.has_credentials() {
            builder = builder.basic_auth(
                state.username.as_deref().unwrap_or_default(),
                state.password.as_deref(),
            );
        }
        if let Some(timeout) = state.timeout() {
            builder = builder.timeout(timeout);
        }
        builder
    }

    /// Send `command` and return the body of a 200 response
    ///
    /// Any status other than 200, including other 2xx codes, is an error.
    ///
    /// # Errors
    /// - [`ClientError::NotConfigured`] if the registry is empty
    /// - [`ClientError::Http`] on transport failure or timeout
    /// - [`ClientError::Status`] for a non-200 answer
    /// - [`ClientError::Body`] if the payload of a 200 cannot be read
    #[instrument(skip(self), level = "debug")]
    pub fn try_get(&self, command: &str, destination: &Destination) -> Result<String> {
        let request = self.build_request(command, destination)?;
        debug!(url = %request.url(), "sending GET");

        let response = self.client.execute(request)?;
        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "node rejected command");
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(ClientError::Body)?;
        debug!(bytes = body.len(), "received response");
        Ok(body)
    }

    /// Send `command` with routing flags and fold any failure into the outcome
    ///
    /// `explicit_destination` wins over `broadcast_to_network`; with neither
    /// the command runs on the local node only.
    pub fn execute_get(
        &self,
        command: &str,
        broadcast_to_network: bool,
        explicit_destination: &str,
        log_on_failure: bool,
    ) -> RequestOutcome {
        let destination = Destination::resolve(broadcast_to_network, explicit_destination);
        self.execute(command, &destination, log_on_failure)
    }

    /// Send `command` to `destination` and fold any failure into the outcome
    ///
    /// When `log_on_failure` is set the diagnostic is written to stderr.
    pub fn execute(
        &self,
        command: &str,
        destination: &Destination,
        log_on_failure: bool,
    ) -> RequestOutcome {
        match self.try_get(command, destination) {
            Ok(body) => RequestOutcome::success(body),
            Err(err) => {
                let diagnostic = err.diagnostic(command);
                warn!(call_type = %err.call_type(), status = err.status_code(), "{diagnostic}");
                if log_on_failure {
                    eprintln!("{diagnostic}");
                }
                RequestOutcome::failure()
            }
        }
    }
}
