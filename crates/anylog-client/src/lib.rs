//! anylog-client: blocking REST client for AnyLog nodes
//!
//! Sends commands to a node's REST endpoint as GET requests and turns failed
//! calls into one-line operator diagnostics.
//!
//! # Example
//!
//! ```no_run
//! use anylog_client::{Destination, Query, QueryFormat, RequestExecutor};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = RequestExecutor::connect("127.0.0.1:32049", "", "", 30)?;
//!
//! // Local node only, diagnostics on stderr
//! let outcome = executor.execute_get("get status", false, "", true);
//! if outcome.succeeded {
//!     println!("{}", outcome.body);
//! }
//!
//! // Broadcast a query to the network
//! let rows = executor.execute_get(
//!     "sql edgex format=table select count(*) from rand_data",
//!     true,
//!     "",
//!     true,
//! );
//! println!("{}", rows.body);
//!
//! // Same query through the builder
//! let query = Query::new("edgex", "select count(*) from rand_data").format(QueryFormat::Table);
//! println!("{}", executor.query(&query, true).body);
//!
//! // Typed errors instead of a flag
//! match executor.try_get("get status", &Destination::Local) {
//!     Ok(body) => println!("{body}"),
//!     Err(err) => eprintln!("{}", err.diagnostic("get status")),
//! }
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod status;

pub use commands::NodeInfo;
pub use config::{ClientConfig, ConnectionConfig, ConnectionRegistry, ConnectionState};
pub use error::{ClientError, Result};
pub use http::{Destination, RequestExecutor, RequestOutcome};
pub use query::{Query, QueryFormat, QueryOutput, Timezone};
pub use status::{CallType, StatusClass, format_error};
