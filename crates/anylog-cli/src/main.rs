//! anylog CLI
//!
//! Sends commands to an AnyLog node over REST and prints the reply

use std::path::PathBuf;
use std::process::ExitCode;

use anylog_client::commands::status_command;
use anylog_client::{
    ClientConfig, Destination, NodeInfo, Query, QueryFormat, RequestExecutor, Timezone,
};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

mod settings;

use settings::{Overrides, Settings};

/// AnyLog REST client
#[derive(Parser, Debug)]
#[command(name = "anylog", version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Node REST address (ip:port)
    #[arg(short, long, env = "ANYLOG_CONN", global = true)]
    conn: Option<String>,

    /// Basic-auth user; switches to https
    #[arg(short, long, env = "ANYLOG_USER", global = true)]
    user: Option<String>,

    /// Basic-auth password; switches to https
    #[arg(long, env = "ANYLOG_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(short, long, global = true)]
    timeout: Option<u64>,

    /// Config file (defaults to ANYLOG_CONFIG or anylog.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not print diagnostics for failed requests
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a command as a GET request
    Get {
        /// Command to run, e.g. `get status`
        #[arg(required = true, num_args = 1..)]
        command: Vec<String>,

        /// Run the command across the network
        #[arg(short, long)]
        network: bool,

        /// Run the command on specific nodes (ip:port, comma separated)
        #[arg(short, long, default_value = "")]
        destination: String,

        /// Re-indent JSON replies
        #[arg(long)]
        pretty: bool,
    },
    /// Check whether the node is running
    Status {
        /// Ask for JSON output
        #[arg(long)]
        json: bool,

        /// Show the node's help for `get status` instead
        #[arg(long)]
        explain: bool,
    },
    /// Show help text from the node
    Help {
        /// Command to get help for
        topic: Vec<String>,
    },
    /// Read node information
    Info(InfoArgs),
    /// Run a SQL query against a logical database
    Query(QueryArgs),
}

/// Information kinds accepted by `anylog info`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum InfoKind {
    NodeId,
    EventLog,
    ErrorLog,
    Dictionary,
    Hostname,
    Processes,
    License,
    Connections,
    Operator,
    Publisher,
    Streaming,
    Scheduler,
    MqttClient,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// What to read
    #[arg(value_enum)]
    kind: InfoKind,

    /// Scheduler name or MQTT client id
    target: Option<String>,

    /// Ask for JSON output where the node supports it
    #[arg(long)]
    json: bool,

    /// Run the command across the network
    #[arg(short, long)]
    network: bool,

    /// Run the command on specific nodes (ip:port, comma separated)
    #[arg(short, long, default_value = "")]
    destination: String,

    /// Show the node's help for the command instead
    #[arg(long)]
    explain: bool,

    /// Re-indent JSON replies
    #[arg(long)]
    pretty: bool,
}

impl InfoArgs {
    fn node_info(&self) -> NodeInfo {
        match self.kind {
            InfoKind::NodeId => NodeInfo::NodeId,
            InfoKind::EventLog => NodeInfo::EventLog,
            InfoKind::ErrorLog => NodeInfo::ErrorLog,
            InfoKind::Dictionary => NodeInfo::Dictionary,
            InfoKind::Hostname => NodeInfo::Hostname,
            InfoKind::Processes => NodeInfo::Processes,
            InfoKind::License => NodeInfo::License,
            InfoKind::Connections => NodeInfo::Connections,
            InfoKind::Operator => NodeInfo::Operator,
            InfoKind::Publisher => NodeInfo::Publisher,
            InfoKind::Streaming => NodeInfo::Streaming,
            InfoKind::Scheduler => NodeInfo::Scheduler(self.target.clone()),
            InfoKind::MqttClient => NodeInfo::MqttClient(self.target.clone()),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Json,
    Table,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TimezoneArg {
    Local,
    Utc,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Logical database
    dbms: String,

    /// SQL statement
    #[arg(required = true, num_args = 1..)]
    statement: Vec<String>,

    /// Result set format
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    format: FormatArg,

    /// Timezone of time values
    #[arg(long, value_enum, default_value_t = TimezoneArg::Local)]
    timezone: TimezoneArg,

    /// Extra table to treat as part of the queried one (repeatable)
    #[arg(long)]
    include: Vec<String>,

    /// Write the result set to this file on the node
    #[arg(long, conflicts_with = "table")]
    file: Option<String>,

    /// Write the result set to this table on the node
    #[arg(long)]
    table: Option<String>,

    /// Drop the output table first
    #[arg(long, requires = "table")]
    drop: bool,

    /// Query only the node that receives the request
    #[arg(long, conflicts_with = "destination")]
    local: bool,

    /// Query specific nodes (ip:port, comma separated)
    #[arg(short, long)]
    destination: Option<String>,

    /// Re-indent JSON replies
    #[arg(long)]
    pretty: bool,
}

impl QueryArgs {
    fn query(&self) -> Query {
        let mut query = Query::new(&self.dbms, self.statement.join(" "))
            .format(match self.format {
                FormatArg::Json => QueryFormat::Json,
                FormatArg::Table => QueryFormat::Table,
            })
            .timezone(match self.timezone {
                TimezoneArg::Local => Timezone::Local,
                TimezoneArg::Utc => Timezone::Utc,
            });

        for table in &self.include {
            query = query.include(table);
        }
        if let Some(file) = &self.file {
            query = query.into_file(file);
        }
        if let Some(table) = &self.table {
            query = query.into_table(table, self.drop);
        }
        if self.local {
            query = query.local();
        } else if let Some(peers) = &self.destination {
            query = query.on(peers);
        }
        query
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(ClientConfig::default_path);
    let file_config = config_path
        .as_deref()
        .map(ClientConfig::load)
        .transpose()?;

    init_tracing(cli.verbose, cli.quiet, file_config.as_ref());
    if let Some(path) = &config_path {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let settings = Settings::resolve(
        Overrides {
            conn: cli.conn,
            user: cli.user,
            password: cli.password,
            timeout: cli.timeout,
        },
        file_config.as_ref(),
    )?;

    let mut executor = RequestExecutor::new()?;
    executor.configure(
        &settings.conn,
        &settings.user,
        &settings.password,
        settings.timeout,
    );
    tracing::info!(conn = %settings.conn, timeout = settings.timeout, "connection configured");

    let log_on_failure = !cli.quiet;
    let succeeded = match cli.command {
        Commands::Get {
            command,
            network,
            destination,
            pretty,
        } => {
            let command = command.join(" ");
            let outcome = executor.execute_get(&command, network, &destination, log_on_failure);
            if outcome.succeeded {
                println!("{}", render_body(&outcome.body, pretty));
            }
            outcome.succeeded
        }
        Commands::Status { json, explain: true } => {
            let outcome = executor.help(&status_command(json), log_on_failure);
            if outcome.succeeded {
                println!("{}", outcome.body);
            }
            outcome.succeeded
        }
        Commands::Status { json, explain: false } => {
            let running = executor.node_status(json, log_on_failure);
            if running {
                println!("{} is running", settings.conn);
            } else {
                println!("{} is not running", settings.conn);
            }
            running
        }
        Commands::Help { topic } => {
            let outcome = executor.help(&topic.join(" "), log_on_failure);
            if outcome.succeeded {
                println!("{}", outcome.body);
            }
            outcome.succeeded
        }
        Commands::Info(args) => {
            let info = args.node_info();
            let outcome = if args.explain {
                executor.explain(&info, args.json, log_on_failure)
            } else {
                let destination = Destination::resolve(args.network, &args.destination);
                executor.node_info(&info, args.json, &destination, log_on_failure)
            };
            if outcome.succeeded {
                println!("{}", render_body(&outcome.body, args.pretty));
            }
            outcome.succeeded
        }
        Commands::Query(args) => {
            let query = args.query();
            tracing::debug!(command = %query, "running query");
            let outcome = executor.query(&query, log_on_failure);
            if outcome.succeeded {
                println!("{}", render_body(&outcome.body, args.pretty));
            }
            outcome.succeeded
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initialize logging on stderr
///
/// `RUST_LOG` wins; otherwise `-v` flags, then `--quiet`, then the config
/// file level.
fn init_tracing(verbose: u8, quiet: bool, config: Option<&ClientConfig>) {
    let level = match verbose {
        0 if quiet => "error",
        0 => config.map_or("error", |c| c.log_level.as_str()),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Reply text as printed, re-indented when `pretty` and the body is JSON
fn render_body(body: &str, pretty: bool) -> String {
    if !pretty {
        return body.to_string();
    }
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| body.to_string())
}
