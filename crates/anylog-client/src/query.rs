//! `sql` command builder for AnyLog queries

use std::fmt;

use crate::http::Destination;

/// Result set format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFormat {
    Json,
    Table,
}

impl QueryFormat {
    fn as_str(self) -> &'static str {
        match self {
            QueryFormat::Json => "json",
            QueryFormat::Table => "table",
        }
    }
}

/// Timezone applied to time values in the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timezone {
    Local,
    Utc,
}

impl Timezone {
    fn as_str(self) -> &'static str {
        match self {
            Timezone::Local => "local",
            Timezone::Utc => "utc",
        }
    }
}

/// Where the node writes the result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutput {
    /// Returned in the reply
    Stdout,
    /// Written to a file on the node
    File(String),
    /// Written to a table on the node, optionally dropping it first
    Table { name: String, drop: bool },
}

/// `sql` command builder
///
/// Defaults to JSON output in local time, broadcast to the network.
#[derive(Debug, Clone)]
pub struct Query {
    dbms: String,
    statement: String,
    format: QueryFormat,
    timezone: Timezone,
    include: Vec<String>,
    output: QueryOutput,
    destination: Destination,
}

impl Query {
    /// Create a query of `statement` against logical database `dbms`
    pub fn new(dbms: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            dbms: dbms.into(),
            statement: statement.into(),
            format: QueryFormat::Json,
            timezone: Timezone::Local,
            include: Vec::new(),
            output: QueryOutput::Stdout,
            destination: Destination::Network,
        }
    }

    /// Set the result set format
    #[must_use]
    pub fn format(mut self, format: QueryFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the timezone of time values
    #[must_use]
    pub fn timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Treat another table as part of the queried one (repeatable)
    #[must_use]
    pub fn include(mut self, table: impl Into<String>) -> Self {
        self.include.push(table.into());
        self
    }

    /// Write the result set to a file on the node
    #[must_use]
    pub fn into_file(mut self, path: impl Into<String>) -> Self {
        self.output = QueryOutput::File(path.into());
        self
    }

    /// Write the result set to a table on the node
    #[must_use]
    pub fn into_table(mut self, name: impl Into<String>, drop: bool) -> Self {
        self.output = QueryOutput::Table {
            name: name.into(),
            drop,
        };
        self
    }

    /// Query only the node that receives the request
    #[must_use]
    pub fn local(mut self) -> Self {
        self.destination = Destination::Local;
        self
    }

    /// Query specific peers (`ip:port`, comma separated)
    #[must_use]
    pub fn on(mut self, peers: impl Into<String>) -> Self {
        self.destination = Destination::Node(peers.into());
        self
    }

    /// Routing for the request
    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Build the command string
    #[must_use]
    pub fn build(&self) -> String {
        let mut options = vec![
            format!("format={}", self.format.as_str()),
            format!("timezone={}", self.timezone.as_str()),
        ];

        if !self.include.is_empty() {
            options.push(format!("include=({})", self.include.join(",")));
            options.push("extend=(@table_name as table)".to_string());
        }

        match &self.output {
            QueryOutput::Stdout => {}
            QueryOutput::File(path) => {
                options.push("dest=file".to_string());
                options.push(format!("file={path}"));
            }
            QueryOutput::Table { name, drop } => {
                options.push("dest=dbms".to_string());
                options.push(format!("table={name}"));
                options.push(format!("drop={drop}"));
            }
        }

        format!(
            "sql {} {} \"{}\"",
            self.dbms,
            options.join(" and "),
            self.statement
        )
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let query = Query::new("edgex", "select count(*) from rand_data");
        assert_eq!(
            query.build(),
            "sql edgex format=json and timezone=local \"select count(*) from rand_data\""
        );
        assert_eq!(query.destination(), &Destination::Network);
    }

    #[test]
    fn test_table_format_utc_local() {
        let query = Query::new("edgex", "select * from rand_data limit 5")
            .format(QueryFormat::Table)
            .timezone(Timezone::Utc)
            .local();

        assert_eq!(
            query.to_string(),
            "sql edgex format=table and timezone=utc \"select * from rand_data limit 5\""
        );
        assert_eq!(query.destination(), &Destination::Local);
    }

    #[test]
    fn test_include_tables() {
        let query = Query::new("edgex", "select * from rand_data")
            .include("ping_sensor")
            .include("percentagecpu_sensor");

        assert!(query.build().contains(
            "and include=(ping_sensor,percentagecpu_sensor) and extend=(@table_name as table) \""
        ));
    }

    #[test]
    fn test_output_to_file_and_table() {
        let file = Query::new("edgex", "select 1").into_file("/tmp/out.json");
        assert!(file.build().contains("and dest=file and file=/tmp/out.json \""));

        let table = Query::new("edgex", "select 1").into_table("query_out", true);
        assert!(
            table
                .build()
                .contains("and dest=dbms and table=query_out and drop=true \"")
        );
    }

    #[test]
    fn test_specific_peers() {
        let query = Query::new("edgex", "select 1").on("10.0.0.2:32048,10.0.0.3:32048");
        assert_eq!(
            query.destination().header_value(),
            Some("10.0.0.2:32048,10.0.0.3:32048")
        );
    }
}
