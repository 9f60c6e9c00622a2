//! Common node commands built on [`RequestExecutor::execute`]

use crate::http::{Destination, RequestExecutor, RequestOutcome};
use crate::query::Query;

/// `get status`, optionally asking for JSON output
#[must_use]
pub fn status_command(json_format: bool) -> String {
    if json_format {
        "get status where format=json".to_string()
    } else {
        "get status".to_string()
    }
}

/// `help`, or `help <topic>` when a topic is given
#[must_use]
pub fn help_command(topic: &str) -> String {
    let topic = topic.trim();
    if topic.is_empty() {
        "help".to_string()
    } else {
        format!("help {topic}")
    }
}

/// Whether a `get status` reply reports a running node
#[must_use]
pub fn reports_running(body: &str) -> bool {
    body.contains("running") && !body.contains("not")
}

/// Read-only information a node can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeInfo {
    /// `get node id`
    NodeId,
    /// `get event log`
    EventLog,
    /// `get error log`
    ErrorLog,
    /// `get dictionary`
    Dictionary,
    /// `get hostname`
    Hostname,
    /// `get processes`
    Processes,
    /// `get license`
    License,
    /// `get connections`
    Connections,
    /// `get operator`
    Operator,
    /// `get publisher`
    Publisher,
    /// `get streaming`
    Streaming,
    /// `get scheduler [name]`
    Scheduler(Option<String>),
    /// `run mqtt client [id]`
    MqttClient(Option<String>),
}

impl NodeInfo {
    fn base_command(&self) -> String {
        let with_target = |base: &str, target: &Option<String>| match target {
            Some(target) if !target.trim().is_empty() => format!("{base} {}", target.trim()),
            _ => base.to_string(),
        };

        match self {
            NodeInfo::NodeId => "get node id".to_string(),
            NodeInfo::EventLog => "get event log".to_string(),
            NodeInfo::ErrorLog => "get error log".to_string(),
            NodeInfo::Dictionary => "get dictionary".to_string(),
            NodeInfo::Hostname => "get hostname".to_string(),
            NodeInfo::Processes => "get processes".to_string(),
            NodeInfo::License => "get license".to_string(),
            NodeInfo::Connections => "get connections".to_string(),
            NodeInfo::Operator => "get operator".to_string(),
            NodeInfo::Publisher => "get publisher".to_string(),
            NodeInfo::Streaming => "get streaming".to_string(),
            NodeInfo::Scheduler(name) => with_target("get scheduler", name),
            NodeInfo::MqttClient(id) => with_target("run mqtt client", id),
        }
    }

    /// Whether the node can answer in JSON
    #[must_use]
    pub fn supports_json(&self) -> bool {
        matches!(
            self,
            NodeInfo::Dictionary | NodeInfo::Processes | NodeInfo::Connections | NodeInfo::Streaming
        )
    }

    /// Command string; `json_format` is ignored where JSON is not supported
    #[must_use]
    pub fn command(&self, json_format: bool) -> String {
        let base = self.base_command();
        if json_format && self.supports_json() {
            format!("{base} where format=json")
        } else {
            base
        }
    }
}

impl RequestExecutor {
    /// Check whether the node is running
    ///
    /// Sends `get status` to the local node and inspects the reply.
    pub fn node_status(&self, json_format: bool, log_on_failure: bool) -> bool {
        let outcome = self.execute(
            &status_command(json_format),
            &Destination::Local,
            log_on_failure,
        );
        outcome.succeeded && reports_running(&outcome.body)
    }

    /// Fetch help text from the node
    pub fn help(&self, topic: &str, log_on_failure: bool) -> RequestOutcome {
        self.execute(&help_command(topic), &Destination::Local, log_on_failure)
    }

    /// Fetch node information
    pub fn node_info(
        &self,
        info: &NodeInfo,
        json_format: bool,
        destination: &Destination,
        log_on_failure: bool,
    ) -> RequestOutcome {
        self.execute(&info.command(json_format), destination, log_on_failure)
    }

    /// Fetch the node's help text for an information command
    pub fn explain(
        &self,
        info: &NodeInfo,
        json_format: bool,
        log_on_failure: bool,
    ) -> RequestOutcome {
        self.help(&info.command(json_format), log_on_failure)
    }

    /// Run a `sql` query
    pub fn query(&self, query: &Query, log_on_failure: bool) -> RequestOutcome {
        self.execute(&query.build(), query.destination(), log_on_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_commands() {
        assert_eq!(status_command(false), "get status");
        assert_eq!(status_command(true), "get status where format=json");
    }

    #[test]
    fn test_help_commands() {
        assert_eq!(help_command(""), "help");
        assert_eq!(help_command("  "), "help");
        assert_eq!(help_command("get status"), "help get status");
    }

    #[test]
    fn test_running_detection() {
        assert!(reports_running("'anylog@10.0.0.1:32048' running"));
        assert!(reports_running(r#"{"Status": "anylog@10.0.0.1:32048 running"}"#));
        assert!(!reports_running("'anylog@10.0.0.1:32048' not running"));
        assert!(!reports_running(""));
    }

    #[test]
    fn test_info_commands() {
        assert_eq!(NodeInfo::NodeId.command(false), "get node id");
        assert_eq!(NodeInfo::EventLog.command(false), "get event log");
        assert_eq!(NodeInfo::ErrorLog.command(false), "get error log");
        assert_eq!(NodeInfo::Hostname.command(false), "get hostname");
        assert_eq!(NodeInfo::License.command(false), "get license");
        assert_eq!(NodeInfo::Operator.command(false), "get operator");
        assert_eq!(NodeInfo::Publisher.command(false), "get publisher");
    }

    #[test]
    fn test_json_variants() {
        assert_eq!(
            NodeInfo::Dictionary.command(true),
            "get dictionary where format=json"
        );
        assert_eq!(
            NodeInfo::Processes.command(true),
            "get processes where format=json"
        );
        assert_eq!(
            NodeInfo::Connections.command(true),
            "get connections where format=json"
        );
        assert_eq!(
            NodeInfo::Streaming.command(true),
            "get streaming where format=json"
        );
        assert_eq!(NodeInfo::Hostname.command(true), "get hostname");
    }

    #[test]
    fn test_targeted_commands() {
        assert_eq!(NodeInfo::Scheduler(None).command(false), "get scheduler");
        assert_eq!(
            NodeInfo::Scheduler(Some("1".to_string())).command(false),
            "get scheduler 1"
        );
        assert_eq!(
            NodeInfo::MqttClient(Some(" 3 ".to_string())).command(true),
            "run mqtt client 3"
        );
        assert_eq!(
            NodeInfo::MqttClient(Some(String::new())).command(false),
            "run mqtt client"
        );
    }
}
