//! Status code table and diagnostic formatting
//!
//! Translates an HTTP status code, or a transport error, into the one-line
//! message an operator sees when a request against a node fails.

use std::fmt;

/// Stage of a call a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallType {
    /// Sending the request or receiving the status line
    Get,
    /// Draining the body of a 200 response
    Output,
}

impl CallType {
    /// Label used in diagnostics
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CallType::Get => "GET",
            CallType::Output => "OUTPUT",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse class of a status code, keyed by its hundreds digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 1xx
    Informational,
    /// 2xx
    Successful,
    /// 3xx
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
    /// Anything outside 100..=599
    ///
    /// Kept for compatibility with existing node tooling, which files every
    /// out-of-range code under class "7". It is not a real HTTP class.
    DeveloperError,
}

impl StatusClass {
    /// Classify a status code
    #[must_use]
    pub fn of(code: u16) -> Self {
        match code {
            100..=199 => StatusClass::Informational,
            200..=299 => StatusClass::Successful,
            300..=399 => StatusClass::Redirection,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::DeveloperError,
        }
    }

    /// Class key as used by node tooling
    #[must_use]
    pub fn digit(self) -> u8 {
        match self {
            StatusClass::Informational => 1,
            StatusClass::Successful => 2,
            StatusClass::Redirection => 3,
            StatusClass::ClientError => 4,
            StatusClass::ServerError => 5,
            StatusClass::DeveloperError => 7,
        }
    }

    /// Generic label for the class
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StatusClass::Informational => "Informational",
            StatusClass::Successful => "Successful",
            StatusClass::Redirection => "Redirection",
            StatusClass::ClientError => "Client Error",
            StatusClass::ServerError => "Server Error",
            StatusClass::DeveloperError => "Developer Error",
        }
    }
}

/// Every status code with a known reason phrase, in ascending order
pub const KNOWN_STATUS_CODES: &[u16] = &[
    100, 101, 102, 200, 201, 202, 203, 204, 205, 206, 207, 226, 300, 301, 302, 303, 304, 305,
    307, 308, 400, 401, 402, 403, 404, 405, 406, 407, 408, 409, 410, 411, 412, 413, 414, 415,
    416, 417, 418, 422, 423, 424, 426, 428, 429, 431, 451, 500, 501, 502, 503, 504, 505, 506,
    507, 511,
];

/// Reason phrase for a status code, if the table knows it
#[must_use]
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    let phrase = match code {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        226 => "IM Used",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        414 => "URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a teapot",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Time-out",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        511 => "Network Authentication Required",
        _ => return None,
    };
    Some(phrase)
}

/// Table phrase for `code`, falling back to its class label
#[must_use]
pub fn describe_status(code: u16) -> &'static str {
    reason_phrase(code).unwrap_or_else(|| StatusClass::of(code).label())
}

/// Build the diagnostic for a failed call
///
/// Returns an empty string when `status_code` is 200 and there is no
/// transport error; callers must treat that as "nothing to report".
/// A non-200 code always wins over `transport_error`.
#[must_use]
pub fn format_error(
    call_type: &str,
    command: &str,
    status_code: u16,
    transport_error: Option<&str>,
) -> String {
    if status_code != 200 {
        return format!(
            "Failed to execute {call_type} for {command} (Network Error {status_code} - {})",
            describe_status(status_code)
        );
    }

    match transport_error {
        Some(err) => format!("Failed to execute {call_type} for {command} (Error: {err})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_without_error_is_silent() {
        assert_eq!(format_error("GET", "get status", 200, None), "");
        assert_eq!(format_error("OUTPUT", "", 200, None), "");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            format_error("GET", "get status", 404, None),
            "Failed to execute GET for get status (Network Error 404 - Not Found)"
        );
    }

    #[test]
    fn test_every_known_code_has_its_phrase() {
        for &code in KNOWN_STATUS_CODES {
            let phrase = reason_phrase(code).unwrap();
            if code == 200 {
                continue;
            }
            let msg = format_error("GET", "x", code, None);
            assert!(!msg.is_empty());
            assert!(msg.contains(&code.to_string()), "{msg}");
            assert!(msg.contains(phrase), "{msg}");
        }
    }

    #[test]
    fn test_table_and_code_list_agree() {
        let known = (0..=1000u16).filter(|c| reason_phrase(*c).is_some()).count();
        assert_eq!(known, KNOWN_STATUS_CODES.len());
    }

    #[test]
    fn test_unknown_codes_fall_back_to_class() {
        assert_eq!(
            format_error("GET", "x", 299, None),
            "Failed to execute GET for x (Network Error 299 - Successful)"
        );
        assert!(format_error("GET", "x", 399, None).ends_with("- Redirection)"));
        assert!(format_error("GET", "x", 499, None).ends_with("- Client Error)"));
        assert!(format_error("GET", "x", 599, None).ends_with("- Server Error)"));
        assert!(format_error("GET", "x", 199, None).ends_with("- Informational)"));
    }

    #[test]
    fn test_out_of_range_codes_are_developer_errors() {
        assert_eq!(
            format_error("GET", "x", 999, None),
            "Failed to execute GET for x (Network Error 999 - Developer Error)"
        );
        assert_eq!(StatusClass::of(650).digit(), 7);
        assert_eq!(StatusClass::of(42), StatusClass::DeveloperError);
    }

    #[test]
    fn test_status_wins_over_transport_error() {
        let msg = format_error("GET", "x", 503, Some("connection reset"));
        assert_eq!(
            msg,
            "Failed to execute GET for x (Network Error 503 - Service Unavailable)"
        );
    }

    #[test]
    fn test_transport_error_on_ok_status() {
        assert_eq!(
            format_error("OUTPUT", "get status", 200, Some("unexpected EOF")),
            "Failed to execute OUTPUT for get status (Error: unexpected EOF)"
        );
    }
}
