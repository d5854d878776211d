//! Wire payloads exchanged between `remit_cli` and `remit_server`.
//!
//! The protocol is one JSON document per line over TCP: the client writes a
//! [`CompareRequest`](crate::engine::CompareRequest), the server answers with a
//! [`CompareResponse`] and closes the connection.
use std::io::{BufRead, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::comparison::ComparisonReport;
use crate::error::RemitError;
use crate::result::Result;

/// Server answer to one comparison request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CompareResponse {
    /// The comparison succeeded.
    Ok {
        /// Every view of the comparison.
        report: ComparisonReport,
    },
    /// The request was rejected or no rate was available.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl CompareResponse {
    /// Wrap the outcome of a comparison.
    pub fn from_result(result: Result<ComparisonReport>) -> Self {
        match result {
            Ok(report) => CompareResponse::Ok { report },
            Err(e) => CompareResponse::Error {
                message: e.to_string(),
            },
        }
    }

    /// Unwrap into a report, turning a remote error into [`RemitError::Server`].
    pub fn into_result(self) -> Result<ComparisonReport> {
        match self {
            CompareResponse::Ok { report } => Ok(report),
            CompareResponse::Error { message } => Err(RemitError::Server(message)),
        }
    }
}

/// Write `value` as one JSON line and flush.
pub fn write_json_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}

/// Read one JSON line. An empty stream is a format error.
pub fn read_json_line<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> Result<T> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(RemitError::InvalidRequest(
            "connection closed before a message arrived".to_string(),
        ));
    }
    Ok(serde_json::from_str(line.trim_end())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::Comparison;
    use crate::engine::CompareRequest;
    use std::io::{BufReader, Cursor};

    #[test]
    fn request_line_round_trip() {
        let request = CompareRequest::new(250.0, "EUR").providers(["Wise"]);
        let mut buf = Vec::new();
        write_json_line(&mut buf, &request).unwrap();
        assert_eq!(buf.last(), Some(&b'\n'));

        let mut reader = BufReader::new(Cursor::new(buf));
        let back: CompareRequest = read_json_line(&mut reader).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn error_response_becomes_server_error() {
        let response = CompareResponse::from_result(Err(RemitError::rate_unavailable("XYZ", "KES")));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"error\""));

        let back: CompareResponse = serde_json::from_str(&json).unwrap();
        match back.into_result() {
            Err(RemitError::Server(message)) => assert!(message.contains("XYZ→KES")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ok_response_is_tagged() {
        let report = Comparison::new("USD", "KES", 200.0, 129.5, Vec::new()).report("M-Pesa");
        let json = serde_json::to_string(&CompareResponse::Ok { report }).unwrap();
        assert!(json.starts_with("{\"status\":\"ok\""));
        let back: CompareResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_result().unwrap().send_currency, "USD");
    }

    #[test]
    fn empty_stream_is_rejected() {
        let mut reader = BufReader::new(Cursor::new(Vec::new()));
        let result: Result<CompareRequest> = read_json_line(&mut reader);
        assert!(matches!(result, Err(RemitError::InvalidRequest(_))));
    }
}
