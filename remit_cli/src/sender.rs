//! Sending comparison requests to a `remit_server` over TCP.
//!
//! One request per connection: the JSON request line goes out, one JSON
//! response line comes back.
use log::info;
use remit_common::command::{read_json_line, write_json_line};
use remit_common::{CompareRequest, CompareResponse, ComparisonReport, RemitError};
use std::io::BufReader;
use std::net::TcpStream;
use std::time::Duration;

/// Read timeout while waiting for the server's answer, in seconds.
const RESPONSE_TIMEOUT_SECS: u64 = 30;

/// Helper type for talking to the server.
pub struct RequestSender;

impl RequestSender {
    pub fn send_request(
        server_addr: &str,
        request: &CompareRequest,
    ) -> Result<ComparisonReport, RemitError> {
        info!("Connecting to TCP server at {}", server_addr);
        let mut stream = TcpStream::connect(server_addr)?;
        stream.set_read_timeout(Some(Duration::from_secs(RESPONSE_TIMEOUT_SECS)))?;

        info!(
            "Sending comparison for {} {} → {}",
            request.send_amount, request.from_currency, request.to_currency
        );
        write_json_line(&mut stream, request)?;

        let mut reader = BufReader::new(stream);
        let response: CompareResponse = read_json_line(&mut reader)?;
        response.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remit_common::{ComparisonEngine, FixedRate};
    use std::io::BufRead;
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(response: CompareResponse) -> (String, thread::JoinHandle<CompareRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let mut stream = stream;
            write_json_line(&mut stream, &response).unwrap();
            serde_json::from_str(line.trim_end()).unwrap()
        });
        (addr, handle)
    }

    #[test]
    fn returns_report_from_server() {
        let engine = ComparisonEngine::new(FixedRate(129.5));
        let request = CompareRequest::new(200.0, "USD").providers(["Wise"]);
        let report = engine.compare(&request).unwrap().report("M-Pesa");
        let (addr, handle) = serve_once(CompareResponse::Ok { report });

        let got = RequestSender::send_request(&addr, &request).unwrap();
        assert_eq!(got.ranked.len(), 1);
        assert_eq!(got.ranked[0].quote.provider, "Wise");
        assert_eq!(handle.join().unwrap(), request);
    }

    #[test]
    fn surfaces_server_errors() {
        let (addr, _handle) = serve_once(CompareResponse::Error {
            message: "Could not get exchange rate for XYZ→KES".to_string(),
        });
        let err = RequestSender::send_request(&addr, &CompareRequest::new(200.0, "XYZ")).unwrap_err();
        assert!(matches!(err, RemitError::Server(ref m) if m.contains("exchange rate")));
    }
}
