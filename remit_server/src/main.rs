//! RemitLens comparison server.
//!
//! A headless front for the comparison engine: clients connect over TCP, send one
//! JSON `CompareRequest` line and get one JSON `CompareResponse` line back.
//! Internally it wires together two building blocks:
//!
//! - `RequestReceiver` accepts connections and hands each stream to the main
//!   loop over a `crossbeam_channel`. It never reads from a client itself.
//! - Per-connection task: a lightweight thread per accepted stream that reads
//!   and validates the request line, runs the comparison against the shared
//!   `ComparisonEngine` and writes the answer. Malformed requests are answered
//!   with an error on that connection only.
//!
//! Concurrency and shutdown:
//! - The engine is shared through an `Arc`; its rate source and provider catalog
//!   are read-only, so requests run in parallel without locks.
//! - Crossbeam `select!` multiplexes incoming connections and the Ctrl+C
//!   shutdown signal.
//!
//! Usage example:
//! ```bash
//! remit_server --bind 0.0.0.0:8080
//! remit_server --offline
//! ```
#![warn(missing_docs)]
use crate::args::Args;
use crate::receiver::{RequestReceiver, peer_name, read_request, reject};
use clap::Parser;
use crossbeam_channel::{Receiver, bounded, select, unbounded};
use log::{error, info, warn};
use remit_common::command::write_json_line;
use remit_common::{CompareRequest, CompareResponse, ComparisonEngine, RemitError, Result};
use std::io;
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;

mod args;
mod receiver;

/// Run one comparison and write the response to the client's `stream`.
///
/// A rate-unavailable failure is a normal answer for the client, not an error of
/// the server; only a failed write is returned as `Err`.
pub fn handle_request(
    engine: &ComparisonEngine,
    request: &CompareRequest,
    mut stream: TcpStream,
) -> Result<(), RemitError> {
    let result = engine
        .compare(request)
        .map(|comparison| comparison.report(&request.channel));
    if let Err(e) = &result {
        warn!("Comparison failed: {}", e);
    }
    write_json_line(&mut stream, &CompareResponse::from_result(result))
}

/// Serve one accepted connection: read its request, then answer it.
pub fn handle_connection(
    engine: &ComparisonEngine,
    stream: TcpStream,
) -> Result<(), RemitError> {
    match read_request(&stream) {
        Ok(request) => {
            info!("Received request {:?} from {}", request, peer_name(&stream));
            handle_request(engine, &request, stream)
        }
        Err(e) => {
            reject(stream, &e);
            Ok(())
        }
    }
}

/// Main loop: spawn a task per accepted connection until shutdown is signalled.
pub fn serve(
    engine: Arc<ComparisonEngine>,
    conn_rx: Receiver<TcpStream>,
    shutdown_rx: Receiver<()>,
) -> Result<(), RemitError> {
    loop {
        select! {
            recv(conn_rx) -> msg => match msg {
                Ok(stream) => {
                    let engine = Arc::clone(&engine);
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(&engine, stream) {
                            error!("Client response error: {:?}", e);
                        }
                    });
                }
                Err(e) => return Err(RemitError::ChannelRecv(e.to_string())),
            },
            recv(shutdown_rx) -> _ => {
                info!("Shutdown requested; no longer accepting requests");
                return Ok(());
            }
        }
    }
}

fn main() -> Result<(), RemitError> {
    init_logger();
    let args = Args::parse();
    let engine = Arc::new(ComparisonEngine::from_boxed(args.rates.build_source()?));

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down server...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| RemitError::Io(io::Error::other(e.to_string())))?;

    let receiver = RequestReceiver::new(&args.bind)?;
    info!("Comparison server listening on: {}", receiver.local_addr()?);

    let (conn_tx, conn_rx) = unbounded::<TcpStream>();
    thread::spawn(move || {
        if let Err(e) = receiver.receive_loop_with_channel(conn_tx) {
            error!("Receiver loop failed: {:?}", e);
        }
    });

    serve(engine, conn_rx, shutdown_rx)
}

fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use remit_common::command::read_json_line;
    use remit_common::{FallbackRates, FixedRate, RateSource};
    use std::io::{BufReader, Write};
    use std::net::SocketAddr;
    use std::time::{Duration, Instant};

    /// Start receiver + main loop on a loopback port.
    fn start_server(rates: impl RateSource + 'static) -> (SocketAddr, crossbeam_channel::Sender<()>) {
        let receiver = RequestReceiver::new("127.0.0.1:0").unwrap();
        let addr = receiver.local_addr().unwrap();
        let engine = Arc::new(ComparisonEngine::new(rates));
        let (conn_tx, conn_rx) = unbounded();
        let (shutdown_tx, shutdown_rx) = bounded(1);
        thread::spawn(move || receiver.receive_loop_with_channel(conn_tx));
        thread::spawn(move || serve(engine, conn_rx, shutdown_rx));
        (addr, shutdown_tx)
    }

    fn exchange(addr: SocketAddr, line: &[u8]) -> CompareResponse {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(line).unwrap();
        let mut reader = BufReader::new(stream);
        read_json_line(&mut reader).unwrap()
    }

    fn request_line(request: &CompareRequest) -> Vec<u8> {
        let mut line = Vec::new();
        write_json_line(&mut line, request).unwrap();
        line
    }

    #[test]
    fn answers_a_comparison() {
        let (addr, _shutdown) = start_server(FixedRate(129.5));
        let request = CompareRequest::new(200.0, "USD");
        let report = exchange(addr, &request_line(&request)).into_result().unwrap();
        assert_eq!(report.ranked.len(), 7);
        assert_eq!(report.ranked[0].quote.provider, "Wise");
        assert_eq!(report.best_for_channel.unwrap().provider, "Wise");
    }

    #[test]
    fn unknown_pair_is_reported_not_fatal() {
        let (addr, _shutdown) = start_server(FallbackRates);
        let response = exchange(addr, &request_line(&CompareRequest::new(200.0, "XYZ")));
        match response {
            CompareResponse::Error { message } => assert!(message.contains("exchange rate")),
            other => panic!("unexpected {:?}", other),
        }

        // The server keeps serving afterwards.
        let report = exchange(addr, &request_line(&CompareRequest::new(200.0, "GBP")))
            .into_result()
            .unwrap();
        assert!((report.mid_market_rate - 164.20).abs() < 1e-9);
    }

    #[test]
    fn malformed_requests_are_rejected_per_connection() {
        let (addr, _shutdown) = start_server(FixedRate(129.5));
        let response = exchange(addr, b"{not json}\n");
        assert!(matches!(response, CompareResponse::Error { .. }));

        let response = exchange(addr, b"{\"send_amount\":-5,\"from_currency\":\"USD\"}\n");
        match response {
            CompareResponse::Error { message } => assert!(message.contains("positive")),
            other => panic!("unexpected {:?}", other),
        }

        let request = CompareRequest::new(200.0, "USD").providers(["Sendwave"]);
        let report = exchange(addr, &request_line(&request)).into_result().unwrap();
        assert_eq!(report.ranked.len(), 1);
        assert_eq!(report.ranked[0].quote.fee, 0.0);
    }

    #[test]
    fn serve_stops_on_shutdown() {
        let engine = Arc::new(ComparisonEngine::new(FixedRate(129.5)));
        let (_conn_tx, conn_rx) = unbounded::<TcpStream>();
        let (shutdown_tx, shutdown_rx) = bounded(1);
        shutdown_tx.send(()).unwrap();
        assert!(serve(engine, conn_rx, shutdown_rx).is_ok());
    }

    #[test]
    fn silent_client_does_not_hold_up_others() {
        let (addr, _shutdown) = start_server(FixedRate(129.5));
        let _idle = TcpStream::connect(addr).unwrap();

        let started = Instant::now();
        let report = exchange(addr, &request_line(&CompareRequest::new(200.0, "USD")))
            .into_result()
            .unwrap();
        assert_eq!(report.ranked.len(), 7);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
