use crossbeam_channel::Sender;
use log::{debug, error, info, warn};
use remit_common::command::{read_json_line, write_json_line};
use remit_common::{CompareRequest, CompareResponse, RemitError};
use std::io::BufReader;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

/// How long a client may take to send its request line.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// TCP receiver that accepts comparison requests, one per connection.
///
/// The accept loop only hands accepted streams to a provided channel; reading
/// and validating the request line happens on the worker that owns the stream,
/// so a slow or silent client never holds up the next `accept`.
pub struct RequestReceiver {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
}

impl RequestReceiver {
    /// Bind a new TCP receiver to the provided `bind_addr` (e.g., `0.0.0.0:8080`).
    pub fn new(bind_addr: &str) -> Result<Self, RemitError> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, RemitError> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking loop that accepts TCP connections and forwards each stream to
    /// `tx`. The loop ends when the channel's receiver is gone.
    pub(crate) fn receive_loop_with_channel(self, tx: Sender<TcpStream>) -> Result<(), RemitError> {
        info!("Command TCP server is started on {}", self.socket.local_addr()?);

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client_tcp_addr: {}", peer_name(&stream));
                    tx.send(stream)
                        .map_err(|e| RemitError::ChannelSend(e.to_string()))?;
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

/// Printable peer address for logs.
pub(crate) fn peer_name(stream: &TcpStream) -> String {
    stream
        .peer_addr()
        .map_or_else(|_| "unknown peer".to_string(), |a| a.to_string())
}

/// Read and validate the single request line of a connection.
pub(crate) fn read_request(stream: &TcpStream) -> Result<CompareRequest, RemitError> {
    stream.set_read_timeout(Some(REQUEST_TIMEOUT))?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let request: CompareRequest = read_json_line(&mut reader)?;
    request.validate()?;
    Ok(request)
}

/// Answer a bad request with an error response; failures are only logged.
pub(crate) fn reject(mut stream: TcpStream, reason: &RemitError) {
    warn!("Rejecting request from {}: {}", peer_name(&stream), reason);
    let response = CompareResponse::Error {
        message: reason.to_string(),
    };
    if let Err(e) = write_json_line(&mut stream, &response) {
        error!("Failed to send rejection: {}", e);
    }
}
