//! # Simulator Server
//!
//! The drive executable acts as the server for the simulator. The simulator itself speaks a
//! websocket event protocol, so a relay sits between it and this server and forwards every frame
//! unchanged over a zmq PAIR socket in both directions. One inbound frame produces at most one
//! outbound frame.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
    sim::Outbound
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An abstraction over the networking part of the drive executable.
pub struct SimServer {
    /// PAIR socket bound to the simulator endpoint
    socket: MonitoredSocket,

    /// Connection state last returned by `poll_connection`
    was_connected: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur in the [`SimServer`]
#[derive(thiserror::Error, Debug)]
pub enum SimServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not recieve a frame from the simulator: {0}")]
    RecvError(zmq::Error),

    #[error("Recieved a frame which is not valid UTF-8")]
    NonUtf8Frame,

    #[error("Could not send a frame to the simulator: {0}")]
    SendError(zmq::Error)
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimServer {

    /// Create a new instance of the simulator server.
    ///
    /// This function will not wait for a connection from the relay before returning.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, SimServerError> {
        let socket_options = SocketOptions {
            bind: true,
            block_on_first_connect: false,
            linger: 0,
            recv_timeout: params.recv_timeout_ms,
            send_timeout: 10,
            ..Default::default()
        };

        let socket = MonitoredSocket::new(
            ctx,
            zmq::PAIR,
            socket_options,
            &params.sim_endpoint
        )?;

        Ok(Self {
            socket,
            was_connected: false
        })
    }

    /// Returns true if the relay is connected.
    pub fn is_connected(&self) -> bool {
        self.socket.connected()
    }

    /// Check for a change in the relay's connection state.
    ///
    /// Returns the new state if it has changed since the last call, otherwise
    /// `None`.
    pub fn poll_connection(&mut self) -> Option<bool> {
        let connected = self.is_connected();

        match connected != self.was_connected {
            true => {
                self.was_connected = connected;
                Some(connected)
            },
            false => None
        }
    }

    /// Receive the next frame from the simulator.
    ///
    /// `None` is returned if no frame arrived before the receive timeout.
    pub fn recv_frame(&self) -> Result<Option<String>, SimServerError> {
        match self.socket.recv_string(0) {
            Ok(Ok(s)) => Ok(Some(s)),
            Ok(Err(_)) => Err(SimServerError::NonUtf8Frame),
            Err(zmq::Error::EAGAIN) => Ok(None),
            Err(e) => Err(SimServerError::RecvError(e))
        }
    }

    /// Send a message to the simulator.
    pub fn send(&self, msg: &Outbound) -> Result<(), SimServerError> {
        self.socket.send(&msg.to_frame(), 0)
            .map_err(SimServerError::SendError)
    }
}

impl From<MonitoredSocketError> for SimServerError {
    fn from(e: MonitoredSocketError) -> Self {
        SimServerError::SocketError(e)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
