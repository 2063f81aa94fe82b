//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Client error types

use std::io;
use thiserror::Error;
use tn3270_datastream::DatastreamError;
use tn3270_telnetcodec::CodecError;

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised by a TN3270 terminal session
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error on the transport
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// Connecting took longer than the configured timeout
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// The host closed the connection
    #[error("Connection closed by host")]
    ConnectionClosed,

    /// The host refused the connection
    #[error("Connection refused")]
    ConnectionRefused,

    /// The keyboard stayed locked past the wait timeout
    #[error("Keyboard locked")]
    KeyboardLocked,

    /// No session is active
    #[error("Not connected")]
    NotConnected,

    /// A session is already active
    #[error("Already connected")]
    AlreadyConnected,

    /// Every reconnection attempt failed
    #[error("Reconnection failed after {0} attempts")]
    ReconnectionFailed(usize),

    /// The host rejected or broke Telnet/TN3270E negotiation
    #[error("Negotiation failed: {0}")]
    Negotiation(String),

    /// Telnet layer error
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Malformed data stream or refused operator input
    #[error(transparent)]
    Datastream(#[from] DatastreamError),

    /// An attention key that does not exist
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Waiting for screen text timed out
    #[error("Timed out waiting for {0:?}")]
    TextNotFound(String),
}

impl ClientError {
    /// Check if retrying the operation, or reconnecting, might succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClientError::Io(_)
                | ClientError::ConnectionTimeout
                | ClientError::ConnectionClosed
                | ClientError::ConnectionRefused
                | ClientError::KeyboardLocked
                | ClientError::TextNotFound(_)
        )
    }

    /// Check if the error means the session is gone
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ClientError::Io(_)
                | ClientError::ConnectionTimeout
                | ClientError::ConnectionClosed
                | ClientError::ConnectionRefused
                | ClientError::NotConnected
                | ClientError::ReconnectionFailed(_)
        )
    }
}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::ConnectionRefused => ClientError::ConnectionRefused,
            io::ErrorKind::TimedOut => ClientError::ConnectionTimeout,
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => ClientError::ConnectionClosed,
            _ => ClientError::Io(error),
        }
    }
}
