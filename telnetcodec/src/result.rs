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

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while encoding or decoding the Telnet layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Underlying I/O failure
    IOError {
        /// Kind of the originating `std::io::Error`
        kind: std::io::ErrorKind,
        /// Description of the failed operation
        operation: String,
    },
    /// Option negotiation could not be applied
    NegotiationError {
        /// Why negotiation failed
        reason: String,
        /// Debug rendering of the offending frame
        frame_type: Option<String>,
    },
    /// A subnegotiation payload was malformed
    SubnegotiationError {
        /// Option code the payload belonged to
        option: Option<u8>,
        /// What was wrong with it
        reason: SubnegotiationErrorKind,
    },
}

/// Detail of a malformed subnegotiation payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubnegotiationErrorKind {
    /// Payload ended before a required byte
    InsufficientData {
        /// Bytes needed
        required: usize,
        /// Bytes present
        available: usize,
    },
    /// Unexpected verb or command byte
    InvalidCommand {
        /// Byte received
        command: u8,
        /// Bytes that would have been accepted
        expected: Option<Vec<u8>>,
    },
    /// Name field was not printable ASCII
    InvalidName,
}

impl std::error::Error for CodecError {}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::IOError { kind, operation } => {
                write!(f, "I/O error during {operation}: {kind:?}")
            }
            CodecError::NegotiationError { reason, frame_type } => match frame_type {
                Some(ft) => write!(f, "Negotiation error ({ft}): {reason}"),
                None => write!(f, "Negotiation error: {reason}"),
            },
            CodecError::SubnegotiationError { option, reason } => match option {
                Some(opt) => write!(f, "Subnegotiation error for option {opt}: {reason}"),
                None => write!(f, "Subnegotiation error: {reason}"),
            },
        }
    }
}

impl std::fmt::Display for SubnegotiationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubnegotiationErrorKind::InsufficientData {
                required,
                available,
            } => write!(
                f,
                "insufficient data (required: {required}, available: {available})"
            ),
            SubnegotiationErrorKind::InvalidCommand { command, expected } => match expected {
                Some(exp) => write!(f, "invalid command 0x{command:02X} (expected one of: {exp:?})"),
                None => write!(f, "invalid command: 0x{command:02X}"),
            },
            SubnegotiationErrorKind::InvalidName => write!(f, "name is not printable ASCII"),
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IOError {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}
