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

//! Error types for the data stream engine

use thiserror::Error;

/// Result type for data stream operations
pub type DatastreamResult<T> = Result<T, DatastreamError>;

/// A malformed or inconsistent inbound data stream.
///
/// Always fatal to the message being processed; the transport is expected to drop the
/// connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The message carried no command byte
    #[error("empty inbound message")]
    EmptyMessage,

    /// The first byte is not a known 3270 command
    #[error("unknown command code {0:#04X}")]
    UnknownCommand(u8),

    /// An order or command ran past the end of the message
    #[error("truncated {what} at offset {offset}")]
    Truncated {
        /// What was being parsed
        what: &'static str,
        /// Offset of the order code within the message
        offset: usize,
    },

    /// A buffer address byte is outside the 6-bit address alphabet
    #[error("invalid buffer address bytes {0:#04X} {1:#04X}")]
    InvalidAddress(u8, u8),

    /// A buffer address does not fit the screen
    #[error("buffer address {address} outside buffer of {size} positions")]
    AddressOutOfRange {
        /// Decoded address
        address: usize,
        /// Buffer size
        size: usize,
    },

    /// A structured field declared a length that does not fit the message
    #[error("invalid structured field length {length} at offset {offset}")]
    InvalidStructuredField {
        /// Declared length
        length: usize,
        /// Offset of the length bytes within the message
        offset: usize,
    },
}

/// Errors raised by the data stream engine
#[derive(Debug, Error)]
pub enum DatastreamError {
    /// Malformed inbound data stream
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Two field variants that cannot be combined were asked to merge
    #[error("Unsupported operation: cannot {operation} {left} with {right}")]
    UnsupportedOperation {
        /// Operation attempted
        operation: &'static str,
        /// Kind of the first field
        left: &'static str,
        /// Kind of the second field
        right: &'static str,
    },

    /// The field list no longer partitions the buffer
    #[error("Field list invariant violated: {0}")]
    InvariantViolation(String),

    /// An operator action was refused (protected field, numeric field, bad position)
    #[error("Input rejected at position {position}: {reason}")]
    InputRejected {
        /// Buffer position of the refused input
        position: usize,
        /// Why it was refused
        reason: String,
    },
}

impl DatastreamError {
    /// Check if the error came from a malformed data stream
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, DatastreamError::Protocol(_))
    }

    /// Check if the error indicates a defect in the engine rather than bad input
    pub fn is_logic_error(&self) -> bool {
        matches!(
            self,
            DatastreamError::UnsupportedOperation { .. } | DatastreamError::InvariantViolation(_)
        )
    }

    /// Check if the error is a refused operator action
    pub fn is_input_error(&self) -> bool {
        matches!(self, DatastreamError::InputRejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let protocol: DatastreamError = ProtocolError::EmptyMessage.into();
        assert!(protocol.is_protocol_error());
        assert!(!protocol.is_logic_error());

        let merge = DatastreamError::UnsupportedOperation {
            operation: "merge",
            left: "StartOfField",
            right: "Text",
        };
        assert!(merge.is_logic_error());
        assert!(!merge.is_protocol_error());

        let invariant = DatastreamError::InvariantViolation("gap at 4".to_string());
        assert!(invariant.is_logic_error());

        let input = DatastreamError::InputRejected {
            position: 3,
            reason: "protected".to_string(),
        };
        assert!(input.is_input_error());
        assert!(!input.is_logic_error());
    }

    #[test]
    fn test_error_display() {
        let err: DatastreamError = ProtocolError::UnknownCommand(0x42).into();
        assert_eq!(err.to_string(), "Protocol error: unknown command code 0x42");

        let err = ProtocolError::AddressOutOfRange {
            address: 2000,
            size: 1920,
        };
        assert_eq!(
            err.to_string(),
            "buffer address 2000 outside buffer of 1920 positions"
        );

        let err = DatastreamError::UnsupportedOperation {
            operation: "merge",
            left: "StartOfField",
            right: "Chars",
        };
        assert_eq!(
            err.to_string(),
            "Unsupported operation: cannot merge StartOfField with Chars"
        );
    }
}
