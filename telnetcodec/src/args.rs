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

//! Subnegotiation payloads understood by the codec.

use crate::TelnetOption;
use crate::result::CodecResult;
use bytes::{BufMut, BytesMut};
use std::fmt::Formatter;
use tracing::warn;

pub mod tn3270e;
pub mod ttype;

use self::tn3270e::Tn3270eMessage;
use self::ttype::TerminalTypeMessage;

/// Decoded body of an `IAC SB <option> ... IAC SE` sequence
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetArgument {
    /// TERMINAL-TYPE subnegotiation (RFC 1091)
    TerminalType(TerminalTypeMessage),
    /// TN3270E subnegotiation (RFC 2355)
    Tn3270e(Tn3270eMessage),
    /// Payload for an option without a dedicated parser, or one that failed to parse
    Unknown(TelnetOption, BytesMut),
}

impl TelnetArgument {
    /// Parse an un-escaped payload received for `option`.
    ///
    /// Malformed payloads for known options are logged and returned as [`TelnetArgument::Unknown`]
    /// so a single bad subnegotiation never tears down the stream.
    pub fn parse(option: TelnetOption, payload: BytesMut) -> TelnetArgument {
        let parsed = match option {
            TelnetOption::TerminalType => {
                TerminalTypeMessage::parse(&payload).map(TelnetArgument::TerminalType)
            }
            TelnetOption::TN3270E => Tn3270eMessage::parse(&payload).map(TelnetArgument::Tn3270e),
            _ => return TelnetArgument::Unknown(option, payload),
        };
        match parsed {
            Ok(argument) => argument,
            Err(error) => {
                warn!("Failed to parse {} subnegotiation: {}", option, error);
                TelnetArgument::Unknown(option, payload)
            }
        }
    }

    /// Encoded payload length, before IAC escaping
    pub fn len(&self) -> usize {
        match self {
            TelnetArgument::TerminalType(inner) => inner.len(),
            TelnetArgument::Tn3270e(inner) => inner.len(),
            TelnetArgument::Unknown(_option, inner) => inner.len(),
        }
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the escaped payload to `dst`
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Write the payload, doubling any IAC byte
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        let mut raw = Vec::with_capacity(self.len());
        match self {
            TelnetArgument::TerminalType(inner) => inner.write(&mut raw)?,
            TelnetArgument::Tn3270e(inner) => inner.write(&mut raw)?,
            TelnetArgument::Unknown(_option, payload) => {
                raw.extend_from_slice(payload);
                payload.len()
            }
        };
        let mut written = 0;
        for byte in raw {
            if byte == crate::consts::IAC {
                writer.write_all(&[crate::consts::IAC, crate::consts::IAC])?;
                written += 2;
            } else {
                writer.write_all(&[byte])?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Option this payload belongs to
    pub fn option(&self) -> TelnetOption {
        match self {
            TelnetArgument::TerminalType(_) => TelnetOption::TerminalType,
            TelnetArgument::Tn3270e(_) => TelnetOption::TN3270E,
            TelnetArgument::Unknown(option, _) => *option,
        }
    }
}

impl std::fmt::Display for TelnetArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetArgument::TerminalType(v) => write!(f, "TTYPE {v}"),
            TelnetArgument::Tn3270e(v) => write!(f, "TN3270E {v}"),
            TelnetArgument::Unknown(o, v) => write!(f, "{o}-{v:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dispatches_on_option() {
        let arg = TelnetArgument::parse(TelnetOption::TerminalType, BytesMut::from(&[1u8][..]));
        assert_eq!(arg, TelnetArgument::TerminalType(TerminalTypeMessage::Send));
        assert_eq!(arg.option(), TelnetOption::TerminalType);
    }

    #[test]
    fn malformed_known_payload_falls_back_to_unknown() {
        let arg = TelnetArgument::parse(TelnetOption::TN3270E, BytesMut::from(&[0x55u8][..]));
        assert!(matches!(arg, TelnetArgument::Unknown(TelnetOption::TN3270E, _)));
    }

    #[test]
    fn unknown_payload_escapes_iac() {
        let arg = TelnetArgument::Unknown(TelnetOption::Unknown(99), BytesMut::from(&[1u8, 0xFF][..]));
        let mut out = BytesMut::new();
        let written = arg.encode(&mut out).unwrap();
        assert_eq!(written, 3);
        assert_eq!(&out[..], &[1, 0xFF, 0xFF]);
    }
}
