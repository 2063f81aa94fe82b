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

//! TERMINAL-TYPE subnegotiation (RFC 1091)

use crate::consts;
use crate::result::{CodecError, CodecResult, SubnegotiationErrorKind};

/// A TERMINAL-TYPE subnegotiation message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerminalTypeMessage {
    /// Server asks for the terminal type
    Send,
    /// Client reports its terminal type, e.g. `IBM-3278-2-E`
    Is(String),
}

impl TerminalTypeMessage {
    /// Encoded length in bytes
    pub fn len(&self) -> usize {
        match self {
            TerminalTypeMessage::Send => 1,
            TerminalTypeMessage::Is(name) => 1 + name.len(),
        }
    }

    /// Always false; every message carries at least its verb
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Write the unescaped payload
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            TerminalTypeMessage::Send => {
                writer.write_all(&[consts::ttype::SEND])?;
            }
            TerminalTypeMessage::Is(name) => {
                writer.write_all(&[consts::ttype::IS])?;
                writer.write_all(name.as_bytes())?;
            }
        }
        Ok(self.len())
    }

    /// Parse an unescaped payload
    pub fn parse(payload: &[u8]) -> CodecResult<Self> {
        let Some((&verb, rest)) = payload.split_first() else {
            return Err(error(SubnegotiationErrorKind::InsufficientData {
                required: 1,
                available: 0,
            }));
        };
        match verb {
            consts::ttype::SEND => Ok(TerminalTypeMessage::Send),
            consts::ttype::IS => {
                if !rest.iter().all(u8::is_ascii_graphic) {
                    return Err(error(SubnegotiationErrorKind::InvalidName));
                }
                Ok(TerminalTypeMessage::Is(String::from_utf8_lossy(rest).into_owned()))
            }
            command => Err(error(SubnegotiationErrorKind::InvalidCommand {
                command,
                expected: Some(vec![consts::ttype::IS, consts::ttype::SEND]),
            })),
        }
    }
}

fn error(reason: SubnegotiationErrorKind) -> CodecError {
    CodecError::SubnegotiationError {
        option: Some(consts::option::TTYPE),
        reason,
    }
}

impl std::fmt::Display for TerminalTypeMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalTypeMessage::Send => write!(f, "SEND"),
            TerminalTypeMessage::Is(name) => write!(f, "IS {name}"),
        }
    }
}
