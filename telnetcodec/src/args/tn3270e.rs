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

//! TN3270E subnegotiation (RFC 2355)
//!
//! Only the device-type and functions exchanges are modelled; a terminal never originates
//! ASSOCIATE requests.

use crate::consts::{self, tn3270e as code};
use crate::result::{CodecError, CodecResult, SubnegotiationErrorKind};

/// Optional TN3270E functions
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Tn3270eFunction {
    /// BIND-IMAGE
    BindImage,
    /// DATA-STREAM-CTL
    DataStreamCtl,
    /// RESPONSES
    Responses,
    /// SCS-CTL-CODES
    ScsCtlCodes,
    /// SYSREQ
    Sysreq,
    /// Function code this crate does not know
    Unknown(u8),
}

impl Tn3270eFunction {
    /// Wire code
    pub fn to_u8(self) -> u8 {
        match self {
            Tn3270eFunction::BindImage => code::FN_BIND_IMAGE,
            Tn3270eFunction::DataStreamCtl => code::FN_DATA_STREAM_CTL,
            Tn3270eFunction::Responses => code::FN_RESPONSES,
            Tn3270eFunction::ScsCtlCodes => code::FN_SCS_CTL_CODES,
            Tn3270eFunction::Sysreq => code::FN_SYSREQ,
            Tn3270eFunction::Unknown(byte) => byte,
        }
    }

    /// Function for a wire code
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            code::FN_BIND_IMAGE => Tn3270eFunction::BindImage,
            code::FN_DATA_STREAM_CTL => Tn3270eFunction::DataStreamCtl,
            code::FN_RESPONSES => Tn3270eFunction::Responses,
            code::FN_SCS_CTL_CODES => Tn3270eFunction::ScsCtlCodes,
            code::FN_SYSREQ => Tn3270eFunction::Sysreq,
            other => Tn3270eFunction::Unknown(other),
        }
    }
}

/// A TN3270E subnegotiation message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tn3270eMessage {
    /// `SEND DEVICE-TYPE`, server asking the terminal to identify itself
    SendDeviceType,
    /// `DEVICE-TYPE REQUEST <type> [CONNECT <resource>]`
    DeviceTypeRequest {
        /// Requested device type, e.g. `IBM-3278-2-E`
        device_type: String,
        /// LU or pool name to connect to
        connect: Option<String>,
    },
    /// `DEVICE-TYPE IS <type> CONNECT <resource>`
    DeviceTypeIs {
        /// Device type granted by the server
        device_type: String,
        /// LU assigned to the session
        connect: Option<String>,
    },
    /// `DEVICE-TYPE REJECT REASON <code>`
    DeviceTypeReject {
        /// Reason code, see [`reject_reason`]
        reason: u8,
    },
    /// `FUNCTIONS REQUEST <list>`
    FunctionsRequest(Vec<Tn3270eFunction>),
    /// `FUNCTIONS IS <list>`
    FunctionsIs(Vec<Tn3270eFunction>),
}

impl Tn3270eMessage {
    /// Encoded length in bytes
    pub fn len(&self) -> usize {
        match self {
            Tn3270eMessage::SendDeviceType => 2,
            Tn3270eMessage::DeviceTypeRequest {
                device_type,
                connect,
            }
            | Tn3270eMessage::DeviceTypeIs {
                device_type,
                connect,
            } => 2 + device_type.len() + connect.as_ref().map_or(0, |name| 1 + name.len()),
            Tn3270eMessage::DeviceTypeReject { .. } => 4,
            Tn3270eMessage::FunctionsRequest(list) | Tn3270eMessage::FunctionsIs(list) => {
                2 + list.len()
            }
        }
    }

    /// Always false; every message carries at least two bytes
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Write the unescaped payload
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            Tn3270eMessage::SendDeviceType => writer.write_all(&[code::SEND, code::DEVICE_TYPE])?,
            Tn3270eMessage::DeviceTypeRequest {
                device_type,
                connect,
            } => write_device_type(writer, code::REQUEST, device_type, connect.as_deref())?,
            Tn3270eMessage::DeviceTypeIs {
                device_type,
                connect,
            } => write_device_type(writer, code::IS, device_type, connect.as_deref())?,
            Tn3270eMessage::DeviceTypeReject { reason } => {
                writer.write_all(&[code::DEVICE_TYPE, code::REJECT, code::REASON, *reason])?;
            }
            Tn3270eMessage::FunctionsRequest(list) => write_functions(writer, code::REQUEST, list)?,
            Tn3270eMessage::FunctionsIs(list) => write_functions(writer, code::IS, list)?,
        }
        Ok(self.len())
    }

    /// Parse an unescaped payload
    pub fn parse(payload: &[u8]) -> CodecResult<Self> {
        if payload.len() < 2 {
            return Err(error(SubnegotiationErrorKind::InsufficientData {
                required: 2,
                available: payload.len(),
            }));
        }
        match (payload[0], payload[1]) {
            (code::SEND, code::DEVICE_TYPE) => Ok(Tn3270eMessage::SendDeviceType),
            (code::DEVICE_TYPE, code::REQUEST) => {
                let (device_type, connect) = parse_device_type(&payload[2..])?;
                Ok(Tn3270eMessage::DeviceTypeRequest {
                    device_type,
                    connect,
                })
            }
            (code::DEVICE_TYPE, code::IS) => {
                let (device_type, connect) = parse_device_type(&payload[2..])?;
                Ok(Tn3270eMessage::DeviceTypeIs {
                    device_type,
                    connect,
                })
            }
            (code::DEVICE_TYPE, code::REJECT) => match payload.get(2..4) {
                Some(&[code::REASON, reason]) => Ok(Tn3270eMessage::DeviceTypeReject { reason }),
                _ => Err(error(SubnegotiationErrorKind::InsufficientData {
                    required: 4,
                    available: payload.len(),
                })),
            },
            (code::FUNCTIONS, code::REQUEST) => Ok(Tn3270eMessage::FunctionsRequest(
                parse_functions(&payload[2..]),
            )),
            (code::FUNCTIONS, code::IS) => {
                Ok(Tn3270eMessage::FunctionsIs(parse_functions(&payload[2..])))
            }
            (code::SEND | code::DEVICE_TYPE | code::FUNCTIONS, command) => {
                Err(error(SubnegotiationErrorKind::InvalidCommand {
                    command,
                    expected: Some(vec![code::DEVICE_TYPE, code::IS, code::REQUEST, code::REJECT]),
                }))
            }
            (command, _) => Err(error(SubnegotiationErrorKind::InvalidCommand {
                command,
                expected: Some(vec![code::SEND, code::DEVICE_TYPE, code::FUNCTIONS]),
            })),
        }
    }
}

/// Human readable text for a `DEVICE-TYPE REJECT` reason code
pub fn reject_reason(reason: u8) -> &'static str {
    match reason {
        0 => "CONN-PARTNER",
        1 => "DEVICE-IN-USE",
        2 => "INV-ASSOCIATE",
        3 => "INV-NAME",
        4 => "INV-DEVICE-TYPE",
        5 => "TYPE-NAME-ERROR",
        6 => "UNKNOWN-ERROR",
        7 => "UNSUPPORTED-REQ",
        _ => "UNDEFINED",
    }
}

fn write_device_type<W: std::io::Write>(
    writer: &mut W,
    verb: u8,
    device_type: &str,
    connect: Option<&str>,
) -> std::io::Result<()> {
    writer.write_all(&[code::DEVICE_TYPE, verb])?;
    writer.write_all(device_type.as_bytes())?;
    if let Some(name) = connect {
        writer.write_all(&[code::CONNECT])?;
        writer.write_all(name.as_bytes())?;
    }
    Ok(())
}

fn write_functions<W: std::io::Write>(
    writer: &mut W,
    verb: u8,
    list: &[Tn3270eFunction],
) -> std::io::Result<()> {
    writer.write_all(&[code::FUNCTIONS, verb])?;
    for function in list {
        writer.write_all(&[function.to_u8()])?;
    }
    Ok(())
}

fn parse_device_type(body: &[u8]) -> CodecResult<(String, Option<String>)> {
    let (name, connect) = match body.iter().position(|&b| b == code::CONNECT) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (&body[..], None),
    };
    Ok((parse_name(name)?, connect.map(parse_name).transpose()?))
}

fn parse_name(bytes: &[u8]) -> CodecResult<String> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_graphic) {
        return Err(error(SubnegotiationErrorKind::InvalidName));
    }
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn parse_functions(body: &[u8]) -> Vec<Tn3270eFunction> {
    body.iter().copied().map(Tn3270eFunction::from_u8).collect()
}

fn error(reason: SubnegotiationErrorKind) -> CodecError {
    CodecError::SubnegotiationError {
        option: Some(consts::option::TN3270E),
        reason,
    }
}

impl std::fmt::Display for Tn3270eMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tn3270eMessage::SendDeviceType => write!(f, "SEND DEVICE-TYPE"),
            Tn3270eMessage::DeviceTypeRequest {
                device_type,
                connect,
            } => match connect {
                Some(lu) => write!(f, "DEVICE-TYPE REQUEST {device_type} CONNECT {lu}"),
                None => write!(f, "DEVICE-TYPE REQUEST {device_type}"),
            },
            Tn3270eMessage::DeviceTypeIs {
                device_type,
                connect,
            } => match connect {
                Some(lu) => write!(f, "DEVICE-TYPE IS {device_type} CONNECT {lu}"),
                None => write!(f, "DEVICE-TYPE IS {device_type}"),
            },
            Tn3270eMessage::DeviceTypeReject { reason } => {
                write!(f, "DEVICE-TYPE REJECT {}", reject_reason(*reason))
            }
            Tn3270eMessage::FunctionsRequest(list) => write!(f, "FUNCTIONS REQUEST {list:?}"),
            Tn3270eMessage::FunctionsIs(list) => write!(f, "FUNCTIONS IS {list:?}"),
        }
    }
}
