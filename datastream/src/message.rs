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

//! Inbound commands and outbound records

use crate::codepage::CodePage;
use crate::consts::{aid, command, sfid, wcc};
use crate::order::Order;
use crate::result::ProtocolError;
use byteorder::{BigEndian, ByteOrder};
use std::fmt::{Display, Formatter};
use tn3270_telnetcodec::consts::{EOR, IAC};

/// A 3270 command, accepted in both its channel and SNA encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Write,
    EraseWrite,
    EraseWriteAlternate,
    ReadBuffer,
    ReadModified,
    ReadModifiedAll,
    EraseAllUnprotected,
    WriteStructuredField,
}

impl Command {
    /// Decode a command byte
    pub fn from_u8(byte: u8) -> Option<Command> {
        match byte {
            command::WRITE | command::SNA_WRITE => Some(Command::Write),
            command::ERASE_WRITE | command::SNA_ERASE_WRITE => Some(Command::EraseWrite),
            command::ERASE_WRITE_ALTERNATE | command::SNA_ERASE_WRITE_ALTERNATE => {
                Some(Command::EraseWriteAlternate)
            }
            command::READ_BUFFER | command::SNA_READ_BUFFER => Some(Command::ReadBuffer),
            command::READ_MODIFIED | command::SNA_READ_MODIFIED => Some(Command::ReadModified),
            command::READ_MODIFIED_ALL | command::SNA_READ_MODIFIED_ALL => {
                Some(Command::ReadModifiedAll)
            }
            command::ERASE_ALL_UNPROTECTED | command::SNA_ERASE_ALL_UNPROTECTED => {
                Some(Command::EraseAllUnprotected)
            }
            command::WRITE_STRUCTURED_FIELD | command::SNA_WRITE_STRUCTURED_FIELD => {
                Some(Command::WriteStructuredField)
            }
            _ => None,
        }
    }

    /// SNA encoding, as sent by TN3270 servers
    pub fn to_u8(self) -> u8 {
        match self {
            Command::Write => command::SNA_WRITE,
            Command::EraseWrite => command::SNA_ERASE_WRITE,
            Command::EraseWriteAlternate => command::SNA_ERASE_WRITE_ALTERNATE,
            Command::ReadBuffer => command::SNA_READ_BUFFER,
            Command::ReadModified => command::SNA_READ_MODIFIED,
            Command::ReadModifiedAll => command::SNA_READ_MODIFIED_ALL,
            Command::EraseAllUnprotected => command::SNA_ERASE_ALL_UNPROTECTED,
            Command::WriteStructuredField => command::SNA_WRITE_STRUCTURED_FIELD,
        }
    }

    /// Commands followed by a WCC and an order stream
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Command::Write | Command::EraseWrite | Command::EraseWriteAlternate
        )
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Write Control Character
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteControlCharacter(u8);

impl WriteControlCharacter {
    pub fn new(bits: u8) -> WriteControlCharacter {
        WriteControlCharacter(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn reset(self) -> bool {
        self.0 & wcc::RESET != 0
    }

    pub fn start_printer(self) -> bool {
        self.0 & wcc::START_PRINTER != 0
    }

    pub fn sound_alarm(self) -> bool {
        self.0 & wcc::SOUND_ALARM != 0
    }

    pub fn keyboard_restore(self) -> bool {
        self.0 & wcc::KEYBOARD_RESTORE != 0
    }

    pub fn reset_mdt(self) -> bool {
        self.0 & wcc::RESET_MDT != 0
    }
}

/// Attention identifier: the key that caused inbound data to be sent
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AidKey {
    #[default]
    NoAid,
    Enter,
    Clear,
    /// Program attention key 1 to 3, built with [`AidKey::pa`]
    Pa(KeyNumber),
    /// Program function key 1 to 24, built with [`AidKey::pf`]
    Pf(KeyNumber),
    StructuredField,
    /// Any other AID byte
    Unknown(u8),
}

/// Number of a PA or PF key, only obtainable through [`AidKey::pa`] and [`AidKey::pf`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyNumber(u8);

impl KeyNumber {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Display for KeyNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AidKey {
    /// PF key `number`, if it is between 1 and 24
    pub fn pf(number: u8) -> Option<AidKey> {
        (1..=24)
            .contains(&number)
            .then_some(AidKey::Pf(KeyNumber(number)))
    }

    /// PA key `number`, if it is between 1 and 3
    pub fn pa(number: u8) -> Option<AidKey> {
        (1..=3)
            .contains(&number)
            .then_some(AidKey::Pa(KeyNumber(number)))
    }

    pub fn from_u8(byte: u8) -> AidKey {
        match byte {
            aid::NO_AID => AidKey::NoAid,
            aid::ENTER => AidKey::Enter,
            aid::CLEAR => AidKey::Clear,
            aid::PA1 => AidKey::Pa(KeyNumber(1)),
            aid::PA2 => AidKey::Pa(KeyNumber(2)),
            aid::PA3 => AidKey::Pa(KeyNumber(3)),
            aid::STRUCTURED_FIELD => AidKey::StructuredField,
            other => match aid::PF.iter().position(|code| *code == other) {
                Some(index) => AidKey::Pf(KeyNumber(index as u8 + 1)),
                None => AidKey::Unknown(other),
            },
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            AidKey::NoAid => aid::NO_AID,
            AidKey::Enter => aid::ENTER,
            AidKey::Clear => aid::CLEAR,
            AidKey::Pa(KeyNumber(1)) => aid::PA1,
            AidKey::Pa(KeyNumber(2)) => aid::PA2,
            AidKey::Pa(_) => aid::PA3,
            AidKey::Pf(KeyNumber(number)) => {
                aid::PF[usize::from(number.saturating_sub(1)) % aid::PF.len()]
            }
            AidKey::StructuredField => aid::STRUCTURED_FIELD,
            AidKey::Unknown(byte) => byte,
        }
    }

    /// Keys whose Read Modified reply carries the AID alone
    pub fn is_short_read(self) -> bool {
        matches!(self, AidKey::Clear | AidKey::Pa(_))
    }
}

impl Display for AidKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AidKey::NoAid => write!(f, "NoAID"),
            AidKey::Enter => write!(f, "ENTER"),
            AidKey::Clear => write!(f, "CLEAR"),
            AidKey::Pa(number) => write!(f, "PA{number}"),
            AidKey::Pf(number) => write!(f, "PF{number}"),
            AidKey::StructuredField => write!(f, "SF"),
            AidKey::Unknown(byte) => write!(f, "AID({byte:#04X})"),
        }
    }
}

/// One structured field of a Write Structured Field command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredField {
    /// Structured field identifier
    pub id: u8,
    /// Bytes following the identifier
    pub data: Vec<u8>,
}

impl StructuredField {
    /// Split the body of a WSF command into structured fields.
    ///
    /// Each field starts with a two byte big-endian length covering itself; a length of zero
    /// extends to the end of the message.
    pub fn parse_all(data: &[u8], offset: usize) -> Result<Vec<StructuredField>, ProtocolError> {
        let mut fields = Vec::new();
        let mut position = 0;
        while position < data.len() {
            if position + 2 > data.len() {
                return Err(ProtocolError::Truncated {
                    what: "structured field length",
                    offset: offset + position,
                });
            }
            let declared = usize::from(BigEndian::read_u16(&data[position..position + 2]));
            let length = if declared == 0 {
                data.len() - position
            } else {
                declared
            };
            if length < 3 || position + length > data.len() {
                return Err(ProtocolError::InvalidStructuredField {
                    length: declared,
                    offset: offset + position,
                });
            }
            fields.push(StructuredField {
                id: data[position + 2],
                data: data[position + 3..position + length].to_vec(),
            });
            position += length;
        }
        Ok(fields)
    }

    /// Read Partition Query or Query List
    pub fn is_query(&self) -> bool {
        self.id == sfid::READ_PARTITION
            && matches!(
                self.data.get(1),
                Some(&sfid::RP_QUERY) | Some(&sfid::RP_QUERY_LIST)
            )
    }
}

/// One complete host to terminal message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound3270Message {
    command: Command,
    wcc: Option<WriteControlCharacter>,
    orders: Vec<Order>,
    structured_fields: Vec<StructuredField>,
}

impl Inbound3270Message {
    /// Build a write message directly
    pub fn write(command: Command, wcc: WriteControlCharacter, orders: Vec<Order>) -> Self {
        Inbound3270Message {
            command,
            wcc: Some(wcc),
            orders,
            structured_fields: Vec::new(),
        }
    }

    /// Build a message that carries no data
    pub fn command(command: Command) -> Self {
        Inbound3270Message {
            command,
            wcc: None,
            orders: Vec::new(),
            structured_fields: Vec::new(),
        }
    }

    /// Parse a record received from the host (TN3270E header already removed)
    pub fn parse(bytes: &[u8], code_page: &dyn CodePage) -> Result<Self, ProtocolError> {
        let (&code, rest) = bytes.split_first().ok_or(ProtocolError::EmptyMessage)?;
        let command = Command::from_u8(code).ok_or(ProtocolError::UnknownCommand(code))?;
        let mut message = Inbound3270Message::command(command);
        match command {
            _ if command.is_write() => {
                let (&bits, orders) = rest.split_first().ok_or(ProtocolError::Truncated {
                    what: "WCC",
                    offset: 1,
                })?;
                message.wcc = Some(WriteControlCharacter::new(bits));
                message.orders = Order::parse_all(orders, 2, code_page)?;
            }
            Command::WriteStructuredField => {
                message.structured_fields = StructuredField::parse_all(rest, 1)?;
            }
            _ => {}
        }
        Ok(message)
    }

    pub fn command_code(&self) -> Command {
        self.command
    }

    pub fn wcc(&self) -> Option<WriteControlCharacter> {
        self.wcc
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn structured_fields(&self) -> &[StructuredField] {
        &self.structured_fields
    }
}

/// One complete terminal to host record, before Telnet framing
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outbound3270Message {
    data: Vec<u8>,
}

impl Outbound3270Message {
    pub fn new(data: Vec<u8>) -> Outbound3270Message {
        Outbound3270Message { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The record as sent on a Telnet connection: IAC doubled, terminated by IAC EOR
    pub fn to_wire(&self) -> Vec<u8> {
        let mut wire = Vec::with_capacity(self.data.len() + 2);
        for &byte in &self.data {
            if byte == IAC {
                wire.push(IAC);
            }
            wire.push(byte);
        }
        wire.extend_from_slice(&[IAC, EOR]);
        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codepage::Cp037;

    #[test]
    fn test_command_codes_both_forms() {
        assert_eq!(Command::from_u8(0x01), Some(Command::Write));
        assert_eq!(Command::from_u8(0xF1), Some(Command::Write));
        assert_eq!(Command::from_u8(0x7E), Some(Command::EraseWriteAlternate));
        assert_eq!(Command::from_u8(0x6E), Some(Command::ReadModifiedAll));
        assert_eq!(Command::from_u8(0x11), Some(Command::WriteStructuredField));
        assert_eq!(Command::from_u8(0x42), None);
        assert_eq!(Command::ReadModified.to_u8(), 0xF6);
        assert!(Command::EraseWrite.is_write());
        assert!(!Command::ReadBuffer.is_write());
    }

    #[test]
    fn test_wcc_bits() {
        let wcc = WriteControlCharacter::new(0xC3);
        assert!(wcc.reset());
        assert!(wcc.keyboard_restore());
        assert!(wcc.reset_mdt());
        assert!(!wcc.sound_alarm());
        assert!(!wcc.start_printer());
    }

    #[test]
    fn test_aid_codes() {
        assert_eq!(AidKey::from_u8(0x7D), AidKey::Enter);
        assert_eq!(Some(AidKey::from_u8(0xF3)), AidKey::pf(3));
        assert_eq!(Some(AidKey::from_u8(0x7C)), AidKey::pf(12));
        assert_eq!(Some(AidKey::from_u8(0x4C)), AidKey::pf(24));
        assert_eq!(Some(AidKey::from_u8(0x6B)), AidKey::pa(3));
        assert_eq!(AidKey::from_u8(0x99), AidKey::Unknown(0x99));
        assert_eq!(AidKey::pf(13).map(AidKey::to_u8), Some(0xC1));
        assert_eq!(AidKey::Clear.to_u8(), 0x6D);
        assert!(AidKey::Clear.is_short_read());
        assert!(!AidKey::Enter.is_short_read());
        assert_eq!(AidKey::pf(7).map(|key| key.to_string()).as_deref(), Some("PF7"));
    }

    #[test]
    fn test_key_numbers_outside_range_are_refused() {
        assert_eq!(AidKey::pf(0), None);
        assert_eq!(AidKey::pf(25), None);
        assert_eq!(AidKey::pa(0), None);
        assert_eq!(AidKey::pa(4), None);
        for number in 1..=24 {
            let key = AidKey::pf(number).unwrap();
            assert_eq!(AidKey::from_u8(key.to_u8()), key);
        }
        for number in 1..=3 {
            let key = AidKey::pa(number).unwrap();
            assert_eq!(AidKey::from_u8(key.to_u8()), key);
        }
    }

    #[test]
    fn test_parse_write_message() {
        let message = Inbound3270Message::parse(&[0xF5, 0xC3, 0x11, 0x40, 0x40, 0xC1], &Cp037).unwrap();
        assert_eq!(message.command_code(), Command::EraseWrite);
        assert_eq!(message.wcc(), Some(WriteControlCharacter::new(0xC3)));
        assert_eq!(message.orders().len(), 2);
    }

    #[test]
    fn test_parse_read_commands_have_no_orders() {
        let message = Inbound3270Message::parse(&[0xF6], &Cp037).unwrap();
        assert_eq!(message.command_code(), Command::ReadModified);
        assert!(message.wcc().is_none());
        assert!(message.orders().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Inbound3270Message::parse(&[], &Cp037),
            Err(ProtocolError::EmptyMessage)
        );
        assert_eq!(
            Inbound3270Message::parse(&[0x42], &Cp037),
            Err(ProtocolError::UnknownCommand(0x42))
        );
        assert_eq!(
            Inbound3270Message::parse(&[0xF1], &Cp037),
            Err(ProtocolError::Truncated {
                what: "WCC",
                offset: 1
            })
        );
    }

    #[test]
    fn test_parse_structured_fields() {
        let message =
            Inbound3270Message::parse(&[0xF3, 0x00, 0x05, 0x01, 0xFF, 0x02], &Cp037).unwrap();
        let fields = message.structured_fields();
        assert_eq!(fields.len(), 1);
        assert!(fields[0].is_query());

        assert_eq!(
            Inbound3270Message::parse(&[0xF3, 0x00, 0x09, 0x01, 0xFF], &Cp037),
            Err(ProtocolError::InvalidStructuredField {
                length: 9,
                offset: 1
            })
        );
    }

    #[test]
    fn test_outbound_wire_form() {
        let message = Outbound3270Message::new(vec![0x7D, 0xFF, 0x40]);
        assert_eq!(message.to_wire(), vec![0x7D, 0xFF, 0xFF, 0x40, 0xFF, 0xEF]);
        assert_eq!(message.len(), 3);
    }
}
