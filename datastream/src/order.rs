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

//! Orders embedded in a write data stream

use crate::address::BufferAddress;
use crate::attribute::FieldAttribute;
use crate::codepage::CodePage;
use crate::consts::order;
use crate::result::ProtocolError;
use std::fmt::{Display, Formatter};
use tracing::trace;

/// One order of a Write, Erase/Write or Erase/Write Alternate command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    /// SBA: move the write position
    SetBufferAddress(BufferAddress),
    /// SF or SFE: place a field marker at the write position
    StartField(FieldAttribute),
    /// A run of graphic characters, including any graphic-escaped bytes
    Text(String),
    /// EUA: null unprotected content up to the address
    EraseUnprotectedToAddress(BufferAddress),
    /// RA: repeat a character up to the address
    RepeatToAddress(BufferAddress, char),
    /// IC: place the displayed cursor at the write position
    InsertCursor,
    /// PT: advance to the next unprotected field
    ProgramTab,
    /// MF: change the attribute at the write position
    ModifyField(Vec<(u8, u8)>),
    /// SA: character attribute (accepted and ignored)
    SetAttribute(u8, u8),
    /// GE: one literal character outside the base graphic set
    GraphicsEscape(char),
}

impl Order {
    /// Parse the order stream that follows a WCC.
    ///
    /// Bytes that are not order codes accumulate into a [`Order::Text`]; a GE byte pair is folded
    /// into the same run. `offset` is the position of `data` within the whole message, used only
    /// for error reporting.
    pub fn parse_all(
        data: &[u8],
        offset: usize,
        code_page: &dyn CodePage,
    ) -> Result<Vec<Order>, ProtocolError> {
        let mut reader = OrderReader {
            data,
            position: 0,
            current: 0,
            offset,
        };
        let mut orders = Vec::new();
        let mut text = String::new();

        while let Some(byte) = reader.next_byte() {
            let parsed = match byte {
                order::GE => {
                    let literal = reader.take(1, "GE")?[0];
                    text.push(code_page.to_char(literal));
                    continue;
                }
                order::SBA => Order::SetBufferAddress(reader.address("SBA")?),
                order::SF => Order::StartField(FieldAttribute::from_byte(reader.take(1, "SF")?[0])),
                order::SFE => {
                    let mut attribute = FieldAttribute::default();
                    for (kind, value) in reader.pairs("SFE")? {
                        if !attribute.apply_extended(kind, value) {
                            trace!("SFE ignores attribute type {:#04X}", kind);
                        }
                    }
                    Order::StartField(attribute)
                }
                order::SA => {
                    let pair = reader.take(2, "SA")?;
                    Order::SetAttribute(pair[0], pair[1])
                }
                order::MF => Order::ModifyField(reader.pairs("MF")?),
                order::IC => Order::InsertCursor,
                order::PT => Order::ProgramTab,
                order::RA => {
                    let address = reader.address("RA")?;
                    let mut character = reader.take(1, "RA")?[0];
                    if character == order::GE {
                        character = reader.take(1, "RA")?[0];
                    }
                    Order::RepeatToAddress(address, code_page.to_char(character))
                }
                order::EUA => Order::EraseUnprotectedToAddress(reader.address("EUA")?),
                graphic => {
                    text.push(code_page.to_char(graphic));
                    continue;
                }
            };
            if !text.is_empty() {
                orders.push(Order::Text(std::mem::take(&mut text)));
            }
            trace!("parsed order {}", parsed);
            orders.push(parsed);
        }
        if !text.is_empty() {
            orders.push(Order::Text(text));
        }
        Ok(orders)
    }
}

/// Cursor over an order stream
struct OrderReader<'a> {
    data: &'a [u8],
    position: usize,
    current: usize,
    offset: usize,
}

impl<'a> OrderReader<'a> {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.data.get(self.position).copied();
        self.current = self.position;
        self.position += 1;
        byte
    }

    fn take(&mut self, count: usize, what: &'static str) -> Result<&'a [u8], ProtocolError> {
        let end = self.position + count;
        if end > self.data.len() {
            return Err(ProtocolError::Truncated {
                what,
                offset: self.offset + self.current,
            });
        }
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    fn address(&mut self, what: &'static str) -> Result<BufferAddress, ProtocolError> {
        let bytes = self.take(2, what)?;
        BufferAddress::decode([bytes[0], bytes[1]])
    }

    fn pairs(&mut self, what: &'static str) -> Result<Vec<(u8, u8)>, ProtocolError> {
        let count = usize::from(self.take(1, what)?[0]);
        let bytes = self.take(count * 2, what)?;
        Ok(bytes.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::SetBufferAddress(address) => write!(f, "SBA({address})"),
            Order::StartField(attribute) => write!(f, "SF({attribute})"),
            Order::Text(text) => write!(f, "Text({text:?})"),
            Order::EraseUnprotectedToAddress(address) => write!(f, "EUA({address})"),
            Order::RepeatToAddress(address, character) => write!(f, "RA({address}, {character:?})"),
            Order::InsertCursor => write!(f, "IC"),
            Order::ProgramTab => write!(f, "PT"),
            Order::ModifyField(pairs) => write!(f, "MF({} pairs)", pairs.len()),
            Order::SetAttribute(kind, value) => write!(f, "SA({kind:#04X}, {value:#04X})"),
            Order::GraphicsEscape(character) => write!(f, "GE({character:?})"),
        }
    }
}
