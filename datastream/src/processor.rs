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

//! Applies an order stream to the field list

use crate::address::BufferAddress;
use crate::fields::FieldList;
use crate::message::WriteControlCharacter;
use crate::order::Order;
use crate::result::DatastreamResult;
use tracing::{debug, trace, warn};

/// What a write left behind for the screen to act on
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Write position after the last order
    pub buffer_address: usize,
    /// Position set by the last IC order, if any
    pub cursor: Option<usize>,
    /// The WCC asked for the keyboard to be unlocked
    pub restore_keyboard: bool,
    /// The WCC asked for the alarm
    pub sound_alarm: bool,
    /// The WCC asked for a print
    pub start_printer: bool,
}

/// Stateful interpreter of one write command's orders.
///
/// Orders are applied strictly in sequence; each one may split, shrink or merge fields, so the
/// result depends on order.
pub struct OrderProcessor<'a> {
    fields: &'a mut FieldList,
    buffer_address: usize,
    cursor: Option<usize>,
}

impl<'a> OrderProcessor<'a> {
    /// Start processing at `buffer_address`
    pub fn new(fields: &'a mut FieldList, buffer_address: usize) -> OrderProcessor<'a> {
        let buffer_address = buffer_address % fields.size();
        OrderProcessor {
            fields,
            buffer_address,
            cursor: None,
        }
    }

    /// Apply `orders` under control of `wcc`.
    ///
    /// A reset-MDT WCC clears every modified data tag before the first order runs. The field
    /// list is validated once all orders have been applied.
    pub fn process_orders(
        mut self,
        orders: &[Order],
        wcc: WriteControlCharacter,
    ) -> DatastreamResult<WriteOutcome> {
        if wcc.reset_mdt() {
            self.fields.reset_modified();
        }
        for order in orders {
            trace!("order {} at {}", order, self.buffer_address);
            self.process_order(order)?;
        }
        self.fields.validate()?;
        debug!(
            "processed {} orders into {} fields, buffer address {}",
            orders.len(),
            self.fields.len(),
            self.buffer_address
        );
        Ok(WriteOutcome {
            buffer_address: self.buffer_address,
            cursor: self.cursor,
            restore_keyboard: wcc.keyboard_restore(),
            sound_alarm: wcc.sound_alarm(),
            start_printer: wcc.start_printer(),
        })
    }

    fn process_order(&mut self, order: &Order) -> DatastreamResult<()> {
        match order {
            Order::SetBufferAddress(address) => {
                self.buffer_address = self.target(*address)?;
            }
            Order::StartField(attribute) => {
                self.fields
                    .insert_start_of_field(self.buffer_address, *attribute)?;
                self.advance(1);
            }
            Order::Text(text) => {
                let text: Vec<char> = text.chars().collect();
                self.fields.write_text(self.buffer_address, &text)?;
                self.advance(text.len());
            }
            Order::GraphicsEscape(character) => {
                self.fields.write_text(self.buffer_address, &[*character])?;
                self.advance(1);
            }
            Order::RepeatToAddress(address, character) => {
                let target = self.target(*address)?;
                let count = self.distance_to(target);
                self.fields
                    .write_chars(self.buffer_address, count, *character)?;
                self.buffer_address = target;
            }
            Order::EraseUnprotectedToAddress(address) => {
                let target = self.target(*address)?;
                let count = self.distance_to(target);
                self.fields.erase_unprotected(self.buffer_address, count)?;
                self.buffer_address = target;
            }
            Order::InsertCursor => {
                self.cursor = Some(self.buffer_address);
            }
            Order::ProgramTab => {
                self.buffer_address = self
                    .fields
                    .next_unprotected(self.buffer_address)
                    .unwrap_or(0);
            }
            Order::ModifyField(pairs) => match self.fields.start_of_field_mut(self.buffer_address) {
                Some(marker) => {
                    for (kind, value) in pairs {
                        if !marker.attribute_mut().apply_extended(*kind, *value) {
                            trace!("MF ignores attribute type {:#04X}", kind);
                        }
                    }
                    self.advance(1);
                }
                None => warn!(
                    "MF at {} does not address a field attribute, ignored",
                    self.buffer_address
                ),
            },
            Order::SetAttribute(kind, value) => {
                trace!("SA {:#04X}={:#04X} ignored", kind, value);
            }
        }
        Ok(())
    }

    fn target(&self, address: BufferAddress) -> DatastreamResult<usize> {
        Ok(address.validate(self.fields.size())?.value())
    }

    /// Positions from the write position up to, not including, `target`; the whole buffer when
    /// they coincide.
    fn distance_to(&self, target: usize) -> usize {
        let size = self.fields.size();
        match (target + size - self.buffer_address) % size {
            0 => size,
            distance => distance,
        }
    }

    fn advance(&mut self, count: usize) {
        self.buffer_address = (self.buffer_address + count) % self.fields.size();
    }
}
