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

//! The terminal screen: field list, cursor and keyboard state driven by host commands

use crate::address::{AddressMode, BufferAddress};
use crate::codepage::{CodePage, Cp037};
use crate::consts::{TN3270E_HEADER_LEN, order, sfid};
use crate::field::{Field, ring_len};
use crate::fields::FieldList;
use crate::message::{
    AidKey, Command, Inbound3270Message, Outbound3270Message, StructuredField,
    WriteControlCharacter,
};
use crate::processor::OrderProcessor;
use crate::query::query_replies;
use crate::result::{DatastreamError, DatastreamResult};
use crate::types::ScreenModel;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// EBCDIC '?' sent for characters the code page cannot encode
const SUBSTITUTE: u8 = 0x6F;

/// One logical 3270 display.
///
/// Created per terminal session and mutated by every host command in arrival order.
#[derive(Debug, Clone)]
pub struct Screen {
    primary: (usize, usize),
    alternate: (usize, usize),
    width: usize,
    height: usize,
    fields: FieldList,
    cursor: usize,
    aid: AidKey,
    wcc: WriteControlCharacter,
    keyboard_locked: bool,
    alarm: bool,
    tn3270e: bool,
    code_page: Arc<dyn CodePage>,
}

impl Screen {
    /// A `width` x `height` display using code page 037
    pub fn new(width: usize, height: usize) -> Screen {
        Screen::with_code_page(width, height, Arc::new(Cp037))
    }

    /// A `width` x `height` display translating characters through `code_page`
    pub fn with_code_page(width: usize, height: usize, code_page: Arc<dyn CodePage>) -> Screen {
        let width = width.max(1);
        let height = height.max(1);
        Screen {
            primary: (width, height),
            alternate: (width, height),
            width,
            height,
            fields: FieldList::new(width * height),
            cursor: 0,
            aid: AidKey::NoAid,
            wcc: WriteControlCharacter::default(),
            keyboard_locked: true,
            alarm: false,
            tn3270e: true,
            code_page,
        }
    }

    /// A display of `model`: 24x80 by default, the model's size after Erase/Write Alternate
    pub fn for_model(model: ScreenModel) -> Screen {
        let (width, height) = model.dimensions();
        Screen::new(80, 24).with_alternate_size(width, height)
    }

    /// Set the size Erase/Write Alternate switches to
    pub fn with_alternate_size(mut self, width: usize, height: usize) -> Screen {
        self.alternate = (width.max(1), height.max(1));
        self
    }

    // ===== Geometry =====

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of buffer positions
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    /// Whether outbound records start with the TN3270E header
    pub fn is_tn3270e(&self) -> bool {
        self.tn3270e
    }

    /// Switch between TN3270E (header) and basic TN3270 (no header) records
    pub fn set_tn3270e(&mut self, tn3270e: bool) {
        self.tn3270e = tn3270e;
    }

    pub fn code_page(&self) -> &Arc<dyn CodePage> {
        &self.code_page
    }

    fn address_mode(&self) -> AddressMode {
        AddressMode::for_size(self.size())
    }

    fn resize(&mut self, (width, height): (usize, usize)) {
        if (width, height) != (self.width, self.height) {
            debug!("screen resized to {}x{}", width, height);
        }
        self.width = width;
        self.height = height;
        self.clear();
    }

    /// Null the whole buffer and home the cursor
    pub fn clear(&mut self) {
        self.fields = FieldList::new(self.size());
        self.cursor = 0;
    }

    // ===== Host Commands =====

    /// Parse one record (TN3270E header already removed) and apply it
    pub fn process_bytes(&mut self, bytes: &[u8]) -> DatastreamResult<Option<Outbound3270Message>> {
        let message = Inbound3270Message::parse(bytes, self.code_page.as_ref())?;
        self.process_inbound_message(&message)
    }

    /// Apply one host command, returning the reply a read command asks for
    pub fn process_inbound_message(
        &mut self,
        message: &Inbound3270Message,
    ) -> DatastreamResult<Option<Outbound3270Message>> {
        let command = message.command_code();
        debug!("processing {} with {} orders", command, message.orders().len());
        match command {
            Command::Write => {
                self.write(message)?;
                Ok(None)
            }
            Command::EraseWrite => {
                self.resize(self.primary);
                self.write(message)?;
                Ok(None)
            }
            Command::EraseWriteAlternate => {
                self.resize(self.alternate);
                self.write(message)?;
                Ok(None)
            }
            Command::ReadBuffer => Ok(Some(self.read_buffer())),
            Command::ReadModified => Ok(Some(self.read_modified(false))),
            Command::ReadModifiedAll => Ok(Some(self.read_modified(true))),
            Command::EraseAllUnprotected => {
                self.erase_all_unprotected()?;
                Ok(None)
            }
            Command::WriteStructuredField => {
                let mut reply = None;
                for field in message.structured_fields() {
                    if let Some(outbound) = self.process_structured_field(field)? {
                        reply = Some(outbound);
                    }
                }
                Ok(reply)
            }
        }
    }

    fn write(&mut self, message: &Inbound3270Message) -> DatastreamResult<()> {
        let wcc = message.wcc().unwrap_or_default();
        let outcome =
            OrderProcessor::new(&mut self.fields, self.cursor).process_orders(message.orders(), wcc)?;
        self.wcc = wcc;
        if wcc.reset() {
            // Reply mode is always field mode.
            debug!("WCC reset, reply mode remains field mode");
        }
        if let Some(cursor) = outcome.cursor {
            self.cursor = cursor;
        }
        if outcome.restore_keyboard {
            self.keyboard_locked = false;
            self.aid = AidKey::NoAid;
        }
        self.alarm = outcome.sound_alarm;
        if outcome.start_printer {
            debug!("host requested a print, no printer attached");
        }
        Ok(())
    }

    fn process_structured_field(
        &mut self,
        field: &StructuredField,
    ) -> DatastreamResult<Option<Outbound3270Message>> {
        match field.id {
            _ if field.is_query() => {
                debug!("answering read partition query");
                let mut data = self.header();
                data.extend(query_replies(self.width, self.height));
                Ok(Some(Outbound3270Message::new(data)))
            }
            sfid::ERASE_RESET => {
                let alternate = field.data.first().is_some_and(|flags| flags & 0x80 != 0);
                self.resize(if alternate { self.alternate } else { self.primary });
                Ok(None)
            }
            sfid::OUTBOUND_3270DS => match field.data.get(1..) {
                Some(record) if !record.is_empty() => self.process_bytes(record),
                _ => {
                    warn!("empty outbound 3270DS structured field");
                    Ok(None)
                }
            },
            id => {
                warn!("ignoring structured field {:#04X}", id);
                Ok(None)
            }
        }
    }

    /// Null every unprotected position, reset all MDTs, unlock the keyboard and home the cursor
    pub fn erase_all_unprotected(&mut self) -> DatastreamResult<()> {
        let size = self.size();
        self.fields.erase_unprotected(0, size)?;
        self.fields.reset_modified();
        self.fields.validate()?;
        self.cursor = self.fields.next_unprotected(0).unwrap_or(0);
        self.keyboard_locked = false;
        self.aid = AidKey::NoAid;
        Ok(())
    }

    // ===== Inbound Records =====

    fn header(&self) -> Vec<u8> {
        if self.tn3270e {
            vec![0; TN3270E_HEADER_LEN]
        } else {
            Vec::new()
        }
    }

    fn encode_char(&self, ch: char) -> u8 {
        if ch == '\0' {
            0x00
        } else {
            self.code_page.to_byte(ch).unwrap_or(SUBSTITUTE)
        }
    }

    fn push_address(&self, out: &mut Vec<u8>, position: usize) {
        out.extend_from_slice(&BufferAddress::new(position).encode(self.address_mode()));
    }

    fn push_content(&self, out: &mut Vec<u8>, content: impl IntoIterator<Item = char>) {
        out.extend(
            content
                .into_iter()
                .filter(|ch| *ch != '\0')
                .map(|ch| self.encode_char(ch)),
        );
    }

    /// Build the Read Modified (or Read Modified All) reply for the last AID.
    ///
    /// Short-read keys send the AID alone unless every field was asked for. An unformatted
    /// buffer is sent as its characters from position zero; a formatted one as an SBA plus
    /// content for each selected field, where a field wrapping past the end of the buffer stays
    /// a single run.
    pub fn read_modified(&self, all: bool) -> Outbound3270Message {
        let mut data = self.header();
        data.push(self.aid.to_u8());
        if !all && self.aid.is_short_read() {
            trace!("short read for {}", self.aid);
            return Outbound3270Message::new(data);
        }
        self.push_address(&mut data, self.cursor);

        let size = self.size();
        if !self.fields.is_formatted() {
            self.push_content(&mut data, (0..size).filter_map(|p| self.fields.char_at(p)));
            return Outbound3270Message::new(data);
        }

        for (index, field) in self.fields.iter().enumerate() {
            let Some(marker) = field.as_start_of_field() else {
                continue;
            };
            if !all && (!marker.is_modified() || marker.is_protected()) {
                continue;
            }
            data.push(order::SBA);
            self.push_address(&mut data, (marker.position() + 1) % size);
            if let Some(content) = self.fields.content_after(index) {
                self.push_content(&mut data, content.chars(size));
            }
        }
        Outbound3270Message::new(data)
    }

    /// Build the Read Buffer reply: every position, with an SF order in place of each marker
    pub fn read_buffer(&self) -> Outbound3270Message {
        let mut data = self.header();
        data.push(self.aid.to_u8());
        self.push_address(&mut data, self.cursor);
        for position in 0..self.size() {
            match self.fields.start_of_field(position) {
                Some(marker) => data.extend_from_slice(&[order::SF, marker.attribute().to_byte()]),
                None => {
                    let ch = self.fields.char_at(position).unwrap_or('\0');
                    data.push(self.encode_char(ch));
                }
            }
        }
        Outbound3270Message::new(data)
    }

    // ===== Operator Actions =====

    /// Move the cursor to `position`
    pub fn set_cursor(&mut self, position: usize) -> DatastreamResult<()> {
        if position >= self.size() {
            return Err(DatastreamError::InputRejected {
                position,
                reason: format!("outside a buffer of {} positions", self.size()),
            });
        }
        self.cursor = position;
        Ok(())
    }

    /// Move the cursor to `row`, `col`
    pub fn set_cursor_row_col(&mut self, row: usize, col: usize) -> DatastreamResult<()> {
        self.set_cursor(BufferAddress::from_row_col(row, col, self.width).value())
    }

    /// Type `text` at the cursor.
    ///
    /// Each character must land in a typeable position; numeric fields accept digits, period
    /// and minus only. Typing sets the field's MDT and the cursor skips over field markers.
    pub fn type_text(&mut self, text: &str) -> DatastreamResult<()> {
        for ch in text.chars() {
            self.type_char(ch)?;
        }
        Ok(())
    }

    fn type_char(&mut self, ch: char) -> DatastreamResult<()> {
        let position = self.cursor;
        let reject = |reason: &str| DatastreamError::InputRejected {
            position,
            reason: reason.to_string(),
        };
        let field = self
            .fields
            .field_at(position)
            .ok_or_else(|| reject("no field at cursor"))?;
        if !self.fields.is_typeable(field) {
            return Err(reject("protected position"));
        }
        let owner = self.fields.owner(field).map(|sf| (sf.position(), sf.is_numeric()));
        let numeric = owner.is_some_and(|(_, numeric)| numeric);
        if numeric && !(ch.is_ascii_digit() || ch == '.' || ch == '-') {
            return Err(reject("numeric field"));
        }

        self.fields.write_text(position, &[ch])?;
        if let Some(marker) = owner.and_then(|(p, _)| self.fields.start_of_field_mut(p)) {
            marker.set_modified(true);
        }
        self.advance_cursor();
        Ok(())
    }

    fn advance_cursor(&mut self) {
        let next = (self.cursor + 1) % self.size();
        self.cursor = if self.fields.start_of_field(next).is_some() {
            self.fields.next_unprotected(next).unwrap_or(next)
        } else {
            next
        };
    }

    /// Move the cursor to the first position of the next unprotected field, or home
    pub fn tab(&mut self) {
        self.cursor = self.fields.next_unprotected(self.cursor).unwrap_or(0);
    }

    /// Null the field content from the cursor to the end of its field
    pub fn erase_eof(&mut self) -> DatastreamResult<()> {
        let size = self.size();
        let position = self.cursor;
        let field = self.fields.field_at(position).ok_or(DatastreamError::InputRejected {
            position,
            reason: "no field at cursor".to_string(),
        })?;
        if !self.fields.is_typeable(field) {
            return Err(DatastreamError::InputRejected {
                position,
                reason: "protected position".to_string(),
            });
        }
        let count = ring_len(position, field.end(), size);
        let owner = self.fields.owner(field).map(|sf| sf.position());
        self.fields.write_chars(position, count, '\0')?;
        if let Some(marker) = owner.and_then(|p| self.fields.start_of_field_mut(p)) {
            marker.set_modified(true);
        }
        Ok(())
    }

    /// Press an attention key.
    ///
    /// Records the AID, locks the keyboard and returns the Read Modified record to send. CLEAR
    /// also nulls the screen once the record is built.
    pub fn aid(&mut self, key: AidKey) -> Outbound3270Message {
        debug!("AID {}", key);
        self.aid = key;
        self.keyboard_locked = true;
        let record = self.read_modified(false);
        if key == AidKey::Clear {
            let primary = self.primary;
            self.resize(primary);
        }
        record
    }

    // ===== Queries =====

    /// Field covering `position`
    pub fn get_field_at(&self, position: usize) -> Option<&Field> {
        self.fields.field_at(position)
    }

    /// Field covering the cursor
    pub fn retrieve_field_at_cursor(&self) -> Option<&Field> {
        self.fields.field_at(self.cursor)
    }

    /// Whether any field's content contains `text`
    pub fn is_text_in_field(&self, text: &str) -> bool {
        let size = self.size();
        self.fields.iter().any(|field| field.contains_text(text, size))
    }

    pub fn fields(&self) -> &FieldList {
        &self.fields
    }

    /// The displayed screen, one line per row.
    ///
    /// Markers, nulls and hidden fields show as spaces.
    pub fn print_screen(&self) -> String {
        let size = self.size();
        let cells: Vec<char> = (0..size)
            .map(|position| {
                let hidden = self
                    .fields
                    .owner_at(position)
                    .is_some_and(|sf| sf.attribute().is_hidden());
                match self.fields.char_at(position) {
                    Some(ch) if !hidden && ch != '\0' => ch,
                    _ => ' ',
                }
            })
            .collect();
        cells
            .chunks(self.width)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Displayed text of `row`
    pub fn row_text(&self, row: usize) -> Option<String> {
        self.print_screen().lines().nth(row).map(str::to_string)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Last attention key pressed
    pub fn last_aid(&self) -> AidKey {
        self.aid
    }

    /// WCC of the most recent write
    pub fn wcc(&self) -> WriteControlCharacter {
        self.wcc
    }

    pub fn keyboard_locked(&self) -> bool {
        self.keyboard_locked
    }

    /// Whether the most recent write sounded the alarm
    pub fn sound_alarm(&self) -> bool {
        self.alarm
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::for_model(ScreenModel::default())
    }
}
