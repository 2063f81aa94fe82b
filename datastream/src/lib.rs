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

//! # TN3270 Data Stream
//!
//! The 3270 data stream engine behind a TN3270 terminal. Everything here is synchronous and
//! free of I/O: bytes of one host record go in, screen state and reply records come out.
//!
//! - [`BufferAddress`] encodes linear buffer offsets in the 6-bit address alphabet (and the
//!   14-bit binary form used by large screens).
//! - [`FieldList`] holds the buffer as an ordered ring of [`Field`] segments: attribute
//!   markers, repeated-character runs and literal text.
//! - [`Inbound3270Message`] parses a host record into a command, a WCC and [`Order`]s.
//! - [`OrderProcessor`] applies orders to a field list.
//! - [`Screen`] owns the field list, cursor, AID and keyboard state, answers read commands and
//!   accepts operator input.
//!
//! ## Usage Example
//!
//! ```rust
//! use tn3270_datastream::{AidKey, Screen};
//!
//! let mut screen = Screen::new(80, 24);
//! // Erase/Write, WCC keyboard restore, SF unprotected, IC
//! screen.process_bytes(&[0xF5, 0x02, 0x1D, 0x40, 0x13]).unwrap();
//! assert!(!screen.keyboard_locked());
//!
//! screen.type_text("HELLO").unwrap();
//! let record = screen.aid(AidKey::Enter);
//! // TN3270E header, ENTER, cursor address, SBA to the field, then the text
//! assert_eq!(record.as_bytes()[5], 0x7D);
//! assert_eq!(&record.as_bytes()[11..], &[0xC8, 0xC5, 0xD3, 0xD3, 0xD6]);
//! ```

#![warn(clippy::cargo, future_incompatible, rust_2018_idioms)]

mod address;
mod attribute;
mod codepage;
pub mod consts;
mod field;
mod fields;
mod message;
mod order;
mod processor;
mod query;
mod result;
mod screen;
mod types;

pub use self::address::{ADDRESS_TABLE, AddressMode, BufferAddress};
pub use self::attribute::{DisplayMode, FieldAttribute};
pub use self::codepage::{CodePage, Cp037};
pub use self::field::{CharsField, Field, StartOfField, TextField, ring_len};
pub use self::fields::FieldList;
pub use self::message::{
    AidKey, Command, Inbound3270Message, KeyNumber, Outbound3270Message, StructuredField,
    WriteControlCharacter,
};
pub use self::order::Order;
pub use self::processor::{OrderProcessor, WriteOutcome};
pub use self::query::{QueryReply, query_replies};
pub use self::result::{DatastreamError, DatastreamResult, ProtocolError};
pub use self::screen::Screen;
pub use self::types::ScreenModel;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erase_write_then_enter() {
        let mut screen = Screen::new(80, 24);
        // Erase/Write, restore, SF protected "ID", SF unprotected, IC
        let record = [0xF5, 0x02, 0x1D, 0x60, 0xC9, 0xC4, 0x1D, 0x40, 0x13];
        assert_eq!(screen.process_bytes(&record).unwrap(), None);
        assert_eq!(screen.cursor(), 4);
        assert!(screen.is_text_in_field("ID"));

        screen.type_text("U1").unwrap();
        let reply = screen.aid(AidKey::Enter);
        let mut expected = vec![0, 0, 0, 0, 0, 0x7D];
        expected.extend(BufferAddress::new(6).encode(AddressMode::TwelveBit));
        expected.push(consts::order::SBA);
        expected.extend(BufferAddress::new(4).encode(AddressMode::TwelveBit));
        expected.extend([0xE4, 0xF1]);
        assert_eq!(reply.as_bytes(), &expected[..]);
    }

    #[test]
    fn test_unknown_command_is_protocol_error() {
        let mut screen = Screen::new(80, 24);
        let err = screen.process_bytes(&[0x99]).unwrap_err();
        assert!(err.is_protocol_error());
        assert!(matches!(
            err,
            DatastreamError::Protocol(ProtocolError::UnknownCommand(0x99))
        ));
    }
}
