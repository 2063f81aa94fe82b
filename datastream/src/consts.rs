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

//! 3270 data stream code points

/// Command codes, in both channel (CCW) and SNA forms
pub mod command {
    /// Write (CCW)
    pub const WRITE: u8 = 0x01;
    /// Erase/Write (CCW)
    pub const ERASE_WRITE: u8 = 0x05;
    /// Erase/Write Alternate (CCW)
    pub const ERASE_WRITE_ALTERNATE: u8 = 0x0D;
    /// Read Buffer (CCW)
    pub const READ_BUFFER: u8 = 0x02;
    /// Read Modified (CCW)
    pub const READ_MODIFIED: u8 = 0x06;
    /// Read Modified All (CCW)
    pub const READ_MODIFIED_ALL: u8 = 0x0E;
    /// Erase All Unprotected (CCW)
    pub const ERASE_ALL_UNPROTECTED: u8 = 0x0F;
    /// Write Structured Field (CCW)
    pub const WRITE_STRUCTURED_FIELD: u8 = 0x11;

    /// Write (SNA)
    pub const SNA_WRITE: u8 = 0xF1;
    /// Erase/Write (SNA)
    pub const SNA_ERASE_WRITE: u8 = 0xF5;
    /// Erase/Write Alternate (SNA)
    pub const SNA_ERASE_WRITE_ALTERNATE: u8 = 0x7E;
    /// Read Buffer (SNA)
    pub const SNA_READ_BUFFER: u8 = 0xF2;
    /// Read Modified (SNA)
    pub const SNA_READ_MODIFIED: u8 = 0xF6;
    /// Read Modified All (SNA)
    pub const SNA_READ_MODIFIED_ALL: u8 = 0x6E;
    /// Erase All Unprotected (SNA)
    pub const SNA_ERASE_ALL_UNPROTECTED: u8 = 0x6F;
    /// Write Structured Field (SNA)
    pub const SNA_WRITE_STRUCTURED_FIELD: u8 = 0xF3;
}

/// Order codes embedded in a write data stream
pub mod order {
    /// Start Field
    pub const SF: u8 = 0x1D;
    /// Start Field Extended
    pub const SFE: u8 = 0x29;
    /// Set Buffer Address
    pub const SBA: u8 = 0x11;
    /// Set Attribute
    pub const SA: u8 = 0x28;
    /// Modify Field
    pub const MF: u8 = 0x2C;
    /// Insert Cursor
    pub const IC: u8 = 0x13;
    /// Program Tab
    pub const PT: u8 = 0x05;
    /// Repeat to Address
    pub const RA: u8 = 0x3C;
    /// Erase Unprotected to Address
    pub const EUA: u8 = 0x12;
    /// Graphic Escape
    pub const GE: u8 = 0x08;
}

/// Attention identifiers sent with inbound (terminal to host) data
pub mod aid {
    pub const NO_AID: u8 = 0x60;
    pub const STRUCTURED_FIELD: u8 = 0x88;
    pub const ENTER: u8 = 0x7D;
    pub const CLEAR: u8 = 0x6D;
    pub const PA1: u8 = 0x6C;
    pub const PA2: u8 = 0x6E;
    pub const PA3: u8 = 0x6B;

    /// PF1 through PF24, indexed by key number minus one.
    pub const PF: [u8; 24] = [
        0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0x7A, 0x7B, 0x7C, //
        0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0x4A, 0x4B, 0x4C,
    ];
}

/// Write Control Character bits
pub mod wcc {
    /// Reset partition / reset the inbound reply mode
    pub const RESET: u8 = 0x40;
    /// Start printer
    pub const START_PRINTER: u8 = 0x08;
    /// Sound alarm
    pub const SOUND_ALARM: u8 = 0x04;
    /// Keyboard restore
    pub const KEYBOARD_RESTORE: u8 = 0x02;
    /// Reset modified data tags
    pub const RESET_MDT: u8 = 0x01;
}

/// Field attribute bits carried by SF
pub mod attribute {
    pub const PROTECTED: u8 = 0x20;
    pub const NUMERIC: u8 = 0x10;
    pub const DISPLAY_MASK: u8 = 0x0C;
    pub const DISPLAY_NORMAL: u8 = 0x00;
    pub const DISPLAY_DETECTABLE: u8 = 0x04;
    pub const DISPLAY_INTENSIFIED: u8 = 0x08;
    pub const DISPLAY_HIDDEN: u8 = 0x0C;
    pub const MDT: u8 = 0x01;
}

/// Extended attribute types used by SFE, SA and MF
pub mod extended {
    /// Basic 3270 field attribute
    pub const FIELD: u8 = 0xC0;
    pub const VALIDATION: u8 = 0xC1;
    pub const OUTLINING: u8 = 0xC2;
    pub const HIGHLIGHTING: u8 = 0x41;
    pub const FOREGROUND: u8 = 0x42;
    pub const CHARSET: u8 = 0x43;
    pub const BACKGROUND: u8 = 0x45;
    pub const TRANSPARENCY: u8 = 0x46;
}

/// Structured field identifiers and query codes
pub mod sfid {
    /// Read Partition (outbound)
    pub const READ_PARTITION: u8 = 0x01;
    /// Erase/Reset (outbound)
    pub const ERASE_RESET: u8 = 0x03;
    /// Outbound 3270DS
    pub const OUTBOUND_3270DS: u8 = 0x40;

    /// Read Partition type: Query
    pub const RP_QUERY: u8 = 0x02;
    /// Read Partition type: Query List
    pub const RP_QUERY_LIST: u8 = 0x03;

    /// Inbound Query Reply structured field
    pub const QUERY_REPLY: u8 = 0x81;

    /// Query reply code: Summary
    pub const QR_SUMMARY: u8 = 0x80;
    /// Query reply code: Usable Area
    pub const QR_USABLE_AREA: u8 = 0x81;
    /// Query reply code: Implicit Partition
    pub const QR_IMPLICIT_PARTITION: u8 = 0xA6;
}

/// Length of the TN3270E record header that precedes a data stream
pub const TN3270E_HEADER_LEN: usize = 5;
