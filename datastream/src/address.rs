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

//! Buffer addresses and their two-byte wire encodings

use crate::result::ProtocolError;
use std::fmt::{Display, Formatter};

/// The 3270 6-bit address alphabet. `ADDRESS_TABLE[n] & 0x3F == n` for every entry.
pub const ADDRESS_TABLE: [u8; 64] = [
    0x40, 0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F,
    0x50, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0x5A, 0x5B, 0x5C, 0x5D, 0x5E, 0x5F,
    0x60, 0x61, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F,
    0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0x7A, 0x7B, 0x7C, 0x7D, 0x7E, 0x7F,
];

/// Map the low six bits of `value` through the address alphabet.
pub const fn encode_six_bits(value: u8) -> u8 {
    ADDRESS_TABLE[(value & 0x3F) as usize]
}

/// Returns true when `byte` is a member of the address alphabet.
pub const fn is_six_bit_code(byte: u8) -> bool {
    ADDRESS_TABLE[(byte & 0x3F) as usize] == byte
}

/// How outbound buffer addresses are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// Two 6-bit groups, each mapped through [`ADDRESS_TABLE`]
    TwelveBit,
    /// Binary, top two bits of the first byte clear
    FourteenBit,
}

impl AddressMode {
    /// Largest buffer that still fits 12-bit addressing
    pub const TWELVE_BIT_LIMIT: usize = 4096;

    /// Pick the addressing mode for a buffer of `size` positions
    pub fn for_size(size: usize) -> AddressMode {
        if size > Self::TWELVE_BIT_LIMIT {
            AddressMode::FourteenBit
        } else {
            AddressMode::TwelveBit
        }
    }
}

/// A linear offset into the screen's character grid
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferAddress(usize);

impl BufferAddress {
    /// Wrap a raw buffer offset
    pub const fn new(address: usize) -> BufferAddress {
        BufferAddress(address)
    }

    /// Address of `row`/`col` on a screen `width` columns wide
    pub const fn from_row_col(row: usize, col: usize, width: usize) -> BufferAddress {
        BufferAddress(row * width + col)
    }

    /// Raw buffer offset
    pub const fn value(self) -> usize {
        self.0
    }

    /// Zero based row on a screen `width` columns wide
    pub const fn row(self, width: usize) -> usize {
        self.0 / width
    }

    /// Zero based column on a screen `width` columns wide
    pub const fn col(self, width: usize) -> usize {
        self.0 % width
    }

    /// Encode into the two-byte wire form.
    ///
    /// Bits above the mode's range are discarded; callers validate against the buffer size.
    pub fn encode(self, mode: AddressMode) -> [u8; 2] {
        match mode {
            AddressMode::TwelveBit => [
                encode_six_bits((self.0 >> 6) as u8),
                encode_six_bits(self.0 as u8),
            ],
            AddressMode::FourteenBit => [((self.0 >> 8) & 0x3F) as u8, (self.0 & 0xFF) as u8],
        }
    }

    /// Decode the two-byte wire form.
    ///
    /// A first byte with its top two bits clear is a 14-bit binary address; anything else must be
    /// a pair of 6-bit alphabet codes.
    pub fn decode(bytes: [u8; 2]) -> Result<BufferAddress, ProtocolError> {
        let [high, low] = bytes;
        if high & 0xC0 == 0 {
            return Ok(BufferAddress((usize::from(high & 0x3F) << 8) | usize::from(low)));
        }
        if !is_six_bit_code(high) || !is_six_bit_code(low) {
            return Err(ProtocolError::InvalidAddress(high, low));
        }
        Ok(BufferAddress(
            (usize::from(high & 0x3F) << 6) | usize::from(low & 0x3F),
        ))
    }

    /// Check the address against a buffer of `size` positions
    pub fn validate(self, size: usize) -> Result<BufferAddress, ProtocolError> {
        if self.0 < size {
            Ok(self)
        } else {
            Err(ProtocolError::AddressOutOfRange {
                address: self.0,
                size,
            })
        }
    }
}

impl From<usize> for BufferAddress {
    fn from(address: usize) -> Self {
        BufferAddress(address)
    }
}

impl From<BufferAddress> for usize {
    fn from(address: BufferAddress) -> Self {
        address.0
    }
}

impl Display for BufferAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
