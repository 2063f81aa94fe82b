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

//! EBCDIC code pages

use std::fmt::Debug;

/// Byte to character translation for a host code page.
///
/// The engine never assumes a particular EBCDIC variant; the owning terminal supplies one.
pub trait CodePage: Debug + Send + Sync {
    /// Code page name, for logging
    fn name(&self) -> &str;

    /// Translate a host byte into a character
    fn to_char(&self, byte: u8) -> char;

    /// Translate a character into a host byte, if the code page has one
    fn to_byte(&self, ch: char) -> Option<u8>;
}

/// EBCDIC code page 037 (US/Canada)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cp037;

impl CodePage for Cp037 {
    fn name(&self) -> &str {
        "CP037"
    }

    fn to_char(&self, byte: u8) -> char {
        CP037[usize::from(byte)]
    }

    fn to_byte(&self, ch: char) -> Option<u8> {
        CP037
            .iter()
            .position(|candidate| *candidate == ch)
            .and_then(|index| u8::try_from(index).ok())
    }
}

#[rustfmt::skip]
const CP037: [char; 256] = [
    '\x00', '\x01', '\x02', '\x03', '\u{009C}', '\t', '\u{0086}', '\x7F',
    '\u{0097}', '\u{008D}', '\u{008E}', '\x0B', '\x0C', '\r', '\x0E', '\x0F',
    '\x10', '\x11', '\x12', '\x13', '\u{009D}', '\u{0085}', '\x08', '\u{0087}',
    '\x18', '\x19', '\u{0092}', '\u{008F}', '\x1C', '\x1D', '\x1E', '\x1F',
    '\u{0080}', '\u{0081}', '\u{0082}', '\u{0083}', '\u{0084}', '\n', '\x17', '\x1B',
    '\u{0088}', '\u{0089}', '\u{008A}', '\u{008B}', '\u{008C}', '\x05', '\x06', '\x07',
    '\u{0090}', '\u{0091}', '\x16', '\u{0093}', '\u{0094}', '\u{0095}', '\u{0096}', '\x04',
    '\u{0098}', '\u{0099}', '\u{009A}', '\u{009B}', '\x14', '\x15', '\u{009E}', '\x1A',
    ' ', '\u{00A0}', '\u{00E2}', '\u{00E4}', '\u{00E0}', '\u{00E1}', '\u{00E3}', '\u{00E5}',
    '\u{00E7}', '\u{00F1}', '\u{00A2}', '.', '<', '(', '+', '|',
    '&', '\u{00E9}', '\u{00EA}', '\u{00EB}', '\u{00E8}', '\u{00ED}', '\u{00EE}', '\u{00EF}',
    '\u{00EC}', '\u{00DF}', '!', '$', '*', ')', ';', '\u{00AC}',
    '-', '/', '\u{00C2}', '\u{00C4}', '\u{00C0}', '\u{00C1}', '\u{00C3}', '\u{00C5}',
    '\u{00C7}', '\u{00D1}', '\u{00A6}', ',', '%', '_', '>', '?',
    '\u{00F8}', '\u{00C9}', '\u{00CA}', '\u{00CB}', '\u{00C8}', '\u{00CD}', '\u{00CE}', '\u{00CF}',
    '\u{00CC}', '`', ':', '#', '@', '\'', '=', '"',
    '\u{00D8}', 'a', 'b', 'c', 'd', 'e', 'f', 'g',
    'h', 'i', '\u{00AB}', '\u{00BB}', '\u{00F0}', '\u{00FD}', '\u{00FE}', '\u{00B1}',
    '\u{00B0}', 'j', 'k', 'l', 'm', 'n', 'o', 'p',
    'q', 'r', '\u{00AA}', '\u{00BA}', '\u{00E6}', '\u{00B8}', '\u{00C6}', '\u{00A4}',
    '\u{00B5}', '~', 's', 't', 'u', 'v', 'w', 'x',
    'y', 'z', '\u{00A1}', '\u{00BF}', '\u{00D0}', '\u{00DD}', '\u{00DE}', '\u{00AE}',
    '^', '\u{00A3}', '\u{00A5}', '\u{00B7}', '\u{00A9}', '\u{00A7}', '\u{00B6}', '\u{00BC}',
    '\u{00BD}', '\u{00BE}', '[', ']', '\u{00AF}', '\u{00A8}', '\u{00B4}', '\u{00D7}',
    '{', 'A', 'B', 'C', 'D', 'E', 'F', 'G',
    'H', 'I', '\u{00AD}', '\u{00F4}', '\u{00F6}', '\u{00F2}', '\u{00F3}', '\u{00F5}',
    '}', 'J', 'K', 'L', 'M', 'N', 'O', 'P',
    'Q', 'R', '\u{00B9}', '\u{00FB}', '\u{00FC}', '\u{00F9}', '\u{00FA}', '\u{00FF}',
    '\\', '\u{00F7}', 'S', 'T', 'U', 'V', 'W', 'X',
    'Y', 'Z', '\u{00B2}', '\u{00D4}', '\u{00D6}', '\u{00D2}', '\u{00D3}', '\u{00D5}',
    '0', '1', '2', '3', '4', '5', '6', '7',
    '8', '9', '\u{00B3}', '\u{00DB}', '\u{00DC}', '\u{00D9}', '\u{00DA}', '\u{009F}',
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cp037_letters_and_digits() {
        let cp = Cp037;
        assert_eq!(cp.to_char(0xC1), 'A');
        assert_eq!(cp.to_char(0x81), 'a');
        assert_eq!(cp.to_char(0xF0), '0');
        assert_eq!(cp.to_char(0x40), ' ');
        assert_eq!(cp.to_char(0x00), '\0');
        assert_eq!(cp.to_byte('Z'), Some(0xE9));
        assert_eq!(cp.to_byte('9'), Some(0xF9));
        assert_eq!(cp.to_byte('\0'), Some(0x00));
    }

    #[test]
    fn test_cp037_is_a_bijection() {
        let cp = Cp037;
        for byte in 0..=255u8 {
            assert_eq!(cp.to_byte(cp.to_char(byte)), Some(byte), "byte {byte:#04X}");
        }
    }

    #[test]
    fn test_cp037_unmapped_character() {
        assert_eq!(Cp037.to_byte('\u{20AC}'), None);
        assert_eq!(Cp037.name(), "CP037");
    }
}
