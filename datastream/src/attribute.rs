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

//! Field attributes carried by Start Field markers

use crate::address::encode_six_bits;
use crate::consts::{attribute, extended};
use std::fmt::{Display, Formatter};

/// Display bits of a field attribute
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Normal intensity, not light-pen detectable
    #[default]
    Normal,
    /// Normal intensity, detectable
    Detectable,
    /// Intensified, detectable
    Intensified,
    /// Non-display
    Hidden,
}

impl DisplayMode {
    fn from_bits(bits: u8) -> DisplayMode {
        match bits & attribute::DISPLAY_MASK {
            attribute::DISPLAY_DETECTABLE => DisplayMode::Detectable,
            attribute::DISPLAY_INTENSIFIED => DisplayMode::Intensified,
            attribute::DISPLAY_HIDDEN => DisplayMode::Hidden,
            _ => DisplayMode::Normal,
        }
    }

    fn bits(self) -> u8 {
        match self {
            DisplayMode::Normal => attribute::DISPLAY_NORMAL,
            DisplayMode::Detectable => attribute::DISPLAY_DETECTABLE,
            DisplayMode::Intensified => attribute::DISPLAY_INTENSIFIED,
            DisplayMode::Hidden => attribute::DISPLAY_HIDDEN,
        }
    }
}

/// The attribute byte of a field plus the extended attributes an SFE or MF may attach.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldAttribute {
    /// Operator input is refused
    pub protected: bool,
    /// Only digits may be typed
    pub numeric: bool,
    /// Intensity and detectability
    pub display: DisplayMode,
    /// Modified data tag
    pub modified: bool,
    /// Extended highlighting, if the host set one
    pub highlighting: Option<u8>,
    /// Foreground colour, if the host set one
    pub foreground: Option<u8>,
}

impl FieldAttribute {
    /// An unprotected, alphanumeric, normal intensity attribute
    pub fn unprotected() -> FieldAttribute {
        FieldAttribute::default()
    }

    /// A protected attribute
    pub fn protected() -> FieldAttribute {
        FieldAttribute {
            protected: true,
            ..FieldAttribute::default()
        }
    }

    /// Decode an SF attribute byte. Only the low six bits are significant.
    pub fn from_byte(byte: u8) -> FieldAttribute {
        FieldAttribute {
            protected: byte & attribute::PROTECTED != 0,
            numeric: byte & attribute::NUMERIC != 0,
            display: DisplayMode::from_bits(byte),
            modified: byte & attribute::MDT != 0,
            highlighting: None,
            foreground: None,
        }
    }

    /// Encode as an attribute byte, mapped through the address alphabet so it is a graphic code.
    pub fn to_byte(self) -> u8 {
        let mut bits = self.display.bits();
        if self.protected {
            bits |= attribute::PROTECTED;
        }
        if self.numeric {
            bits |= attribute::NUMERIC;
        }
        if self.modified {
            bits |= attribute::MDT;
        }
        encode_six_bits(bits)
    }

    /// Apply one extended attribute type/value pair from SFE or MF.
    ///
    /// Returns false when the type is not one this engine tracks.
    pub fn apply_extended(&mut self, kind: u8, value: u8) -> bool {
        match kind {
            extended::FIELD => {
                let base = FieldAttribute::from_byte(value);
                self.protected = base.protected;
                self.numeric = base.numeric;
                self.display = base.display;
                self.modified = base.modified;
                true
            }
            extended::HIGHLIGHTING => {
                self.highlighting = Some(value);
                true
            }
            extended::FOREGROUND => {
                self.foreground = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Hidden fields are not rendered by `print_screen`
    pub fn is_hidden(&self) -> bool {
        self.display == DisplayMode::Hidden
    }
}

impl Display for FieldAttribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            if self.protected { 'P' } else { 'U' },
            if self.numeric { 'N' } else { 'A' },
            match self.display {
                DisplayMode::Normal => 'n',
                DisplayMode::Detectable => 'd',
                DisplayMode::Intensified => 'i',
                DisplayMode::Hidden => 'h',
            },
            if self.modified { 'M' } else { '-' },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_byte() {
        let attr = FieldAttribute::from_byte(0xF1);
        assert!(attr.protected);
        assert!(attr.numeric);
        assert!(attr.modified);
        assert_eq!(attr.display, DisplayMode::Normal);

        let attr = FieldAttribute::from_byte(0x4C);
        assert!(!attr.protected);
        assert_eq!(attr.display, DisplayMode::Hidden);
    }

    #[test]
    fn test_to_byte_is_graphic() {
        assert_eq!(FieldAttribute::unprotected().to_byte(), 0x40);
        assert_eq!(FieldAttribute::protected().to_byte(), 0x60);
        let attr = FieldAttribute {
            protected: true,
            display: DisplayMode::Intensified,
            modified: true,
            ..FieldAttribute::default()
        };
        assert_eq!(attr.to_byte(), 0xE9);
        assert_eq!(FieldAttribute::from_byte(attr.to_byte()), attr);
    }

    #[test]
    fn test_apply_extended() {
        let mut attr = FieldAttribute::default();
        assert!(attr.apply_extended(extended::FIELD, 0x20));
        assert!(attr.protected);
        assert!(attr.apply_extended(extended::FOREGROUND, 0xF2));
        assert_eq!(attr.foreground, Some(0xF2));
        assert!(!attr.apply_extended(extended::CHARSET, 0x00));
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldAttribute::protected().to_string(), "PAn-");
    }
}
