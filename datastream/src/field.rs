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

//! Field variants that partition the screen buffer

use crate::attribute::FieldAttribute;
use crate::result::{DatastreamError, DatastreamResult};
use std::fmt::{Display, Formatter};

/// Number of positions in the circular range `[start, end]` of a buffer of `size` positions.
pub fn ring_len(start: usize, end: usize, size: usize) -> usize {
    if end >= start {
        end - start + 1
    } else {
        size - start + end + 1
    }
}

/// A one-position marker holding the attribute of the field that follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOfField {
    position: usize,
    attribute: FieldAttribute,
}

impl StartOfField {
    /// Create a marker at `position`
    pub fn new(position: usize, attribute: FieldAttribute) -> StartOfField {
        StartOfField {
            position,
            attribute,
        }
    }

    /// Buffer position of the marker
    pub fn position(&self) -> usize {
        self.position
    }

    /// Attribute governing the field
    pub fn attribute(&self) -> &FieldAttribute {
        &self.attribute
    }

    /// Mutable attribute, for MF and MDT updates
    pub fn attribute_mut(&mut self) -> &mut FieldAttribute {
        &mut self.attribute
    }

    pub fn is_protected(&self) -> bool {
        self.attribute.protected
    }

    pub fn is_numeric(&self) -> bool {
        self.attribute.numeric
    }

    pub fn is_modified(&self) -> bool {
        self.attribute.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.attribute.modified = modified;
    }
}

/// A run of one repeated character, typically nulls or padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsField {
    start: usize,
    end: usize,
    character: char,
    owner: Option<usize>,
}

impl CharsField {
    /// Create a run covering the circular range `[start, end]`
    pub fn new(start: usize, end: usize, character: char) -> CharsField {
        CharsField {
            start,
            end,
            character,
            owner: None,
        }
    }

    /// The repeated character
    pub fn character(&self) -> char {
        self.character
    }
}

/// A run of literal characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    start: usize,
    end: usize,
    text: Vec<char>,
    owner: Option<usize>,
}

impl TextField {
    /// Create a run at `start` in a buffer of `size` positions.
    ///
    /// `text` must hold between one and `size` characters.
    pub fn new(start: usize, text: Vec<char>, size: usize) -> TextField {
        let end = (start + text.len().max(1) - 1) % size;
        TextField {
            start,
            end,
            text,
            owner: None,
        }
    }

    /// The characters of the run
    pub fn text(&self) -> &[char] {
        &self.text
    }
}

/// One segment of the screen buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Attribute marker
    StartOfField(StartOfField),
    /// Repeated character run
    Chars(CharsField),
    /// Literal character run
    Text(TextField),
}

impl Field {
    /// Variant name, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Field::StartOfField(_) => "StartOfField",
            Field::Chars(_) => "Chars",
            Field::Text(_) => "Text",
        }
    }

    /// First buffer position covered
    pub fn start(&self) -> usize {
        match self {
            Field::StartOfField(sf) => sf.position,
            Field::Chars(chars) => chars.start,
            Field::Text(text) => text.start,
        }
    }

    /// Last buffer position covered; less than `start` when the field wraps
    pub fn end(&self) -> usize {
        match self {
            Field::StartOfField(sf) => sf.position,
            Field::Chars(chars) => chars.end,
            Field::Text(text) => text.end,
        }
    }

    /// Number of buffer positions covered
    pub fn len(&self, size: usize) -> usize {
        match self {
            Field::StartOfField(_) => 1,
            Field::Chars(chars) => ring_len(chars.start, chars.end, size),
            Field::Text(text) => text.text.len(),
        }
    }

    /// Position of the marker governing this content, if the screen is formatted
    pub fn owner(&self) -> Option<usize> {
        match self {
            Field::StartOfField(_) => None,
            Field::Chars(chars) => chars.owner,
            Field::Text(text) => text.owner,
        }
    }

    pub(crate) fn set_owner(&mut self, owner: Option<usize>) {
        match self {
            Field::StartOfField(_) => {}
            Field::Chars(chars) => chars.owner = owner,
            Field::Text(text) => text.owner = owner,
        }
    }

    pub fn is_start_of_field(&self) -> bool {
        matches!(self, Field::StartOfField(_))
    }

    pub fn as_start_of_field(&self) -> Option<&StartOfField> {
        match self {
            Field::StartOfField(sf) => Some(sf),
            _ => None,
        }
    }

    pub(crate) fn as_start_of_field_mut(&mut self) -> Option<&mut StartOfField> {
        match self {
            Field::StartOfField(sf) => Some(sf),
            _ => None,
        }
    }

    /// Whether `position` falls inside this field
    pub fn contains(&self, position: usize, size: usize) -> bool {
        (position + size - self.start()) % size < self.len(size)
    }

    /// Character displayed at `position`; markers have none
    pub fn char_at(&self, position: usize, size: usize) -> Option<char> {
        if !self.contains(position, size) {
            return None;
        }
        let offset = (position + size - self.start()) % size;
        match self {
            Field::StartOfField(_) => None,
            Field::Chars(chars) => Some(chars.character),
            Field::Text(text) => text.text.get(offset).copied(),
        }
    }

    /// All characters of the field in buffer order, starting at `start`
    pub fn chars(&self, size: usize) -> Vec<char> {
        match self {
            Field::StartOfField(_) => Vec::new(),
            Field::Chars(chars) => vec![chars.character; self.len(size)],
            Field::Text(text) => text.text.clone(),
        }
    }

    /// Field content as a string, nulls included
    pub fn text(&self, size: usize) -> String {
        self.chars(size).into_iter().collect()
    }

    /// Whether the field content contains `needle`
    pub fn contains_text(&self, needle: &str, size: usize) -> bool {
        match self {
            Field::StartOfField(_) => false,
            Field::Chars(chars) => {
                let len = self.len(size);
                let count = needle.chars().count();
                count <= len && needle.chars().all(|ch| ch == chars.character)
            }
            Field::Text(_) => self.text(size).contains(needle),
        }
    }

    /// Remove the circular range `[range_start, range_end]` from this field and return what is left.
    ///
    /// No pieces means the field lay entirely inside the range. Two pieces mean the range was
    /// strictly interior: the prefix keeps the original start and the suffix begins right after
    /// the range. A single piece is the field shortened at its tail or moved forward at its head.
    pub fn split(&self, range_start: usize, range_end: usize, size: usize) -> Vec<Field> {
        let length = self.len(size);
        let range_len = ring_len(range_start, range_end, size);
        let offset = (range_start + size - self.start()) % size;

        let mut removed = Vec::with_capacity(2);
        if offset + range_len > size {
            removed.push((0, (offset + range_len - 1 - size).min(length - 1)));
        }
        if offset < length {
            removed.push((offset, (offset + range_len - 1).min(length - 1)));
        }

        let mut pieces = Vec::with_capacity(2);
        let mut next = 0;
        for (first, last) in removed {
            if first > next {
                pieces.push((next, first - 1));
            }
            next = next.max(last + 1);
        }
        if next < length {
            pieces.push((next, length - 1));
        }

        pieces
            .into_iter()
            .map(|(first, last)| self.slice(first, last, size))
            .collect()
    }

    /// Sub-field covering relative offsets `[first, last]`
    fn slice(&self, first: usize, last: usize, size: usize) -> Field {
        let start = (self.start() + first) % size;
        let end = (self.start() + last) % size;
        match self {
            Field::StartOfField(sf) => Field::StartOfField(sf.clone()),
            Field::Chars(chars) => Field::Chars(CharsField {
                start,
                end,
                character: chars.character,
                owner: chars.owner,
            }),
            Field::Text(text) => Field::Text(TextField {
                start,
                end,
                text: text.text[first..=last].to_vec(),
                owner: text.owner,
            }),
        }
    }

    /// Combine this field with the field that immediately follows it.
    ///
    /// Two runs of the same character stay a run; every other content pairing becomes text.
    /// Markers cannot be merged.
    pub fn merge(self, next: Field, size: usize) -> DatastreamResult<Field> {
        match (self, next) {
            (Field::Chars(first), Field::Chars(second)) if first.character == second.character => {
                Ok(Field::Chars(CharsField {
                    end: second.end,
                    ..first
                }))
            }
            (first @ (Field::Chars(_) | Field::Text(_)), second @ (Field::Chars(_) | Field::Text(_))) => {
                let mut text = first.chars(size);
                text.extend(second.chars(size));
                Ok(Field::Text(TextField {
                    start: first.start(),
                    end: second.end(),
                    text,
                    owner: first.owner(),
                }))
            }
            (first, second) => Err(DatastreamError::UnsupportedOperation {
                operation: "merge",
                left: first.kind(),
                right: second.kind(),
            }),
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::StartOfField(sf) => write!(f, "SF({}, {})", sf.position, sf.attribute),
            Field::Chars(chars) => write!(
                f,
                "Chars({}-{}, {:?})",
                chars.start, chars.end, chars.character
            ),
            Field::Text(text) => write!(
                f,
                "Text({}-{}, {:?})",
                text.start,
                text.end,
                text.text.iter().collect::<String>()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: usize = 20;

    fn text(start: usize, content: &str) -> Field {
        Field::Text(TextField::new(start, content.chars().collect(), SIZE))
    }

    fn chars(start: usize, end: usize, character: char) -> Field {
        Field::Chars(CharsField::new(start, end, character))
    }

    fn sf(position: usize) -> Field {
        Field::StartOfField(StartOfField::new(position, FieldAttribute::default()))
    }

    // ============================================================================
    // Geometry
    // ============================================================================

    #[test]
    fn test_ring_len() {
        assert_eq!(ring_len(3, 3, SIZE), 1);
        assert_eq!(ring_len(0, 19, SIZE), 20);
        assert_eq!(ring_len(15, 4, SIZE), 10);
        assert_eq!(ring_len(5, 4, SIZE), 20);
    }

    #[test]
    fn test_wrapping_text_geometry() {
        let field = text(15, "123456789");
        assert_eq!(field.end(), 3);
        assert_eq!(field.len(SIZE), 9);
        assert!(field.contains(19, SIZE));
        assert!(field.contains(0, SIZE));
        assert!(!field.contains(4, SIZE));
        assert_eq!(field.char_at(0, SIZE), Some('6'));
        assert_eq!(field.char_at(14, SIZE), None);
    }

    // ============================================================================
    // Split
    // ============================================================================

    #[test]
    fn test_split_contained_removes_field() {
        assert!(text(5, "abc").split(4, 9, SIZE).is_empty());
        assert!(sf(7).split(7, 7, SIZE).is_empty());
    }

    #[test]
    fn test_split_interior_keeps_prefix_and_suffix() {
        let pieces = text(2, "abcdefgh").split(4, 6, SIZE);
        assert_eq!(pieces, vec![text(2, "ab"), text(7, "fgh")]);
    }

    #[test]
    fn test_split_tail_shrinks_end() {
        let pieces = chars(0, 9, '\0').split(8, 12, SIZE);
        assert_eq!(pieces, vec![chars(0, 7, '\0')]);
    }

    #[test]
    fn test_split_head_moves_start() {
        let pieces = text(5, "hello").split(3, 6, SIZE);
        assert_eq!(pieces, vec![text(7, "llo")]);
    }

    #[test]
    fn test_split_disjoint_keeps_field() {
        assert_eq!(text(5, "hello").split(12, 14, SIZE), vec![text(5, "hello")]);
        assert_eq!(sf(3).split(4, 2, SIZE), vec![sf(3)]);
        assert!(sf(3).split(2, 4, SIZE).is_empty());
    }

    #[test]
    fn test_split_wrapping_field_across_boundary() {
        // Field covers 15..=3, range covers 18..=1
        let pieces = text(15, "123456789").split(18, 1, SIZE);
        assert_eq!(pieces, vec![text(15, "123"), text(2, "89")]);
    }

    #[test]
    fn test_split_range_wrapping_over_field_head() {
        // Field covers 0..=5, range covers 17..=2
        let pieces = chars(0, 5, 'x').split(17, 2, SIZE);
        assert_eq!(pieces, vec![chars(3, 5, 'x')]);
    }

    // ============================================================================
    // Merge
    // ============================================================================

    #[test]
    fn test_merge_same_character_runs() {
        let merged = chars(0, 4, ' ').merge(chars(5, 9, ' '), SIZE).unwrap();
        assert_eq!(merged, chars(0, 9, ' '));
    }

    #[test]
    fn test_merge_dissimilar_runs_become_text() {
        let merged = chars(0, 1, ' ').merge(chars(2, 3, 'x'), SIZE).unwrap();
        assert_eq!(merged, text(0, "  xx"));
    }

    #[test]
    fn test_merge_text_with_chars() {
        let merged = text(3, "ab").merge(chars(5, 6, '\0'), SIZE).unwrap();
        assert_eq!(merged, text(3, "ab\0\0"));
        let merged = chars(18, 19, '-').merge(text(0, "ok"), SIZE).unwrap();
        assert_eq!(merged, text(18, "--ok"));
        assert_eq!(merged.end(), 1);
    }

    #[test]
    fn test_merge_marker_is_unsupported() {
        let err = sf(2).merge(text(3, "a"), SIZE).unwrap_err();
        assert!(err.is_logic_error());
        assert_eq!(
            err.to_string(),
            "Unsupported operation: cannot merge StartOfField with Text"
        );
    }

    // ============================================================================
    // Content
    // ============================================================================

    #[test]
    fn test_contains_text() {
        assert!(text(0, "LOGON APPLID").contains_text("APPLID", SIZE));
        assert!(!text(0, "LOGON").contains_text("APPLID", SIZE));
        assert!(chars(0, 4, '*').contains_text("***", SIZE));
        assert!(!chars(0, 1, '*').contains_text("***", SIZE));
        assert!(!sf(0).contains_text("", SIZE));
    }

    #[test]
    fn test_display() {
        assert_eq!(text(1, "hi").to_string(), "Text(1-2, \"hi\")");
        assert_eq!(chars(0, 3, ' ').to_string(), "Chars(0-3, ' ')");
        assert_eq!(sf(4).to_string(), "SF(4, UAn-)");
    }
}
