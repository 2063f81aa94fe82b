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

//! The ordered field list covering the whole screen buffer

use crate::attribute::FieldAttribute;
use crate::field::{CharsField, Field, StartOfField, TextField, ring_len};
use crate::result::{DatastreamError, DatastreamResult};
use tracing::trace;

/// Fields sorted by start position, partitioning a circular buffer with no gaps or overlaps.
///
/// A field that wraps past the last position is always the last entry. After every mutation,
/// adjacent content fields governed by the same marker are merged, so each marker is followed
/// by at most one content field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList {
    size: usize,
    fields: Vec<Field>,
}

impl FieldList {
    /// An unformatted buffer of `size` nulls
    pub fn new(size: usize) -> FieldList {
        let size = size.max(1);
        FieldList {
            size,
            fields: vec![Field::Chars(CharsField::new(0, size - 1, '\0'))],
        }
    }

    /// Number of buffer positions
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Index of the field covering `position`
    pub fn index_at(&self, position: usize) -> Option<usize> {
        if position >= self.size || self.fields.is_empty() {
            return None;
        }
        let after = self.fields.partition_point(|field| field.start() <= position);
        let index = if after == 0 {
            self.fields.len() - 1
        } else {
            after - 1
        };
        self.fields[index]
            .contains(position, self.size)
            .then_some(index)
    }

    /// Field covering `position`
    pub fn field_at(&self, position: usize) -> Option<&Field> {
        self.index_at(position).map(|index| &self.fields[index])
    }

    /// Marker located exactly at `position`
    pub fn start_of_field(&self, position: usize) -> Option<&StartOfField> {
        self.field_at(position)
            .and_then(Field::as_start_of_field)
            .filter(|sf| sf.position() == position)
    }

    pub(crate) fn start_of_field_mut(&mut self, position: usize) -> Option<&mut StartOfField> {
        let index = self.index_at(position)?;
        self.fields[index].as_start_of_field_mut()
    }

    /// All markers in buffer order
    pub fn markers(&self) -> impl Iterator<Item = &StartOfField> {
        self.fields.iter().filter_map(Field::as_start_of_field)
    }

    /// Whether the buffer holds any field marker
    pub fn is_formatted(&self) -> bool {
        self.fields.iter().any(Field::is_start_of_field)
    }

    /// Marker governing `field`; markers govern themselves
    pub fn owner<'a>(&'a self, field: &'a Field) -> Option<&'a StartOfField> {
        match field {
            Field::StartOfField(sf) => Some(sf),
            _ => field
                .owner()
                .and_then(|position| self.start_of_field(position)),
        }
    }

    /// Marker governing `position`
    pub fn owner_at(&self, position: usize) -> Option<&StartOfField> {
        self.field_at(position).and_then(|field| self.owner(field))
    }

    /// Operator input is accepted by content in an unprotected (or unformatted) region
    pub fn is_typeable(&self, field: &Field) -> bool {
        match field {
            Field::StartOfField(_) => false,
            _ => self.owner(field).is_none_or(|sf| !sf.is_protected()),
        }
    }

    /// The governing marker has its modified data tag set
    pub fn is_modified(&self, field: &Field) -> bool {
        self.owner(field).is_some_and(StartOfField::is_modified)
    }

    /// Displayed character at `position`; markers show none
    pub fn char_at(&self, position: usize) -> Option<char> {
        self.field_at(position)
            .and_then(|field| field.char_at(position, self.size))
    }

    /// Content field following the marker at list index `index`, if the region is not empty
    pub fn content_after(&self, index: usize) -> Option<&Field> {
        let marker = self.fields.get(index)?.as_start_of_field()?;
        let next = &self.fields[(index + 1) % self.fields.len()];
        (next.owner() == Some(marker.position())).then_some(next)
    }

    /// First content position of the nearest unprotected field whose marker is at or after `from`.
    ///
    /// Fields with no content positions are skipped.
    pub fn next_unprotected(&self, from: usize) -> Option<usize> {
        let size = self.size;
        self.markers()
            .filter(|sf| !sf.is_protected())
            .filter(|sf| self.start_of_field((sf.position() + 1) % size).is_none())
            .min_by_key(|sf| (sf.position() + size - from % size) % size)
            .map(|sf| (sf.position() + 1) % size)
    }

    /// Cut the circular range `[range_start, range_end]` out of every field it overlaps.
    ///
    /// Leaves the range uncovered; callers place a replacement and renormalize.
    pub(crate) fn split(&mut self, range_start: usize, range_end: usize) {
        let size = self.size;
        let mut remaining = Vec::with_capacity(self.fields.len() + 2);
        for field in self.fields.drain(..) {
            remaining.extend(field.split(range_start, range_end, size));
        }
        remaining.sort_by_key(Field::start);
        self.fields = remaining;
    }

    /// Replace whatever covers `field`'s range with `field`
    fn overwrite(&mut self, field: Field) -> DatastreamResult<()> {
        trace!("overwrite {}", field);
        self.split(field.start(), field.end());
        let index = self
            .fields
            .partition_point(|existing| existing.start() < field.start());
        self.fields.insert(index, field);
        self.normalize()
    }

    /// Place a marker at `position`, splitting whatever field it lands in
    pub fn insert_start_of_field(
        &mut self,
        position: usize,
        attribute: FieldAttribute,
    ) -> DatastreamResult<()> {
        self.overwrite(Field::StartOfField(StartOfField::new(position, attribute)))
    }

    /// Write `text` starting at `start`, wrapping past the end of the buffer
    pub fn write_text(&mut self, start: usize, text: &[char]) -> DatastreamResult<()> {
        for (index, chunk) in text.chunks(self.size).enumerate() {
            let chunk_start = (start + index * self.size) % self.size;
            let field = TextField::new(chunk_start, chunk.to_vec(), self.size);
            self.overwrite(Field::Text(field))?;
        }
        Ok(())
    }

    /// Fill `count` positions from `start` with `character`; `count` is clamped to the buffer
    pub fn write_chars(&mut self, start: usize, count: usize, character: char) -> DatastreamResult<()> {
        if count == 0 {
            return Ok(());
        }
        let count = count.min(self.size);
        let end = (start + count - 1) % self.size;
        self.overwrite(Field::Chars(CharsField::new(start, end, character)))
    }

    /// Null every unprotected content position in the `count` positions from `start`.
    ///
    /// Protected content and markers inside the range are skipped, so a range beginning inside
    /// a protected field resumes erasing at the next unprotected region.
    pub fn erase_unprotected(&mut self, start: usize, count: usize) -> DatastreamResult<()> {
        let count = count.min(self.size);
        let mut runs = Vec::new();
        let mut offset = 0;
        while offset < count {
            let position = (start + offset) % self.size;
            let index = self.index_at(position).ok_or_else(|| {
                DatastreamError::InvariantViolation(format!("no field covers position {position}"))
            })?;
            let field = &self.fields[index];
            let into_field = (position + self.size - field.start()) % self.size;
            let step = (field.len(self.size) - into_field).min(count - offset);
            if self.is_typeable(field) {
                runs.push((position, step));
            }
            offset += step;
        }
        for (position, step) in runs {
            self.write_chars(position, step, '\0')?;
        }
        Ok(())
    }

    /// Clear the modified data tag of every marker
    pub fn reset_modified(&mut self) {
        for field in &mut self.fields {
            if let Some(sf) = field.as_start_of_field_mut() {
                sf.set_modified(false);
            }
        }
    }

    /// Recompute owners and merge neighbouring content of the same region
    fn normalize(&mut self) -> DatastreamResult<()> {
        self.refresh_owners();

        let size = self.size;
        let mut merged: Vec<Field> = Vec::with_capacity(self.fields.len());
        for field in std::mem::take(&mut self.fields) {
            match merged.pop() {
                Some(previous) if mergeable(&previous, &field, size) => {
                    merged.push(previous.merge(field, size)?);
                }
                Some(previous) => {
                    merged.push(previous);
                    merged.push(field);
                }
                None => merged.push(field),
            }
        }

        // The region of the last marker may continue from position zero.
        if merged.len() > 1 && mergeable(&merged[merged.len() - 1], &merged[0], size) {
            let head = merged.remove(0);
            if let Some(tail) = merged.pop() {
                merged.push(tail.merge(head, size)?);
            }
        }

        self.fields = merged;
        Ok(())
    }

    fn refresh_owners(&mut self) {
        let mut owner = self
            .fields
            .iter()
            .rev()
            .find_map(Field::as_start_of_field)
            .map(StartOfField::position);
        for field in &mut self.fields {
            match field {
                Field::StartOfField(sf) => owner = Some(sf.position()),
                content => content.set_owner(owner),
            }
        }
    }

    /// Check that the fields exactly partition the buffer
    pub fn validate(&self) -> DatastreamResult<()> {
        let violation = |message: String| Err(DatastreamError::InvariantViolation(message));
        if self.fields.is_empty() {
            return violation("field list is empty".to_string());
        }
        let formatted = self.is_formatted();
        let mut covered = 0;
        for (index, field) in self.fields.iter().enumerate() {
            if field.start() >= self.size || field.end() >= self.size {
                return violation(format!("{field} lies outside a buffer of {}", self.size));
            }
            if field.len(self.size) != ring_len(field.start(), field.end(), self.size) {
                return violation(format!("{field} length disagrees with its range"));
            }
            if index > 0 && self.fields[index - 1].start() >= field.start() {
                return violation(format!("{field} is out of order"));
            }
            let next = &self.fields[(index + 1) % self.fields.len()];
            if (field.end() + 1) % self.size != next.start() {
                return violation(format!("{field} is not followed by {next}"));
            }
            if !field.is_start_of_field() {
                let owned = field.owner().is_some_and(|p| self.start_of_field(p).is_some());
                if owned != formatted {
                    return violation(format!("{field} has a stale owner"));
                }
            }
            covered += field.len(self.size);
        }
        if covered != self.size {
            return violation(format!("fields cover {covered} of {} positions", self.size));
        }
        Ok(())
    }
}

fn mergeable(first: &Field, second: &Field, size: usize) -> bool {
    !first.is_start_of_field()
        && !second.is_start_of_field()
        && first.owner() == second.owner()
        && (first.end() + 1) % size == second.start()
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
