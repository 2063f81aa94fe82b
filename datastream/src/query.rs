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

//! Query Reply structured fields sent in answer to a Read Partition Query

use crate::consts::{aid, sfid};
use byteorder::{BigEndian, ByteOrder};

/// One query reply a display terminal advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryReply {
    /// Lists the replies that follow
    Summary,
    /// Screen geometry and addressing capability
    UsableArea { width: usize, height: usize },
    /// Default and alternate partition sizes
    ImplicitPartition { width: usize, height: usize },
}

impl QueryReply {
    /// The query code identifying this reply
    pub fn code(self) -> u8 {
        match self {
            QueryReply::Summary => sfid::QR_SUMMARY,
            QueryReply::UsableArea { .. } => sfid::QR_USABLE_AREA,
            QueryReply::ImplicitPartition { .. } => sfid::QR_IMPLICIT_PARTITION,
        }
    }

    fn body(self) -> Vec<u8> {
        match self {
            QueryReply::Summary => vec![
                sfid::QR_SUMMARY,
                sfid::QR_USABLE_AREA,
                sfid::QR_IMPLICIT_PARTITION,
            ],
            QueryReply::UsableArea { width, height } => {
                let mut body = vec![0x01, 0x00];
                push_u16(&mut body, width);
                push_u16(&mut body, height);
                // Units in millimetres, pixel pitch and cell size of a 3278
                body.extend_from_slice(&[0x01, 0x00, 0x0A, 0x02, 0xE5, 0x00, 0x02, 0x00, 0x6F, 0x09, 0x0C]);
                push_u16(&mut body, width * height);
                body
            }
            QueryReply::ImplicitPartition { width, height } => {
                let mut body = vec![0x00, 0x00, 0x0B, 0x01, 0x00];
                push_u16(&mut body, width);
                push_u16(&mut body, height);
                push_u16(&mut body, width);
                push_u16(&mut body, height);
                body
            }
        }
    }

    /// Append this reply as a length-prefixed structured field
    pub fn encode_into(self, out: &mut Vec<u8>) {
        let body = self.body();
        push_u16(out, body.len() + 4);
        out.push(sfid::QUERY_REPLY);
        out.push(self.code());
        out.extend_from_slice(&body);
    }
}

/// The inbound Structured Field AID followed by every reply a display of `width` x `height` sends
pub fn query_replies(width: usize, height: usize) -> Vec<u8> {
    let replies = [
        QueryReply::Summary,
        QueryReply::UsableArea { width, height },
        QueryReply::ImplicitPartition { width, height },
    ];
    let mut out = vec![aid::STRUCTURED_FIELD];
    for reply in replies {
        reply.encode_into(&mut out);
    }
    out
}

fn push_u16(out: &mut Vec<u8>, value: usize) {
    let mut bytes = [0u8; 2];
    BigEndian::write_u16(&mut bytes, value.min(u16::MAX as usize) as u16);
    out.extend_from_slice(&bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(reply: QueryReply) -> Vec<u8> {
        let mut out = Vec::new();
        reply.encode_into(&mut out);
        out
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            encoded(QueryReply::Summary),
            vec![0x00, 0x07, 0x81, 0x80, 0x80, 0x81, 0xA6]
        );
    }

    #[test]
    fn test_usable_area_model_2() {
        let bytes = encoded(QueryReply::UsableArea {
            width: 80,
            height: 24,
        });
        assert_eq!(bytes.len(), 0x17);
        assert_eq!(&bytes[..4], &[0x00, 0x17, 0x81, 0x81]);
        assert_eq!(&bytes[6..10], &[0x00, 80, 0x00, 24]);
        assert_eq!(&bytes[21..], &[0x07, 0x80]);
    }

    #[test]
    fn test_implicit_partition() {
        let bytes = encoded(QueryReply::ImplicitPartition {
            width: 132,
            height: 27,
        });
        assert_eq!(
            bytes,
            vec![
                0x00, 0x11, 0x81, 0xA6, 0x00, 0x00, 0x0B, 0x01, 0x00, 0x00, 132, 0x00, 27, 0x00,
                132, 0x00, 27
            ]
        );
    }

    #[test]
    fn test_query_replies_lead_with_structured_field_aid() {
        let bytes = query_replies(80, 24);
        assert_eq!(bytes[0], 0x88);
        assert_eq!(bytes.len(), 1 + 0x07 + 0x17 + 0x11);
    }
}
