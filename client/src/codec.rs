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

//! Record framing on top of the Telnet codec

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, Bytes, BytesMut};
use tn3270_telnetcodec::{
    CodecError, TelnetArgument, TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption, TelnetSide,
};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace, warn};

/// TN3270E data types (RFC 2355 section 8.1)
pub mod data_type {
    /// 3270 data stream
    pub const DATA_3270: u8 = 0x00;
    /// SNA character stream
    pub const SCS_DATA: u8 = 0x01;
    /// Response to a request
    pub const RESPONSE: u8 = 0x02;
    /// BIND image
    pub const BIND_IMAGE: u8 = 0x03;
    /// UNBIND notification
    pub const UNBIND: u8 = 0x04;
    /// NVT data
    pub const NVT_DATA: u8 = 0x05;
    /// Request
    pub const REQUEST: u8 = 0x06;
    /// SSCP-LU data
    pub const SSCP_LU_DATA: u8 = 0x07;
    /// Print end of job
    pub const PRINT_EOJ: u8 = 0x08;
}

/// The five byte header leading every record of a TN3270E session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tn3270eHeader {
    /// What the record carries, see [`data_type`]
    pub data_type: u8,
    /// Request flag
    pub request_flag: u8,
    /// Response flag
    pub response_flag: u8,
    /// Sequence number
    pub sequence: u16,
}

impl Tn3270eHeader {
    /// Encoded size
    pub const LEN: usize = 5;

    /// A header for 3270 data
    pub fn data_3270(sequence: u16) -> Tn3270eHeader {
        Tn3270eHeader {
            sequence,
            ..Tn3270eHeader::default()
        }
    }

    /// Split a record into its header and body
    pub fn parse(record: &[u8]) -> Option<(Tn3270eHeader, &[u8])> {
        if record.len() < Self::LEN {
            return None;
        }
        let header = Tn3270eHeader {
            data_type: record[0],
            request_flag: record[1],
            response_flag: record[2],
            sequence: BigEndian::read_u16(&record[3..5]),
        };
        Some((header, &record[Self::LEN..]))
    }

    /// Encode the header
    pub fn to_bytes(self) -> [u8; 5] {
        let mut bytes = [self.data_type, self.request_flag, self.response_flag, 0, 0];
        BigEndian::write_u16(&mut bytes[3..], self.sequence);
        bytes
    }

    /// Whether the record carries a 3270 data stream
    pub fn is_3270_data(&self) -> bool {
        self.data_type == data_type::DATA_3270
    }
}

/// What the host sent, grouped into records
#[derive(Debug, Clone, PartialEq)]
pub enum Tn3270Event {
    /// One complete record, terminated on the wire by `IAC EOR`
    Record(Bytes),
    /// An option changed state
    OptionStatus(TelnetOption, TelnetSide, bool),
    /// A negotiation was answered without a state change; the reply is queued
    NegotiationReply(TelnetOption, TelnetSide),
    /// A subnegotiation arrived
    Subnegotiate(TelnetArgument),
    /// Any other Telnet command
    Command(u8),
}

/// Accumulates Telnet data into records and frames outbound records with `IAC EOR`.
pub struct Tn3270Codec<I> {
    inner: I,
    record: BytesMut,
    max_record: usize,
    discarding: bool,
}

impl<I> Tn3270Codec<I> {
    /// Wrap `codec`, dropping whole records longer than `max_record` bytes
    pub fn new(codec: I, max_record: usize) -> Self {
        Self {
            inner: codec,
            record: BytesMut::new(),
            max_record,
            discarding: false,
        }
    }

    /// Get a reference to the inner codec
    pub fn inner(&self) -> &I {
        &self.inner
    }

    /// Get a mutable reference to the inner codec
    pub fn inner_mut(&mut self) -> &mut I {
        &mut self.inner
    }

    /// Bytes of the record received so far
    pub fn pending(&self) -> usize {
        self.record.len()
    }
}

impl Tn3270Codec<TelnetCodec> {
    /// Drain the negotiation replies the Telnet layer has queued
    pub fn take_responses(&mut self) -> Vec<TelnetFrame> {
        self.inner.take_responses()
    }
}

impl Default for Tn3270Codec<TelnetCodec> {
    fn default() -> Self {
        Tn3270Codec::new(TelnetCodec::new(), 64 * 1024)
    }
}

impl<I> Decoder for Tn3270Codec<I>
where
    I: Decoder<Item = TelnetEvent, Error = CodecError>,
{
    type Item = Tn3270Event;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Tn3270Event>, CodecError> {
        while let Some(event) = self.inner.decode(src)? {
            match event {
                TelnetEvent::Data(_) if self.discarding => {}
                TelnetEvent::Data(byte) => {
                    if self.record.len() >= self.max_record {
                        warn!(
                            "Record exceeds {} bytes, discarding it up to the next EOR",
                            self.max_record
                        );
                        self.record.clear();
                        self.discarding = true;
                    } else {
                        self.record.put_u8(byte);
                    }
                }
                TelnetEvent::EndOfRecord if self.discarding => {
                    debug!("Oversized record dropped");
                    self.discarding = false;
                }
                TelnetEvent::EndOfRecord => {
                    trace!("Record of {} bytes", self.record.len());
                    return Ok(Some(Tn3270Event::Record(self.record.split().freeze())));
                }
                TelnetEvent::Command(code) => return Ok(Some(Tn3270Event::Command(code))),
                TelnetEvent::OptionStatus(option, side, enabled) => {
                    return Ok(Some(Tn3270Event::OptionStatus(option, side, enabled)));
                }
                TelnetEvent::NegotiationReply(option, side) => {
                    return Ok(Some(Tn3270Event::NegotiationReply(option, side)));
                }
                TelnetEvent::Subnegotiate(argument) => {
                    return Ok(Some(Tn3270Event::Subnegotiate(argument)));
                }
            }
        }
        Ok(None)
    }
}

impl<I> Encoder<Bytes> for Tn3270Codec<I>
where
    I: Encoder<TelnetFrame, Error = CodecError>,
{
    type Error = CodecError;

    /// Encode one record: data escaped, then `IAC EOR`
    fn encode(&mut self, record: Bytes, dst: &mut BytesMut) -> Result<(), CodecError> {
        dst.reserve(record.len() + 2);
        for byte in record {
            self.inner.encode(TelnetFrame::Data(byte), dst)?;
        }
        self.inner.encode(TelnetFrame::EndOfRecord, dst)
    }
}

impl<I> Encoder<TelnetFrame> for Tn3270Codec<I>
where
    I: Encoder<TelnetFrame, Error = CodecError>,
{
    type Error = CodecError;

    fn encode(&mut self, frame: TelnetFrame, dst: &mut BytesMut) -> Result<(), CodecError> {
        self.inner.encode(frame, dst)
    }
}
