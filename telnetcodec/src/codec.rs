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

use super::{CodecError, TelnetEvent, TelnetFrame, TelnetOption, consts};
use crate::args::TelnetArgument;
use crate::options::{QState, TelnetOptions, TelnetSide};
use bytes::{Buf, BufMut, BytesMut};
use std::collections::VecDeque;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

/// Byte level Telnet codec for a TN3270 session.
///
/// Decoding un-escapes `IAC IAC`, reports `IAC EOR` as [`TelnetEvent::EndOfRecord`], runs
/// option negotiation through the RFC 1143 state machine and parses subnegotiations. Replies
/// owed to the peer are queued and collected with [`TelnetCodec::take_responses`], since a
/// decoder cannot write to the stream it reads from.
pub struct TelnetCodec {
    decoder_buffer: BytesMut,
    decoder_state: DecoderState,
    options: TelnetOptions,
    responses: VecDeque<TelnetFrame>,
}

impl TelnetCodec {
    /// Creates a codec with the default 3270 option policy.
    ///
    /// # Example
    /// ```
    /// use tn3270_telnetcodec::TelnetCodec;
    ///
    /// let codec = TelnetCodec::new();
    /// ```
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }

    /// Checks if we support the given option locally
    pub fn is_supported_local(&self, option: TelnetOption) -> bool {
        self.options.is_supported_local(option)
    }

    /// Checks if we support the given option remotely
    pub fn is_supported_remote(&self, option: TelnetOption) -> bool {
        self.options.is_supported_remote(option)
    }

    /// Change whether an option may be enabled on each side.
    pub fn set_supported(&mut self, option: TelnetOption, local: bool, remote: bool) {
        self.options.set_supported(option, local, remote);
    }

    /// Checks if a specific Telnet option is enabled locally.
    pub fn is_enabled_local(&self, option: TelnetOption) -> bool {
        self.options.local_enabled(option)
    }

    /// Checks if a specific Telnet option is enabled on the remote side.
    ///
    /// # Example
    /// ```
    /// use tn3270_telnetcodec::{TelnetCodec, TelnetOption};
    ///
    /// let codec = TelnetCodec::new();
    /// assert!(!codec.is_enabled_remote(TelnetOption::EndOfRecord));
    /// ```
    pub fn is_enabled_remote(&self, option: TelnetOption) -> bool {
        self.options.remote_enabled(option)
    }

    /// Request to enable a Telnet option locally (we will send WILL).
    ///
    /// Returns the frame to send, or `None` when no negotiation is needed.
    pub fn enable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.enable_local(option)
    }

    /// Request to disable a Telnet option locally (we will send WONT).
    pub fn disable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.disable_local(option)
    }

    /// Request to enable a Telnet option on the remote side (we will send DO).
    pub fn enable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.enable_remote(option)
    }

    /// Request to disable a Telnet option on the remote side (we will send DONT).
    pub fn disable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.disable_remote(option)
    }

    /// Whether replies are waiting to be sent
    pub fn has_pending_responses(&self) -> bool {
        !self.responses.is_empty()
    }

    /// Drain the negotiation replies produced while decoding, oldest first.
    pub fn take_responses(&mut self) -> Vec<TelnetFrame> {
        self.responses.drain(..).collect()
    }

    /// Feed a received DO/DONT/WILL/WONT through the state machine.
    ///
    /// Queues any reply and returns the status event when the option flipped. A reply that leaves
    /// the state unchanged still yields [`TelnetEvent::NegotiationReply`], so the caller learns
    /// there is something to send.
    fn negotiate(&mut self, frame: TelnetFrame) -> Result<Option<TelnetEvent>, CodecError> {
        let (option, side) = match frame {
            TelnetFrame::Do(option) | TelnetFrame::Dont(option) => (option, TelnetSide::Local),
            TelnetFrame::Will(option) | TelnetFrame::Wont(option) => (option, TelnetSide::Remote),
            _ => (TelnetOption::Unknown(0), TelnetSide::Local),
        };
        let qstate = |options: &TelnetOptions| match side {
            TelnetSide::Local => options.local_qstate(option),
            TelnetSide::Remote => options.remote_qstate(option),
        };
        let was_yes = qstate(&self.options) == QState::Yes;
        trace!("Received {}", frame);
        let replied = match self.options.handle_received(frame)? {
            Some(reply) => {
                trace!("Queueing reply {}", reply);
                self.responses.push_back(reply);
                true
            }
            None => false,
        };
        let is_yes = qstate(&self.options) == QState::Yes;
        if is_yes != was_yes {
            return Ok(Some(TelnetEvent::OptionStatus(option, side, is_yes)));
        }
        if replied {
            return Ok(Some(TelnetEvent::NegotiationReply(option, side)));
        }
        Ok(None)
    }
}

impl Default for TelnetCodec {
    fn default() -> Self {
        TelnetCodec {
            decoder_buffer: BytesMut::new(),
            decoder_state: DecoderState::NormalData,
            options: TelnetOptions::default(),
            responses: VecDeque::new(),
        }
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetEvent;
    type Error = CodecError;

    /// Decodes the next [`TelnetEvent`] from `src`.
    ///
    /// The decoder consumes one byte at a time and keeps its position in a Telnet command across
    /// calls, so a command split over two reads is reassembled. Negotiations that neither change
    /// an option's state nor need a reply produce no event and decoding continues with the next
    /// byte.
    ///
    /// Returns `Ok(None)` once `src` is exhausted.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetEvent>, Self::Error> {
        while src.remaining() > 0 {
            let byte = src.get_u8();
            match (self.decoder_state, byte) {
                (DecoderState::NormalData, consts::IAC) => {
                    self.decoder_state = DecoderState::InterpretAsCommand;
                }
                (DecoderState::NormalData, _) => {
                    return Ok(Some(TelnetEvent::Data(byte)));
                }
                (DecoderState::InterpretAsCommand, consts::IAC) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Data(consts::IAC)));
                }
                (DecoderState::InterpretAsCommand, consts::EOR) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::EndOfRecord));
                }
                (DecoderState::InterpretAsCommand, consts::DO) => {
                    self.decoder_state = DecoderState::NegotiateDo;
                }
                (DecoderState::InterpretAsCommand, consts::DONT) => {
                    self.decoder_state = DecoderState::NegotiateDont;
                }
                (DecoderState::InterpretAsCommand, consts::WILL) => {
                    self.decoder_state = DecoderState::NegotiateWill;
                }
                (DecoderState::InterpretAsCommand, consts::WONT) => {
                    self.decoder_state = DecoderState::NegotiateWont;
                }
                (DecoderState::InterpretAsCommand, consts::SB) => {
                    self.decoder_state = DecoderState::Subnegotiate;
                }
                (
                    DecoderState::InterpretAsCommand,
                    consts::NOP
                    | consts::DM
                    | consts::BRK
                    | consts::IP
                    | consts::AO
                    | consts::AYT
                    | consts::EC
                    | consts::EL
                    | consts::GA,
                ) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Command(byte)));
                }
                (DecoderState::InterpretAsCommand, _) => {
                    warn!("Received Unknown Command {:#X}", byte);
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Command(byte)));
                }
                (DecoderState::NegotiateDo, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    if let Some(event) = self.negotiate(TelnetFrame::Do(byte.into()))? {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::NegotiateDont, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    if let Some(event) = self.negotiate(TelnetFrame::Dont(byte.into()))? {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::NegotiateWill, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    if let Some(event) = self.negotiate(TelnetFrame::Will(byte.into()))? {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::NegotiateWont, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    if let Some(event) = self.negotiate(TelnetFrame::Wont(byte.into()))? {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::Subnegotiate, _) => {
                    self.decoder_state = DecoderState::SubnegotiateArgument(byte);
                }
                (DecoderState::SubnegotiateArgument(option), consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateArgumentIAC(option);
                }
                (DecoderState::SubnegotiateArgument(_option), _) => {
                    self.decoder_buffer.put_u8(byte);
                }
                (DecoderState::SubnegotiateArgumentIAC(option), consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateArgument(option);
                    self.decoder_buffer.put_u8(consts::IAC);
                }
                (DecoderState::SubnegotiateArgumentIAC(option), consts::SE) => {
                    self.decoder_state = DecoderState::NormalData;
                    let payload = self.decoder_buffer.split();
                    let argument = TelnetArgument::parse(TelnetOption::from_u8(option), payload);
                    return Ok(Some(TelnetEvent::Subnegotiate(argument)));
                }
                (DecoderState::SubnegotiateArgumentIAC(_), _) => {
                    self.decoder_state = DecoderState::NormalData;
                    self.decoder_buffer.clear();
                    warn!(
                        "Received Unknown or invalid Command during Subnegotiation {:#X}. Aborting",
                        byte
                    );
                    return Ok(Some(TelnetEvent::Command(consts::NOP)));
                }
            }
        }
        Ok(None)
    }
}

impl Encoder<u8> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: u8, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(2);
        if item == consts::IAC {
            dst.put_u8(consts::IAC);
        }
        dst.put_u8(item);
        Ok(())
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a [`TelnetFrame`] into `dst`.
    ///
    /// Data bytes equal to IAC are doubled, negotiation frames become
    /// `IAC <verb> <option>`, and subnegotiations are wrapped in `IAC SB <option> ... IAC SE`
    /// with their payload escaped.
    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            TelnetFrame::Data(byte) => self.encode(byte, dst)?,
            TelnetFrame::NoOperation => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::NOP);
            }
            TelnetFrame::EndOfRecord => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::EOR);
            }
            TelnetFrame::Do(option) => put_negotiation(dst, consts::DO, option),
            TelnetFrame::Dont(option) => put_negotiation(dst, consts::DONT, option),
            TelnetFrame::Will(option) => put_negotiation(dst, consts::WILL, option),
            TelnetFrame::Wont(option) => put_negotiation(dst, consts::WONT, option),
            TelnetFrame::Subnegotiate(argument) => {
                dst.reserve(5 + argument.len());
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SB);
                dst.put_u8(argument.option().to_u8());
                argument.encode(dst)?;
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SE);
            }
        }
        Ok(())
    }
}

fn put_negotiation(dst: &mut BytesMut, verb: u8, option: TelnetOption) {
    dst.reserve(3);
    dst.put_u8(consts::IAC);
    dst.put_u8(verb);
    dst.put_u8(option.into());
}

#[derive(Clone, Copy, Debug)]
enum DecoderState {
    NormalData,
    InterpretAsCommand,
    NegotiateDo,
    NegotiateDont,
    NegotiateWill,
    NegotiateWont,
    Subnegotiate,
    SubnegotiateArgument(u8),
    SubnegotiateArgumentIAC(u8),
}
