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

//! # TN3270 Telnet Codec
//!
//! Telnet layer for a TN3270 terminal, implemented as a [`tokio_util::codec`] codec.
//!
//! A 3270 session runs over Telnet in binary mode with every 3270 record terminated by
//! `IAC EOR` (RFC 1576), optionally upgraded to TN3270E (RFC 2355). This crate handles the
//! Telnet side of that arrangement:
//!
//! - **Data transparency**: `IAC IAC` on the wire is delivered as a single `0xFF` data byte
//!   and a `0xFF` data byte is doubled on output.
//! - **Record boundaries**: `IAC EOR` is reported as [`TelnetEvent::EndOfRecord`]; the caller
//!   decides what a record is.
//! - **Option negotiation**: DO/DONT/WILL/WONT are run through the RFC 1143 Q-method state
//!   machine. Replies owed to the peer are queued on the codec and drained with
//!   [`TelnetCodec::take_responses`].
//! - **Subnegotiation**: TERMINAL-TYPE and TN3270E payloads are parsed into
//!   [`TelnetArgument`] values.
//!
//! ## Usage Example
//!
//! ```rust
//! use tn3270_telnetcodec::{TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption};
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut codec = TelnetCodec::new();
//! // Server: IAC DO EOR, then a record of two bytes.
//! let mut input = BytesMut::from(&b"\xFF\xFD\x19\xF5\xC3\xFF\xEF"[..]);
//! let mut record = Vec::new();
//! while let Some(event) = codec.decode(&mut input).unwrap() {
//!     match event {
//!         TelnetEvent::Data(byte) => record.push(byte),
//!         TelnetEvent::EndOfRecord => break,
//!         _ => {}
//!     }
//! }
//! assert_eq!(record, vec![0xF5, 0xC3]);
//! assert_eq!(codec.take_responses(), vec![TelnetFrame::Will(TelnetOption::EndOfRecord)]);
//! ```
//!
//! ## Thread Safety
//!
//! `TelnetCodec` keeps per-connection parser and negotiation state; each connection owns
//! its own instance.
//!
//! ## Related RFCs
//!
//! - RFC 854: Telnet Protocol Specification
//! - RFC 856: Telnet Binary Transmission
//! - RFC 885: Telnet End of Record Option
//! - RFC 1091: Telnet Terminal-Type Option
//! - RFC 1143: The Q Method of Implementing Telnet Option Negotiation
//! - RFC 1576: TN3270 Current Practices
//! - RFC 2355: TN3270 Enhancements

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

mod args;
mod codec;
pub mod consts;
mod event;
mod frame;
mod options;
mod result;

pub use self::args::{TelnetArgument, tn3270e, ttype};
pub use self::codec::TelnetCodec;
pub use self::event::TelnetEvent;
pub use self::frame::TelnetFrame;
pub use self::options::{TelnetOption, TelnetOptions, TelnetSide};
pub use self::result::{CodecError, CodecResult, SubnegotiationErrorKind};
