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

use super::TelnetOption;
use crate::args::TelnetArgument;
use crate::options::TelnetSide;

/// Events produced by [`TelnetCodec`](crate::TelnetCodec) while decoding.
#[derive(Clone, Debug, PartialEq)]
pub enum TelnetEvent {
    /// Payload byte, already un-escaped
    Data(u8),
    /// `IAC EOR`, terminating the current record
    EndOfRecord,
    /// Any other two byte command (NOP, AYT, BRK, ...), carried as its raw code
    Command(u8),
    /// Indicate a completed Negotiation
    /// Parameters: (option, side, enabled)
    OptionStatus(TelnetOption, TelnetSide, bool),
    /// A negotiation was answered without changing the option's state, typically a refusal.
    /// The reply is waiting in [`TelnetCodec::take_responses`](crate::TelnetCodec::take_responses).
    NegotiationReply(TelnetOption, TelnetSide),
    /// Subnegotiation Payload
    Subnegotiate(TelnetArgument),
}
