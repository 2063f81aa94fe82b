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

use crate::TelnetOption;
use crate::args::TelnetArgument;

/// Frames that can be written to a Telnet peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetFrame {
    /// Single data byte, escaped if it collides with IAC
    Data(u8),
    /// No Operation
    NoOperation,
    /// End of Record, terminating a 3270 record
    EndOfRecord,
    /// Ask the peer to enable an option
    Do(TelnetOption),
    /// Ask the peer to disable an option
    Dont(TelnetOption),
    /// Offer to enable an option locally
    Will(TelnetOption),
    /// Refuse or disable an option locally
    Wont(TelnetOption),
    /// Subnegotiation payload
    Subnegotiate(TelnetArgument),
}

impl std::fmt::Display for TelnetFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetFrame::Data(byte) => write!(f, "Data({byte:#04X})"),
            TelnetFrame::NoOperation => write!(f, "NOP"),
            TelnetFrame::EndOfRecord => write!(f, "EOR"),
            TelnetFrame::Do(option) => write!(f, "DO {option}"),
            TelnetFrame::Dont(option) => write!(f, "DONT {option}"),
            TelnetFrame::Will(option) => write!(f, "WILL {option}"),
            TelnetFrame::Wont(option) => write!(f, "WONT {option}"),
            TelnetFrame::Subnegotiate(argument) => write!(f, "SB {argument}"),
        }
    }
}
