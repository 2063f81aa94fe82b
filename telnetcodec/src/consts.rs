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

//! Telnet protocol byte values (RFC 854, RFC 885, RFC 1091, RFC 2355)

/// End of Record
pub const EOR: u8 = 239;
/// Subnegotiation End
pub const SE: u8 = 240;
/// No Operation
pub const NOP: u8 = 241;
/// Data Mark
pub const DM: u8 = 242;
/// Break
pub const BRK: u8 = 243;
/// Interrupt Process
pub const IP: u8 = 244;
/// Abort Output
pub const AO: u8 = 245;
/// Are You There
pub const AYT: u8 = 246;
/// Erase Character
pub const EC: u8 = 247;
/// Erase Line
pub const EL: u8 = 248;
/// Go Ahead
pub const GA: u8 = 249;
/// Subnegotiation Begin
pub const SB: u8 = 250;
/// Will
pub const WILL: u8 = 251;
/// Won't
pub const WONT: u8 = 252;
/// Do
pub const DO: u8 = 253;
/// Don't
pub const DONT: u8 = 254;
/// Interpret As Command
pub const IAC: u8 = 255;

/// Telnet option codes used by a 3270 session
pub mod option {
    /// Transmit Binary (RFC 856)
    pub const BINARY: u8 = 0;
    /// Echo (RFC 857)
    pub const ECHO: u8 = 1;
    /// Suppress Go Ahead (RFC 858)
    pub const SGA: u8 = 3;
    /// Timing Mark (RFC 860)
    pub const TM: u8 = 6;
    /// Terminal Type (RFC 1091)
    pub const TTYPE: u8 = 24;
    /// End of Record (RFC 885)
    pub const EOR: u8 = 25;
    /// Negotiate About Window Size (RFC 1073)
    pub const NAWS: u8 = 31;
    /// TN3270 Enhancements (RFC 2355)
    pub const TN3270E: u8 = 40;

    /// Default (local, remote) support for every option code.
    ///
    /// A 3270 terminal sends binary data framed by EOR and reports its terminal type, so those
    /// are the only options offered or accepted out of the box.
    pub const SUPPORT: [(bool, bool); 256] = {
        let mut table = [(false, false); 256];
        table[BINARY as usize] = (true, true);
        table[TTYPE as usize] = (true, false);
        table[EOR as usize] = (true, true);
        table[TN3270E as usize] = (true, false);
        table
    };
}

/// TERMINAL-TYPE subnegotiation verbs (RFC 1091)
pub mod ttype {
    /// Terminal type follows
    pub const IS: u8 = 0;
    /// Request terminal type
    pub const SEND: u8 = 1;
}

/// TN3270E subnegotiation codes (RFC 2355)
pub mod tn3270e {
    /// ASSOCIATE
    pub const ASSOCIATE: u8 = 0x00;
    /// CONNECT
    pub const CONNECT: u8 = 0x01;
    /// DEVICE-TYPE
    pub const DEVICE_TYPE: u8 = 0x02;
    /// FUNCTIONS
    pub const FUNCTIONS: u8 = 0x03;
    /// IS
    pub const IS: u8 = 0x04;
    /// REASON
    pub const REASON: u8 = 0x05;
    /// REJECT
    pub const REJECT: u8 = 0x06;
    /// REQUEST
    pub const REQUEST: u8 = 0x07;
    /// SEND
    pub const SEND: u8 = 0x08;

    /// BIND-IMAGE function
    pub const FN_BIND_IMAGE: u8 = 0x00;
    /// DATA-STREAM-CTL function
    pub const FN_DATA_STREAM_CTL: u8 = 0x01;
    /// RESPONSES function
    pub const FN_RESPONSES: u8 = 0x02;
    /// SCS-CTL-CODES function
    pub const FN_SCS_CTL_CODES: u8 = 0x03;
    /// SYSREQ function
    pub const FN_SYSREQ: u8 = 0x04;
}
