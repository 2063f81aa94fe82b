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

use crate::{CodecError, CodecResult, TelnetFrame, consts};
use std::fmt::Formatter;

/// Telnet options relevant to a TN3270 session.
///
/// Any other option code is carried as [`TelnetOption::Unknown`] and is always refused.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetOption {
    /// Transmit Binary (RFC 856)
    TransmitBinary,
    /// Echo (RFC 857)
    Echo,
    /// Suppress Go Ahead (RFC 858)
    SuppressGoAhead,
    /// Timing Mark (RFC 860)
    TimingMark,
    /// Terminal Type (RFC 1091)
    TerminalType,
    /// End of Record (RFC 885)
    EndOfRecord,
    /// Negotiate About Window Size (RFC 1073)
    NAWS,
    /// TN3270 Enhancements (RFC 2355)
    TN3270E,
    /// Any other option code
    Unknown(u8),
}

impl TelnetOption {
    /// Wire code of this option
    pub fn to_u8(&self) -> u8 {
        match self {
            TelnetOption::TransmitBinary => consts::option::BINARY,
            TelnetOption::Echo => consts::option::ECHO,
            TelnetOption::SuppressGoAhead => consts::option::SGA,
            TelnetOption::TimingMark => consts::option::TM,
            TelnetOption::TerminalType => consts::option::TTYPE,
            TelnetOption::EndOfRecord => consts::option::EOR,
            TelnetOption::NAWS => consts::option::NAWS,
            TelnetOption::TN3270E => consts::option::TN3270E,
            TelnetOption::Unknown(byte) => *byte,
        }
    }

    /// Option for a wire code
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            consts::option::BINARY => TelnetOption::TransmitBinary,
            consts::option::ECHO => TelnetOption::Echo,
            consts::option::SGA => TelnetOption::SuppressGoAhead,
            consts::option::TM => TelnetOption::TimingMark,
            consts::option::TTYPE => TelnetOption::TerminalType,
            consts::option::EOR => TelnetOption::EndOfRecord,
            consts::option::NAWS => TelnetOption::NAWS,
            consts::option::TN3270E => TelnetOption::TN3270E,
            byte => TelnetOption::Unknown(byte),
        }
    }

    /// Whether this option is offered locally by default
    pub fn supported_local(&self) -> bool {
        consts::option::SUPPORT[self.to_u8() as usize].0
    }

    /// Whether this option is accepted from the remote side by default
    pub fn supported_remote(&self) -> bool {
        consts::option::SUPPORT[self.to_u8() as usize].1
    }
}

impl std::fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetOption::TransmitBinary => write!(f, "TransmitBinary"),
            TelnetOption::Echo => write!(f, "Echo"),
            TelnetOption::SuppressGoAhead => write!(f, "SuppressGoAhead"),
            TelnetOption::TimingMark => write!(f, "TimingMark"),
            TelnetOption::TerminalType => write!(f, "TerminalType"),
            TelnetOption::EndOfRecord => write!(f, "EndOfRecord"),
            TelnetOption::NAWS => write!(f, "NAWS"),
            TelnetOption::TN3270E => write!(f, "TN3270E"),
            TelnetOption::Unknown(option) => write!(f, "Unknown({option})"),
        }
    }
}

impl From<u8> for TelnetOption {
    fn from(byte: u8) -> Self {
        Self::from_u8(byte)
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        option.to_u8()
    }
}

/// Option negotiation state for both sides of a connection, per RFC 1143 ("Q method").
#[derive(Clone, Debug)]
pub struct TelnetOptions {
    config: [SupportState; 256],
    state: [OptionState; 256],
}

impl TelnetOptions {
    /// Whether we are willing to enable `option` on our side
    pub fn is_supported_local(&self, option: TelnetOption) -> bool {
        self.config[option.to_u8() as usize].local
    }

    /// Whether we accept `option` being enabled by the peer
    pub fn is_supported_remote(&self, option: TelnetOption) -> bool {
        self.config[option.to_u8() as usize].remote
    }

    /// Change the support policy for an option.
    ///
    /// Only affects future negotiation; an option that is already enabled stays enabled.
    pub fn set_supported(&mut self, option: TelnetOption, local: bool, remote: bool) {
        self.config[option.to_u8() as usize] = SupportState { local, remote };
    }

    pub(crate) fn local_qstate(&self, option: TelnetOption) -> QState {
        self.state[option.to_u8() as usize].local
    }

    pub(crate) fn remote_qstate(&self, option: TelnetOption) -> QState {
        self.state[option.to_u8() as usize].remote
    }

    /// Whether `option` is enabled on our side
    pub fn local_enabled(&self, option: TelnetOption) -> bool {
        matches!(
            self.local_qstate(option),
            QState::Yes | QState::WantNo | QState::WantNoOpposite
        )
    }

    /// Whether `option` is enabled on the peer's side
    pub fn remote_enabled(&self, option: TelnetOption) -> bool {
        matches!(
            self.remote_qstate(option),
            QState::Yes | QState::WantNo | QState::WantNoOpposite
        )
    }

    /// Start enabling `option` locally, returning the `WILL` to send if any
    pub fn enable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        if !self.is_supported_local(option) {
            return None;
        }
        let slot = &mut self.state[option.to_u8() as usize].local;
        match *slot {
            QState::Yes | QState::WantYes | QState::WantYesOpposite => None,
            QState::No | QState::WantNoOpposite => {
                *slot = QState::WantYes;
                Some(TelnetFrame::Will(option))
            }
            QState::WantNo => {
                *slot = QState::WantYesOpposite;
                Some(TelnetFrame::Will(option))
            }
        }
    }

    /// Start disabling `option` locally, returning the `WONT` to send if any
    pub fn disable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let slot = &mut self.state[option.to_u8() as usize].local;
        match *slot {
            QState::No | QState::WantNo | QState::WantNoOpposite => None,
            QState::Yes | QState::WantYesOpposite => {
                *slot = QState::WantNo;
                Some(TelnetFrame::Wont(option))
            }
            QState::WantYes => {
                *slot = QState::WantNoOpposite;
                Some(TelnetFrame::Wont(option))
            }
        }
    }

    /// Start enabling `option` on the peer, returning the `DO` to send if any
    pub fn enable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        if !self.is_supported_remote(option) {
            return None;
        }
        let slot = &mut self.state[option.to_u8() as usize].remote;
        match *slot {
            QState::Yes | QState::WantYes | QState::WantYesOpposite => None,
            QState::No | QState::WantNoOpposite => {
                *slot = QState::WantYes;
                Some(TelnetFrame::Do(option))
            }
            QState::WantNo => {
                *slot = QState::WantYesOpposite;
                Some(TelnetFrame::Do(option))
            }
        }
    }

    /// Start disabling `option` on the peer, returning the `DONT` to send if any
    pub fn disable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let slot = &mut self.state[option.to_u8() as usize].remote;
        match *slot {
            QState::No | QState::WantNo | QState::WantNoOpposite => None,
            QState::Yes | QState::WantYesOpposite => {
                *slot = QState::WantNo;
                Some(TelnetFrame::Dont(option))
            }
            QState::WantYes => {
                *slot = QState::WantNoOpposite;
                Some(TelnetFrame::Dont(option))
            }
        }
    }

    /// Apply a negotiation frame received from the peer, returning our reply if one is due.
    pub fn handle_received(&mut self, frame: TelnetFrame) -> CodecResult<Option<TelnetFrame>> {
        match frame {
            TelnetFrame::Do(option) => Ok(self.recv_do(option)),
            TelnetFrame::Dont(option) => Ok(self.recv_dont(option)),
            TelnetFrame::Will(option) => Ok(self.recv_will(option)),
            TelnetFrame::Wont(option) => Ok(self.recv_wont(option)),
            frame => Err(CodecError::NegotiationError {
                reason: "Unsupported frame type".into(),
                frame_type: Some(format!("{frame:?}")),
            }),
        }
    }

    fn recv_will(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let supported = self.is_supported_remote(option);
        let slot = &mut self.state[option.to_u8() as usize].remote;
        match *slot {
            QState::No if supported => {
                *slot = QState::Yes;
                Some(TelnetFrame::Do(option))
            }
            QState::No => Some(TelnetFrame::Dont(option)),
            QState::Yes => None,
            // RFC 1143 treats WILL while awaiting WONT as a protocol error; settle on No.
            QState::WantNo => {
                *slot = QState::No;
                None
            }
            QState::WantNoOpposite | QState::WantYes => {
                *slot = QState::Yes;
                None
            }
            QState::WantYesOpposite => {
                *slot = QState::WantNo;
                Some(TelnetFrame::Dont(option))
            }
        }
    }

    fn recv_wont(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let slot = &mut self.state[option.to_u8() as usize].remote;
        match *slot {
            QState::No => None,
            QState::Yes => {
                *slot = QState::No;
                Some(TelnetFrame::Dont(option))
            }
            QState::WantNo | QState::WantYes | QState::WantYesOpposite => {
                *slot = QState::No;
                None
            }
            QState::WantNoOpposite => {
                *slot = QState::WantYes;
                Some(TelnetFrame::Do(option))
            }
        }
    }

    fn recv_do(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let supported = self.is_supported_local(option);
        let slot = &mut self.state[option.to_u8() as usize].local;
        match *slot {
            QState::No if supported => {
                *slot = QState::Yes;
                Some(TelnetFrame::Will(option))
            }
            QState::No => Some(TelnetFrame::Wont(option)),
            QState::Yes => None,
            QState::WantNo => {
                *slot = QState::No;
                None
            }
            QState::WantNoOpposite | QState::WantYes => {
                *slot = QState::Yes;
                None
            }
            QState::WantYesOpposite => {
                *slot = QState::WantNo;
                Some(TelnetFrame::Wont(option))
            }
        }
    }

    fn recv_dont(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let slot = &mut self.state[option.to_u8() as usize].local;
        match *slot {
            QState::No => None,
            QState::Yes => {
                *slot = QState::No;
                Some(TelnetFrame::Wont(option))
            }
            QState::WantNo | QState::WantYes | QState::WantYesOpposite => {
                *slot = QState::No;
                None
            }
            QState::WantNoOpposite => {
                *slot = QState::WantYes;
                Some(TelnetFrame::Will(option))
            }
        }
    }
}

impl Default for TelnetOptions {
    fn default() -> Self {
        TelnetOptions {
            config: core::array::from_fn(|idx| {
                let (local, remote) = consts::option::SUPPORT[idx];
                SupportState { local, remote }
            }),
            state: core::array::from_fn(|_| OptionState::default()),
        }
    }
}

/// Which end of the connection an option applies to
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetSide {
    /// Our side (DO/DONT received, WILL/WONT sent)
    Local,
    /// The peer's side (WILL/WONT received, DO/DONT sent)
    Remote,
}

impl std::fmt::Display for TelnetSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetSide::Local => write!(f, "Local"),
            TelnetSide::Remote => write!(f, "Remote"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct OptionState {
    local: QState,
    remote: QState,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub(crate) enum QState {
    #[default]
    No,
    WantNo,
    WantNoOpposite,
    Yes,
    WantYes,
    WantYesOpposite,
}

#[derive(Clone, Copy, Debug, Default)]
struct SupportState {
    local: bool,
    remote: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Option Code Tests
    // ============================================================================

    #[test]
    fn option_codes_map_both_ways() {
        for option in [
            TelnetOption::TransmitBinary,
            TelnetOption::TerminalType,
            TelnetOption::EndOfRecord,
            TelnetOption::TN3270E,
        ] {
            assert_eq!(TelnetOption::from_u8(option.to_u8()), option);
        }
        assert_eq!(TelnetOption::from_u8(99), TelnetOption::Unknown(99));
    }

    #[test]
    fn default_support_matches_3270_terminal() {
        let opts = TelnetOptions::default();
        assert!(opts.is_supported_local(TelnetOption::TerminalType));
        assert!(opts.is_supported_local(TelnetOption::TN3270E));
        assert!(opts.is_supported_remote(TelnetOption::EndOfRecord));
        assert!(!opts.is_supported_local(TelnetOption::Echo));
        assert!(!opts.is_supported_remote(TelnetOption::TerminalType));
    }

    // ============================================================================
    // Peer Initiated Negotiation
    // ============================================================================

    #[test]
    fn recv_do_supported_replies_will() {
        let mut opts = TelnetOptions::default();
        let reply = opts.handle_received(TelnetFrame::Do(TelnetOption::EndOfRecord));
        assert_eq!(reply, Ok(Some(TelnetFrame::Will(TelnetOption::EndOfRecord))));
        assert!(opts.local_enabled(TelnetOption::EndOfRecord));
    }

    #[test]
    fn recv_do_unsupported_replies_wont() {
        let mut opts = TelnetOptions::default();
        let reply = opts.handle_received(TelnetFrame::Do(TelnetOption::Echo));
        assert_eq!(reply, Ok(Some(TelnetFrame::Wont(TelnetOption::Echo))));
        assert!(!opts.local_enabled(TelnetOption::Echo));
    }

    #[test]
    fn recv_will_unsupported_replies_dont() {
        let mut opts = TelnetOptions::default();
        let reply = opts.handle_received(TelnetFrame::Will(TelnetOption::Unknown(200)));
        assert_eq!(reply, Ok(Some(TelnetFrame::Dont(TelnetOption::Unknown(200)))));
    }

    #[test]
    fn recv_do_when_enabled_is_silent() {
        let mut opts = TelnetOptions::default();
        opts.handle_received(TelnetFrame::Do(TelnetOption::TransmitBinary))
            .unwrap();
        let reply = opts.handle_received(TelnetFrame::Do(TelnetOption::TransmitBinary));
        assert_eq!(reply, Ok(None));
    }

    #[test]
    fn recv_dont_disables_and_acknowledges() {
        let mut opts = TelnetOptions::default();
        opts.handle_received(TelnetFrame::Do(TelnetOption::TN3270E))
            .unwrap();
        let reply = opts.handle_received(TelnetFrame::Dont(TelnetOption::TN3270E));
        assert_eq!(reply, Ok(Some(TelnetFrame::Wont(TelnetOption::TN3270E))));
        assert!(!opts.local_enabled(TelnetOption::TN3270E));
    }

    #[test]
    fn refused_tn3270e_after_policy_change() {
        let mut opts = TelnetOptions::default();
        opts.set_supported(TelnetOption::TN3270E, false, false);
        let reply = opts.handle_received(TelnetFrame::Do(TelnetOption::TN3270E));
        assert_eq!(reply, Ok(Some(TelnetFrame::Wont(TelnetOption::TN3270E))));
    }

    // ============================================================================
    // Locally Initiated Negotiation
    // ============================================================================

    #[test]
    fn enable_local_then_do_completes() {
        let mut opts = TelnetOptions::default();
        let opt = TelnetOption::TransmitBinary;
        assert_eq!(opts.enable_local(opt), Some(TelnetFrame::Will(opt)));
        assert_eq!(opts.local_qstate(opt), QState::WantYes);
        assert!(!opts.local_enabled(opt));
        assert_eq!(opts.handle_received(TelnetFrame::Do(opt)), Ok(None));
        assert_eq!(opts.local_qstate(opt), QState::Yes);
        assert_eq!(opts.enable_local(opt), None);
    }

    #[test]
    fn enable_remote_refused_returns_to_no() {
        let mut opts = TelnetOptions::default();
        let opt = TelnetOption::EndOfRecord;
        assert_eq!(opts.enable_remote(opt), Some(TelnetFrame::Do(opt)));
        assert_eq!(opts.handle_received(TelnetFrame::Wont(opt)), Ok(None));
        assert_eq!(opts.remote_qstate(opt), QState::No);
    }

    #[test]
    fn disable_local_while_enabling_is_opposite() {
        let mut opts = TelnetOptions::default();
        let opt = TelnetOption::TransmitBinary;
        opts.enable_local(opt);
        assert_eq!(opts.disable_local(opt), Some(TelnetFrame::Wont(opt)));
        assert_eq!(opts.local_qstate(opt), QState::WantNoOpposite);
        // The DO answering the original WILL still completes the enable.
        assert_eq!(opts.handle_received(TelnetFrame::Do(opt)), Ok(None));
        assert_eq!(opts.local_qstate(opt), QState::Yes);
    }

    #[test]
    fn enable_unsupported_is_noop() {
        let mut opts = TelnetOptions::default();
        assert_eq!(opts.enable_local(TelnetOption::Echo), None);
        assert_eq!(opts.enable_remote(TelnetOption::NAWS), None);
    }

    #[test]
    fn non_negotiation_frame_is_error() {
        let mut opts = TelnetOptions::default();
        assert!(opts.handle_received(TelnetFrame::NoOperation).is_err());
    }
}
