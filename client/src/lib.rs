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

//! # TN3270 Client
//!
//! Async 3270 display station emulation over Telnet, with TN3270E negotiation, automatic
//! reconnection and a handler-based event API.
//!
//! ## Features
//!
//! - **Negotiation** - BINARY, EOR, TERMINAL-TYPE and TN3270E (device type and LU name)
//! - **Screen Model** - Host records are applied to a [`Screen`](tn3270_datastream::Screen)
//!   as they arrive, and Read commands are answered automatically
//! - **Operator Actions** - Type into unprotected fields, tab, and press attention keys
//! - **Reconnection** - Configurable retry count and delay
//!
//! ## Quick Start
//!
//! ```no_run
//! use tn3270_client::{Terminal, TerminalConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TerminalConfig::new("mainframe.example.com", 23).with_lu_name("LU01");
//!     let terminal = Terminal::new(config);
//!     terminal.connect().await?;
//!
//!     terminal.wait_for_keyboard(Duration::from_secs(10)).await?;
//!     terminal.type_text("LOGON APPLID(TSO)").await?;
//!     terminal.enter().await?;
//!
//!     terminal.wait_for_text("READY", Duration::from_secs(30)).await?;
//!     println!("{}", terminal.print_screen().await);
//!     terminal.disconnect().await;
//!     Ok(())
//! }
//! ```

#![warn(clippy::cargo, future_incompatible, rust_2018_idioms)]

mod codec;
mod config;
mod connection;
mod error;
mod handler;
mod terminal;
mod transport;

pub use codec::{Tn3270Codec, Tn3270Event, Tn3270eHeader, data_type};
pub use config::TerminalConfig;
pub use connection::SessionStatus;
pub use error::{ClientError, Result};
pub use handler::{NoopHandler, TerminalHandler};
pub use terminal::Terminal;
pub use transport::{BoxedTransport, TcpTransportFactory, Transport, TransportFactory};

pub use tn3270_datastream::{AidKey, Screen, ScreenModel};
