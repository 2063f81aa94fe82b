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

//! Terminal event handler trait

use crate::{ClientError, TerminalConfig};
use async_trait::async_trait;
use tn3270_datastream::Screen;

/// Terminal event handler trait
///
/// Implement this trait to observe a terminal session. All methods are async and have default
/// implementations that do nothing.
///
/// # Example
///
/// ```no_run
/// use tn3270_client::TerminalHandler;
/// use tn3270_datastream::Screen;
/// use async_trait::async_trait;
///
/// struct PrintHandler;
///
/// #[async_trait]
/// impl TerminalHandler for PrintHandler {
///     async fn on_screen_update(&self, screen: &Screen) {
///         println!("{}", screen.print_screen());
///     }
/// }
/// ```
#[async_trait]
pub trait TerminalHandler: Send + Sync + 'static {
    /// Called once the transport is open, before negotiation
    async fn on_connect(&self, _config: &TerminalConfig) {}

    /// Called when the session ends, whichever side closed it
    async fn on_disconnect(&self) {}

    /// Called after every host record has been applied to the screen
    async fn on_screen_update(&self, _screen: &Screen) {}

    /// Called when the session fails; the connection is closed afterwards
    async fn on_error(&self, _error: &ClientError) {}

    /// Called before a reconnection attempt
    ///
    /// Return false to cancel the attempt.
    async fn on_reconnect_attempt(&self, _attempt: usize) -> bool {
        true
    }
}

/// Handler that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

#[async_trait]
impl TerminalHandler for NoopHandler {}
