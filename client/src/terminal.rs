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

//! The TN3270 terminal: connect, operate, observe

use crate::connection::{Connection, Session, SessionStatus};
use crate::transport::{TcpTransportFactory, TransportFactory};
use crate::{ClientError, NoopHandler, Result, TerminalConfig, TerminalHandler};
use std::sync::Arc;
use std::time::Duration;
use tn3270_datastream::{AidKey, Outbound3270Message, Screen};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{error, info, instrument, warn};

/// A 3270 display station attached to one host.
///
/// The terminal owns a [`Screen`] that the session's reader task updates as host records
/// arrive. Operator actions (`type_text`, `tab`, `enter`, ...) act on that screen and send
/// the resulting inbound records to the host.
pub struct Terminal {
    config: TerminalConfig,
    handler: Arc<dyn TerminalHandler>,
    factory: Arc<dyn TransportFactory>,
    session: Arc<Session>,
    connection: Mutex<Option<Connection>>,
}

impl Terminal {
    /// Terminal for `config` connecting over TCP with no event handler
    pub fn new(config: TerminalConfig) -> Terminal {
        let session = Arc::new(Session::new(new_screen(&config)));
        Terminal {
            config,
            handler: Arc::new(NoopHandler),
            factory: Arc::new(TcpTransportFactory),
            session,
            connection: Mutex::new(None),
        }
    }

    pub fn with_handler(mut self, handler: Arc<dyn TerminalHandler>) -> Terminal {
        self.handler = handler;
        self
    }

    /// Replace how transports are opened
    pub fn with_transport(mut self, factory: Arc<dyn TransportFactory>) -> Terminal {
        self.factory = factory;
        self
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    // ===== Connection Management =====

    /// Open a session with the host.
    ///
    /// Failed attempts are retried after `reconnect_delay` when `auto_reconnect` is set, until
    /// `max_reconnect_attempts` is reached or the handler declines.
    #[instrument(skip_all, fields(host = %self.config.address()))]
    pub async fn connect(&self) -> Result<()> {
        let mut connection = self.connection.lock().await;
        if connection.is_some() && self.is_connected() {
            return Err(ClientError::AlreadyConnected);
        }
        if let Some(stale) = connection.take() {
            stale.close().await;
        }

        let mut attempts = 0;
        loop {
            match self.open().await {
                Ok(opened) => {
                    *connection = Some(opened);
                    return Ok(());
                }
                Err(err) => {
                    error!("Connection failed: {}", err);
                    if !self.config.auto_reconnect || !err.is_recoverable() {
                        return Err(err);
                    }
                    attempts += 1;
                    if self
                        .config
                        .max_reconnect_attempts
                        .is_some_and(|max| attempts >= max)
                    {
                        return Err(ClientError::ReconnectionFailed(attempts));
                    }
                    if !self.handler.on_reconnect_attempt(attempts).await {
                        return Err(ClientError::ReconnectionFailed(attempts));
                    }
                    info!(
                        "Reconnecting in {:?} (attempt {})",
                        self.config.reconnect_delay, attempts
                    );
                    tokio::time::sleep(self.config.reconnect_delay).await;
                }
            }
        }
    }

    async fn open(&self) -> Result<Connection> {
        info!("Connecting to {}...", self.config.address());
        let transport = match timeout(self.config.connect_timeout, self.factory.connect(&self.config)).await {
            Ok(transport) => transport?,
            Err(_) => return Err(ClientError::ConnectionTimeout),
        };

        *self.session.screen.write().await = new_screen(&self.config);
        self.session.lu_name.write().await.take();
        self.session.status.send_replace(SessionStatus {
            connected: true,
            ..SessionStatus::default()
        });

        let connection = Connection::start(
            transport,
            &self.config,
            self.session.clone(),
            self.handler.clone(),
        );
        info!("Connected to {}", self.config.address());
        self.handler.on_connect(&self.config).await;
        Ok(connection)
    }

    /// Close the session. Does nothing when not connected.
    pub async fn disconnect(&self) {
        let Some(connection) = self.connection.lock().await.take() else {
            return;
        };
        let was_connected = self.is_connected();
        connection.close().await;
        self.session
            .status
            .send_modify(|status| status.connected = false);
        if was_connected {
            info!("Disconnected from {}", self.config.address());
            self.handler.on_disconnect().await;
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.status.borrow().connected
    }

    /// Current session status
    pub fn status(&self) -> SessionStatus {
        *self.session.status.borrow()
    }

    /// LU name the host assigned during TN3270E negotiation
    pub async fn lu_name(&self) -> Option<String> {
        self.session.lu_name.read().await.clone()
    }

    async fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }
        if self.config.auto_reconnect {
            warn!("Session lost, reconnecting");
            self.connect().await
        } else {
            Err(ClientError::NotConnected)
        }
    }

    // ===== Waiting =====

    /// Wait until the host unlocks the keyboard
    pub async fn wait_for_keyboard(&self, duration: Duration) -> Result<()> {
        let mut status = self.session.status.subscribe();
        let unlocked = timeout(
            duration,
            status.wait_for(|status| !status.connected || !status.keyboard_locked),
        )
        .await;
        match unlocked {
            Err(_) => Err(ClientError::KeyboardLocked),
            Ok(Err(_)) => Err(ClientError::NotConnected),
            Ok(Ok(current)) if current.connected => Ok(()),
            Ok(Ok(_)) => Err(ClientError::NotConnected),
        }
    }

    /// Wait until some field on the screen contains `text`
    pub async fn wait_for_text(&self, text: &str, duration: Duration) -> Result<()> {
        let mut status = self.session.status.subscribe();
        let search = async {
            loop {
                let connected = status.borrow_and_update().connected;
                if self.session.screen.read().await.is_text_in_field(text) {
                    return Ok(());
                }
                if !connected || status.changed().await.is_err() {
                    return Err(ClientError::NotConnected);
                }
            }
        };
        match timeout(duration, search).await {
            Ok(found) => found,
            Err(_) => Err(ClientError::TextNotFound(text.to_string())),
        }
    }

    // ===== Operator Actions =====

    /// Press an attention key and send the resulting record
    pub async fn send_aid(&self, key: AidKey) -> Result<()> {
        self.ensure_connected().await?;
        if self.status().keyboard_locked {
            return Err(ClientError::KeyboardLocked);
        }
        let record = self.session.screen.write().await.aid(key);
        self.session
            .status
            .send_modify(|status| status.keyboard_locked = true);
        self.send_record(record).await
    }

    pub async fn enter(&self) -> Result<()> {
        self.send_aid(AidKey::Enter).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.send_aid(AidKey::Clear).await
    }

    /// Press PF1 through PF24
    pub async fn pf(&self, number: u8) -> Result<()> {
        let key = AidKey::pf(number).ok_or_else(|| ClientError::InvalidKey(format!("PF{}", number)))?;
        self.send_aid(key).await
    }

    /// Press PA1 through PA3
    pub async fn pa(&self, number: u8) -> Result<()> {
        let key = AidKey::pa(number).ok_or_else(|| ClientError::InvalidKey(format!("PA{}", number)))?;
        self.send_aid(key).await
    }

    /// Type `text` at the cursor
    pub async fn type_text(&self, text: &str) -> Result<()> {
        if self.status().keyboard_locked {
            return Err(ClientError::KeyboardLocked);
        }
        self.session.screen.write().await.type_text(text)?;
        Ok(())
    }

    /// Move the cursor to the next unprotected field
    pub async fn tab(&self) {
        self.session.screen.write().await.tab();
    }

    pub async fn erase_eof(&self) -> Result<()> {
        self.session.screen.write().await.erase_eof()?;
        Ok(())
    }

    pub async fn set_cursor(&self, row: usize, col: usize) -> Result<()> {
        self.session.screen.write().await.set_cursor_row_col(row, col)?;
        Ok(())
    }

    /// Snapshot of the screen
    pub async fn screen(&self) -> Screen {
        self.session.screen.read().await.clone()
    }

    /// Screen contents as text, one line per row
    pub async fn print_screen(&self) -> String {
        self.session.screen.read().await.print_screen()
    }

    async fn send_record(&self, record: Outbound3270Message) -> Result<()> {
        match self.connection.lock().await.as_ref() {
            Some(connection) => connection.send_record(record).await,
            None => Err(ClientError::NotConnected),
        }
    }
}

/// Fresh screen for a new session: the default 24x80 primary size plus the configured
/// alternate size, in plain TN3270 mode until TN3270E is negotiated.
fn new_screen(config: &TerminalConfig) -> Screen {
    let (width, height) = config.screen_size();
    let mut screen = Screen::new(80, 24).with_alternate_size(width, height);
    screen.set_tn3270e(false);
    screen
}
