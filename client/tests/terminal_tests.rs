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

//! End-to-end terminal sessions against scripted hosts

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tn3270_client::{
    BoxedTransport, ClientError, Result, Terminal, TerminalConfig, TerminalHandler,
    TransportFactory,
};
use tn3270_datastream::Screen;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};
use tokio::net::TcpListener;

// ==========================================================================
// Helpers
// ==========================================================================

/// Hands out one end of an in-memory pipe
struct DuplexFactory {
    stream: Mutex<Option<DuplexStream>>,
}

#[async_trait]
impl TransportFactory for DuplexFactory {
    async fn connect(&self, _config: &TerminalConfig) -> Result<BoxedTransport> {
        let stream = self.stream.lock().unwrap().take();
        match stream {
            Some(stream) => Ok(Box::new(stream)),
            None => Err(ClientError::ConnectionRefused),
        }
    }
}

/// Refuses every connection and counts the attempts
#[derive(Default)]
struct RefusingFactory {
    attempts: AtomicUsize,
}

#[async_trait]
impl TransportFactory for RefusingFactory {
    async fn connect(&self, _config: &TerminalConfig) -> Result<BoxedTransport> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ClientError::ConnectionRefused)
    }
}

/// Never completes a connection
struct HangingFactory;

#[async_trait]
impl TransportFactory for HangingFactory {
    async fn connect(&self, _config: &TerminalConfig) -> Result<BoxedTransport> {
        std::future::pending().await
    }
}

#[derive(Default)]
struct CountingHandler {
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    updates: AtomicUsize,
    allow_reconnect: bool,
}

#[async_trait]
impl TerminalHandler for CountingHandler {
    async fn on_connect(&self, _config: &TerminalConfig) {
        self.connects.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_screen_update(&self, _screen: &Screen) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_reconnect_attempt(&self, _attempt: usize) -> bool {
        self.allow_reconnect
    }
}

fn duplex_terminal(config: TerminalConfig) -> (Terminal, DuplexStream) {
    let (client, host) = duplex(8192);
    let factory = DuplexFactory {
        stream: Mutex::new(Some(client)),
    };
    (Terminal::new(config).with_transport(Arc::new(factory)), host)
}

/// EraseWrite with keyboard restore: protected "NAME" at 1..5, an unprotected field from 6,
/// cursor inserted at 6
const LOGON_SCREEN: &[u8] = &[
    0xF5, 0xC2, 0x11, 0x40, 0x40, 0x1D, 0x60, 0xD5, 0xC1, 0xD4, 0xC5, 0x1D, 0x40, 0x13, 0xFF,
    0xEF,
];

async fn expect_bytes(host: &mut DuplexStream, expected: &[u8]) {
    let mut received = vec![0; expected.len()];
    tokio::time::timeout(Duration::from_secs(5), host.read_exact(&mut received))
        .await
        .expect("host read timed out")
        .unwrap();
    assert_eq!(received, expected);
}

const WAIT: Duration = Duration::from_secs(5);

// ==========================================================================
// TN3270 Sessions
// ==========================================================================

#[tokio::test]
async fn test_type_and_enter_sends_read_modified() {
    let (terminal, mut host) = duplex_terminal(TerminalConfig::default().with_tn3270e(false));
    terminal.connect().await.unwrap();
    assert!(terminal.is_connected());

    host.write_all(LOGON_SCREEN).await.unwrap();
    terminal.wait_for_keyboard(WAIT).await.unwrap();
    assert_eq!(terminal.screen().await.cursor(), 6);

    terminal.type_text("ROB").await.unwrap();
    terminal.enter().await.unwrap();
    assert!(terminal.status().keyboard_locked);

    expect_bytes(
        &mut host,
        &[
            0x7D, 0x40, 0xC9, 0x11, 0x40, 0xC6, 0xD9, 0xD6, 0xC2, 0xFF, 0xEF,
        ],
    )
    .await;
}

#[tokio::test]
async fn test_host_read_modified_is_answered() {
    let (terminal, mut host) = duplex_terminal(TerminalConfig::default().with_tn3270e(false));
    terminal.connect().await.unwrap();

    host.write_all(LOGON_SCREEN).await.unwrap();
    host.write_all(&[0xF6, 0xFF, 0xEF]).await.unwrap();

    expect_bytes(&mut host, &[0x60, 0x40, 0xC6, 0xFF, 0xEF]).await;
}

#[tokio::test]
async fn test_keyboard_starts_locked() {
    let (terminal, _host) = duplex_terminal(TerminalConfig::default().with_tn3270e(false));
    terminal.connect().await.unwrap();

    assert!(matches!(
        terminal.type_text("X").await,
        Err(ClientError::KeyboardLocked)
    ));
    assert!(matches!(
        terminal.enter().await,
        Err(ClientError::KeyboardLocked)
    ));
}

#[tokio::test]
async fn test_screen_updates_reach_handler() {
    let handler = Arc::new(CountingHandler::default());
    let (terminal, mut host) = duplex_terminal(TerminalConfig::default().with_tn3270e(false));
    let terminal = terminal.with_handler(handler.clone());
    terminal.connect().await.unwrap();
    assert_eq!(handler.connects.load(Ordering::SeqCst), 1);

    host.write_all(LOGON_SCREEN).await.unwrap();
    terminal.wait_for_text("NAME", WAIT).await.unwrap();
    terminal.wait_for_keyboard(WAIT).await.unwrap();
    assert_eq!(handler.updates.load(Ordering::SeqCst), 1);
    assert_eq!(terminal.status().updates, 1);
    assert!(terminal.print_screen().await.starts_with(" NAME "));
}

// ==========================================================================
// TN3270E Negotiation
// ==========================================================================

#[tokio::test]
async fn test_tn3270e_negotiation_assigns_lu_and_frames_replies() {
    let config = TerminalConfig::default().with_lu_name("LU01");
    let (terminal, mut host) = duplex_terminal(config);
    terminal.connect().await.unwrap();

    // DO TN3270E
    host.write_all(&[0xFF, 0xFD, 0x28]).await.unwrap();
    expect_bytes(&mut host, &[0xFF, 0xFB, 0x28]).await;

    // SEND DEVICE-TYPE
    host.write_all(&[0xFF, 0xFA, 0x28, 0x08, 0x02, 0xFF, 0xF0])
        .await
        .unwrap();
    let mut request = vec![0xFF, 0xFA, 0x28, 0x02, 0x07];
    request.extend_from_slice(b"IBM-3278-2-E");
    request.push(0x01);
    request.extend_from_slice(b"LU01");
    request.extend_from_slice(&[0xFF, 0xF0]);
    expect_bytes(&mut host, &request).await;

    // DEVICE-TYPE IS
    let mut accepted = vec![0xFF, 0xFA, 0x28, 0x02, 0x04];
    accepted.extend_from_slice(b"IBM-3278-2-E");
    accepted.push(0x01);
    accepted.extend_from_slice(b"LU01");
    accepted.extend_from_slice(&[0xFF, 0xF0]);
    host.write_all(&accepted).await.unwrap();
    expect_bytes(&mut host, &[0xFF, 0xFA, 0x28, 0x03, 0x07, 0xFF, 0xF0]).await;
    assert_eq!(terminal.lu_name().await.as_deref(), Some("LU01"));

    // FUNCTIONS IS, then a 3270-DATA record
    host.write_all(&[0xFF, 0xFA, 0x28, 0x03, 0x04, 0xFF, 0xF0])
        .await
        .unwrap();
    host.write_all(&[0x00, 0x00, 0x00, 0x00, 0x00]).await.unwrap();
    host.write_all(LOGON_SCREEN).await.unwrap();

    terminal.wait_for_keyboard(WAIT).await.unwrap();
    assert!(terminal.screen().await.is_tn3270e());
    terminal.enter().await.unwrap();
    expect_bytes(
        &mut host,
        &[0x00, 0x00, 0x00, 0x00, 0x00, 0x7D, 0x40, 0xC6, 0xFF, 0xEF],
    )
    .await;
}

#[tokio::test]
async fn test_tn3270e_refused_when_disabled() {
    let (terminal, mut host) = duplex_terminal(TerminalConfig::default().with_tn3270e(false));
    terminal.connect().await.unwrap();

    host.write_all(&[0xFF, 0xFD, 0x28]).await.unwrap();
    expect_bytes(&mut host, &[0xFF, 0xFC, 0x28]).await;
}

#[tokio::test]
async fn test_unsupported_option_is_refused_promptly() {
    let (terminal, mut host) = duplex_terminal(TerminalConfig::default());
    terminal.connect().await.unwrap();

    // DO NAWS, then WILL ECHO
    host.write_all(&[0xFF, 0xFD, 0x1F]).await.unwrap();
    expect_bytes(&mut host, &[0xFF, 0xFC, 0x1F]).await;
    host.write_all(&[0xFF, 0xFB, 0x01]).await.unwrap();
    expect_bytes(&mut host, &[0xFF, 0xFE, 0x01]).await;
    assert!(terminal.is_connected());
}

// ==========================================================================
// Connection Lifecycle
// ==========================================================================

#[tokio::test]
async fn test_tcp_session() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let host = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(LOGON_SCREEN).await.unwrap();
        let mut rest = Vec::new();
        socket.read_to_end(&mut rest).await.unwrap();
    });

    let terminal = Terminal::new(TerminalConfig::new("127.0.0.1", port).with_tn3270e(false));
    terminal.connect().await.unwrap();
    terminal.wait_for_text("NAME", WAIT).await.unwrap();
    terminal.disconnect().await;
    assert!(!terminal.is_connected());

    tokio::time::timeout(WAIT, host).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_host_close_ends_session() {
    let handler = Arc::new(CountingHandler::default());
    let (terminal, host) = duplex_terminal(TerminalConfig::default().with_tn3270e(false));
    let terminal = terminal.with_handler(handler.clone());
    terminal.connect().await.unwrap();

    drop(host);
    assert!(matches!(
        terminal.wait_for_keyboard(WAIT).await,
        Err(ClientError::NotConnected)
    ));
    assert!(!terminal.is_connected());
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let handler = Arc::new(CountingHandler::default());
    let (terminal, _host) = duplex_terminal(TerminalConfig::default().with_tn3270e(false));
    let terminal = terminal.with_handler(handler.clone());
    terminal.connect().await.unwrap();

    terminal.disconnect().await;
    terminal.disconnect().await;
    assert_eq!(handler.disconnects.load(Ordering::SeqCst), 1);
    assert!(matches!(
        terminal.enter().await,
        Err(ClientError::NotConnected)
    ));
}

#[tokio::test]
async fn test_already_connected() {
    let (terminal, _host) = duplex_terminal(TerminalConfig::default().with_tn3270e(false));
    terminal.connect().await.unwrap();
    assert!(matches!(
        terminal.connect().await,
        Err(ClientError::AlreadyConnected)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_connect_timeout() {
    let config = TerminalConfig::default().with_connect_timeout(Duration::from_millis(50));
    let terminal = Terminal::new(config).with_transport(Arc::new(HangingFactory));
    assert!(matches!(
        terminal.connect().await,
        Err(ClientError::ConnectionTimeout)
    ));
    assert!(!terminal.is_connected());
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_gives_up_after_max_attempts() {
    let factory = Arc::new(RefusingFactory::default());
    let handler = Arc::new(CountingHandler {
        allow_reconnect: true,
        ..CountingHandler::default()
    });
    let config = TerminalConfig::default()
        .with_auto_reconnect(true)
        .with_reconnect_delay(Duration::from_millis(10))
        .with_max_reconnect_attempts(Some(3));
    let terminal = Terminal::new(config)
        .with_transport(factory.clone())
        .with_handler(handler);

    assert!(matches!(
        terminal.connect().await,
        Err(ClientError::ReconnectionFailed(3))
    ));
    assert_eq!(factory.attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_handler_can_stop_reconnecting() {
    let factory = Arc::new(RefusingFactory::default());
    let config = TerminalConfig::default()
        .with_auto_reconnect(true)
        .with_reconnect_delay(Duration::from_millis(10));
    let terminal = Terminal::new(config)
        .with_transport(factory.clone())
        .with_handler(Arc::new(CountingHandler::default()));

    assert!(matches!(
        terminal.connect().await,
        Err(ClientError::ReconnectionFailed(1))
    ));
    assert_eq!(factory.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_function_key() {
    let terminal = Terminal::new(TerminalConfig::default());
    assert!(matches!(
        terminal.pf(25).await,
        Err(ClientError::InvalidKey(_))
    ));
    assert!(matches!(terminal.pa(0).await, Err(ClientError::InvalidKey(_))));
}
