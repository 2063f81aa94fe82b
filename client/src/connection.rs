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

//! One live session: the reader task and the shared record writer

use crate::codec::{Tn3270Codec, Tn3270Event, Tn3270eHeader};
use crate::transport::BoxedTransport;
use crate::{ClientError, Result, TerminalConfig, TerminalHandler};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use std::sync::Arc;
use tn3270_datastream::{Outbound3270Message, Screen};
use tn3270_telnetcodec::tn3270e::{Tn3270eMessage, reject_reason};
use tn3270_telnetcodec::ttype::TerminalTypeMessage;
use tn3270_telnetcodec::{TelnetArgument, TelnetCodec, TelnetFrame, TelnetOption, TelnetSide};
use tokio::io::{AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info, instrument, trace, warn};

type RecordReader = FramedRead<ReadHalf<BoxedTransport>, Tn3270Codec<TelnetCodec>>;
type RecordWriter = FramedWrite<WriteHalf<BoxedTransport>, Tn3270Codec<TelnetCodec>>;

/// Observable state of a terminal session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    /// A transport is open and its reader is running
    pub connected: bool,
    /// Operator input is inhibited
    pub keyboard_locked: bool,
    /// Host records applied since connecting
    pub updates: u64,
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus {
            connected: false,
            keyboard_locked: true,
            updates: 0,
        }
    }
}

/// State shared by a terminal and its reader task
pub(crate) struct Session {
    pub(crate) screen: RwLock<Screen>,
    pub(crate) status: watch::Sender<SessionStatus>,
    pub(crate) lu_name: RwLock<Option<String>>,
}

impl Session {
    pub(crate) fn new(screen: Screen) -> Session {
        let (status, _) = watch::channel(SessionStatus::default());
        Session {
            screen: RwLock::new(screen),
            status,
            lu_name: RwLock::new(None),
        }
    }
}

/// An open transport: reader task plus the writer both sides send through
pub(crate) struct Connection {
    writer: Arc<Mutex<RecordWriter>>,
    reader: JoinHandle<()>,
}

impl Connection {
    /// Split `transport` and spawn the reader task
    pub(crate) fn start(
        transport: BoxedTransport,
        config: &TerminalConfig,
        session: Arc<Session>,
        handler: Arc<dyn TerminalHandler>,
    ) -> Connection {
        let (read_half, write_half) = tokio::io::split(transport);

        let mut decoder = Tn3270Codec::default();
        if !config.tn3270e {
            decoder
                .inner_mut()
                .set_supported(TelnetOption::TN3270E, false, false);
        }
        let reader = FramedRead::with_capacity(read_half, decoder, config.read_buffer_size);
        let writer = Arc::new(Mutex::new(FramedWrite::new(
            write_half,
            Tn3270Codec::default(),
        )));

        counter!("tn3270.connections.total").increment(1);

        let task = ReaderTask {
            peer: config.address(),
            config: config.clone(),
            reader,
            writer: writer.clone(),
            session,
            handler,
            tn3270e: false,
        };
        Connection {
            writer,
            reader: tokio::spawn(task.run()),
        }
    }

    /// Send one record to the host
    pub(crate) async fn send_record(&self, record: Outbound3270Message) -> Result<()> {
        write_record(&self.writer, record).await
    }

    /// Stop the reader and shut the transport down
    pub(crate) async fn close(self) {
        self.reader.abort();
        let mut writer = self.writer.lock().await;
        if let Err(error) = writer.get_mut().shutdown().await {
            debug!("Transport shutdown failed: {}", error);
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn write_record(writer: &Mutex<RecordWriter>, record: Outbound3270Message) -> Result<()> {
    let length = record.len();
    writer
        .lock()
        .await
        .send(Bytes::from(record.into_bytes()))
        .await?;
    counter!("tn3270.records.sent").increment(1);
    counter!("tn3270.bytes.sent").increment(length as u64);
    trace!("Sent record of {} bytes", length);
    Ok(())
}

/// Tracks the active connection gauge for as long as a reader runs, aborted or not
struct ActiveConnection;

impl ActiveConnection {
    fn new() -> ActiveConnection {
        gauge!("tn3270.connections.active").increment(1.0);
        ActiveConnection
    }
}

impl Drop for ActiveConnection {
    fn drop(&mut self) {
        gauge!("tn3270.connections.active").decrement(1.0);
    }
}

struct ReaderTask {
    peer: String,
    config: TerminalConfig,
    reader: RecordReader,
    writer: Arc<Mutex<RecordWriter>>,
    session: Arc<Session>,
    handler: Arc<dyn TerminalHandler>,
    tn3270e: bool,
}

impl ReaderTask {
    #[instrument(skip_all, fields(peer = %self.peer))]
    async fn run(mut self) {
        let _active = ActiveConnection::new();
        if let Err(error) = self.read_loop().await {
            error!("Session failed: {}", error);
            self.handler.on_error(&error).await;
        }
        self.session.status.send_modify(|status| status.connected = false);
        info!("Session ended");
        self.handler.on_disconnect().await;
    }

    /// Apply host traffic strictly in arrival order until EOF or the first error
    async fn read_loop(&mut self) -> Result<()> {
        while let Some(event) = self.reader.next().await {
            match event? {
                Tn3270Event::Record(record) => self.handle_record(record).await?,
                Tn3270Event::OptionStatus(option, side, enabled) => {
                    self.handle_option(option, side, enabled).await;
                }
                Tn3270Event::NegotiationReply(option, side) => {
                    debug!("Answered {} {:?} without a state change", option, side);
                }
                Tn3270Event::Subnegotiate(argument) => self.handle_subnegotiation(argument).await?,
                Tn3270Event::Command(code) => trace!("Telnet command {:#04X}", code),
            }
            self.flush_responses().await?;
        }
        debug!("Host closed the connection");
        Ok(())
    }

    async fn flush_responses(&mut self) -> Result<()> {
        let frames = self.reader.decoder_mut().take_responses();
        if frames.is_empty() {
            return Ok(());
        }
        let mut writer = self.writer.lock().await;
        for frame in frames {
            trace!("Sending {}", frame);
            counter!("tn3270.negotiation.sent").increment(1);
            writer.feed(frame).await?;
        }
        SinkExt::<TelnetFrame>::flush(&mut *writer).await?;
        Ok(())
    }

    async fn send_frame(&mut self, frame: TelnetFrame) -> Result<()> {
        debug!("Sending {}", frame);
        counter!("tn3270.negotiation.sent").increment(1);
        self.writer.lock().await.send(frame).await?;
        Ok(())
    }

    async fn handle_option(&mut self, option: TelnetOption, side: TelnetSide, enabled: bool) {
        debug!("Option {} {:?} {}", option, side, if enabled { "enabled" } else { "disabled" });
        if option == TelnetOption::TN3270E && side == TelnetSide::Local {
            self.tn3270e = enabled;
            self.session.screen.write().await.set_tn3270e(enabled);
        }
    }

    async fn handle_subnegotiation(&mut self, argument: TelnetArgument) -> Result<()> {
        match argument {
            TelnetArgument::TerminalType(TerminalTypeMessage::Send) => {
                let device_type = self.config.device_type.clone();
                self.send_frame(TelnetFrame::Subnegotiate(TelnetArgument::TerminalType(
                    TerminalTypeMessage::Is(device_type),
                )))
                .await?;
            }
            TelnetArgument::Tn3270e(message) => self.handle_tn3270e(message).await?,
            other => warn!("Ignoring subnegotiation {}", other),
        }
        Ok(())
    }

    async fn handle_tn3270e(&mut self, message: Tn3270eMessage) -> Result<()> {
        let reply = match message {
            Tn3270eMessage::SendDeviceType => Tn3270eMessage::DeviceTypeRequest {
                device_type: self.config.device_type.clone(),
                connect: self.config.lu_name.clone(),
            },
            Tn3270eMessage::DeviceTypeIs {
                device_type,
                connect,
            } => {
                info!(
                    "Host accepted {} on LU {}",
                    device_type,
                    connect.as_deref().unwrap_or("-")
                );
                *self.session.lu_name.write().await = connect;
                Tn3270eMessage::FunctionsRequest(Vec::new())
            }
            Tn3270eMessage::DeviceTypeReject { reason } => {
                return Err(ClientError::Negotiation(format!(
                    "device type {} rejected: {}",
                    self.config.device_type,
                    reject_reason(reason)
                )));
            }
            Tn3270eMessage::FunctionsRequest(functions) => {
                debug!("Host proposed functions {:?}, accepting none", functions);
                Tn3270eMessage::FunctionsIs(Vec::new())
            }
            Tn3270eMessage::FunctionsIs(functions) => {
                debug!("Functions agreed: {:?}", functions);
                return Ok(());
            }
            Tn3270eMessage::DeviceTypeRequest { .. } => {
                warn!("Ignoring DEVICE-TYPE REQUEST from host");
                return Ok(());
            }
        };
        self.send_frame(TelnetFrame::Subnegotiate(TelnetArgument::Tn3270e(reply)))
            .await
    }

    async fn handle_record(&mut self, record: Bytes) -> Result<()> {
        counter!("tn3270.records.received").increment(1);
        counter!("tn3270.bytes.received").increment(record.len() as u64);

        let body: &[u8] = if self.tn3270e {
            match Tn3270eHeader::parse(&record) {
                Some((header, body)) if header.is_3270_data() => body,
                Some((header, _)) => {
                    debug!("Skipping TN3270E record of data type {:#04X}", header.data_type);
                    return Ok(());
                }
                None => {
                    warn!("TN3270E record of {} bytes has no header", record.len());
                    return Ok(());
                }
            }
        } else {
            &record
        };
        if body.is_empty() {
            trace!("Empty record");
            return Ok(());
        }

        let (reply, snapshot) = {
            let mut screen = self.session.screen.write().await;
            let reply = screen.process_bytes(body).inspect_err(|_| {
                counter!("tn3270.errors.protocol").increment(1);
            })?;
            (reply, screen.clone())
        };
        self.session.status.send_modify(|status| {
            status.keyboard_locked = snapshot.keyboard_locked();
            status.updates += 1;
        });
        if let Some(reply) = reply {
            write_record(&self.writer, reply).await?;
        }
        self.handler.on_screen_update(&snapshot).await;
        Ok(())
    }
}
