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

//! Pluggable transports for reaching the host

use crate::{Result, TerminalConfig};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

/// A byte stream a terminal session can run over
pub trait Transport: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> Transport for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

/// Boxed transport handed to a session
pub type BoxedTransport = Box<dyn Transport>;

/// Opens a transport for each connection attempt.
///
/// The terminal applies its connect timeout around [`TransportFactory::connect`].
#[async_trait]
pub trait TransportFactory: Send + Sync + 'static {
    /// Open a new transport to the configured host
    async fn connect(&self, config: &TerminalConfig) -> Result<BoxedTransport>;
}

/// Plain TCP transport
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpTransportFactory;

#[async_trait]
impl TransportFactory for TcpTransportFactory {
    async fn connect(&self, config: &TerminalConfig) -> Result<BoxedTransport> {
        let stream = TcpStream::connect(config.address()).await?;
        stream.set_nodelay(true)?;
        debug!("TCP connection to {} established", stream.peer_addr()?);
        Ok(Box::new(stream))
    }
}
