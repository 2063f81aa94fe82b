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

//! # Interactive TN3270 Client
//!
//! Connects to a host, prints every screen it sends and turns stdin lines into operator
//! input.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example tn3270_client -- mainframe.example.com 23 [LU]
//! ```
//!
//! ## Commands
//!
//! - any text - Type it at the cursor and press ENTER
//! - `/pfN`, `/paN` - Press a program function or attention key
//! - `/clear` - Press CLEAR
//! - `/tab` - Move to the next input field
//! - `/quit` - Disconnect and exit

use async_trait::async_trait;
use std::sync::Arc;
use tn3270_client::{ClientError, Screen, Terminal, TerminalConfig, TerminalHandler};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

struct ScreenPrinter;

#[async_trait]
impl TerminalHandler for ScreenPrinter {
    async fn on_screen_update(&self, screen: &Screen) {
        println!("{}", "-".repeat(screen.width()));
        println!("{}", screen.print_screen());
    }

    async fn on_error(&self, error: &ClientError) {
        error!("Session error: {}", error);
    }
}

async fn run_command(terminal: &Terminal, line: &str) -> Result<bool, ClientError> {
    match line {
        "/quit" => return Ok(false),
        "/clear" => terminal.clear().await?,
        "/tab" => terminal.tab().await,
        command if command.starts_with("/pf") || command.starts_with("/pa") => {
            let number = command[3..]
                .parse()
                .map_err(|_| ClientError::InvalidKey(command.to_string()))?;
            if command.starts_with("/pf") {
                terminal.pf(number).await?;
            } else {
                terminal.pa(number).await?;
            }
        }
        text => {
            terminal.type_text(text).await?;
            terminal.enter().await?;
        }
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let host = args.get(1).map(|s| s.as_str()).unwrap_or("localhost");
    let port: u16 = args.get(2).and_then(|p| p.parse().ok()).unwrap_or(23);

    let mut config = TerminalConfig::new(host, port).with_auto_reconnect(true);
    if let Some(lu) = args.get(3) {
        config = config.with_lu_name(lu.as_str());
    }
    let keyboard_timeout = config.keyboard_timeout;

    let terminal = Terminal::new(config).with_handler(Arc::new(ScreenPrinter));
    terminal.connect().await?;
    if let Some(lu) = terminal.lu_name().await {
        info!("Bound to LU {}", lu);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Err(err) = terminal.wait_for_keyboard(keyboard_timeout).await {
                    warn!("{}", err);
                    continue;
                }
                match run_command(&terminal, line.trim()).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) => warn!("{}", err),
                }
            }
        }
    }

    terminal.disconnect().await;
    Ok(())
}
