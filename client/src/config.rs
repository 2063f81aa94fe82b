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

//! Terminal configuration

use std::time::Duration;
use tn3270_datastream::ScreenModel;

/// TN3270 terminal configuration
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Host name or IP address
    pub host: String,

    /// Host port
    pub port: u16,

    /// Display model, which sets the alternate screen size
    pub model: ScreenModel,

    /// Explicit alternate width, overriding the model
    pub width: Option<usize>,

    /// Explicit alternate height, overriding the model
    pub height: Option<usize>,

    /// Terminal type reported during negotiation
    pub device_type: String,

    /// LU or pool to connect to over TN3270E
    pub lu_name: Option<String>,

    /// Accept TN3270E when the host offers it
    pub tn3270e: bool,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Default wait for the keyboard to unlock
    pub keyboard_timeout: Duration,

    /// Reconnect when connecting fails or the session drops
    pub auto_reconnect: bool,

    /// Delay before a reconnection attempt
    pub reconnect_delay: Duration,

    /// Maximum number of reconnection attempts (None for unlimited)
    pub max_reconnect_attempts: Option<usize>,

    /// Read buffer size for the transport
    pub read_buffer_size: usize,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 23,
            model: ScreenModel::Model2,
            width: None,
            height: None,
            device_type: ScreenModel::Model2.device_type().to_string(),
            lu_name: None,
            tn3270e: true,
            connect_timeout: Duration::from_secs(10),
            keyboard_timeout: Duration::from_secs(30),
            auto_reconnect: false,
            reconnect_delay: Duration::from_secs(5),
            max_reconnect_attempts: Some(3),
            read_buffer_size: 8192,
        }
    }
}

impl TerminalConfig {
    /// Create a configuration for `host`:`port` with defaults for everything else
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the display model and the matching device type
    pub fn with_model(mut self, model: ScreenModel) -> Self {
        self.model = model;
        self.device_type = model.device_type().to_string();
        self
    }

    /// Override the alternate screen size
    pub fn with_screen_size(mut self, width: usize, height: usize) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the reported terminal type
    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = device_type.into();
        self
    }

    /// Ask for a specific LU
    pub fn with_lu_name(mut self, lu_name: impl Into<String>) -> Self {
        self.lu_name = Some(lu_name.into());
        self
    }

    /// Accept or refuse TN3270E
    pub fn with_tn3270e(mut self, enabled: bool) -> Self {
        self.tn3270e = enabled;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the default keyboard wait
    pub fn with_keyboard_timeout(mut self, timeout: Duration) -> Self {
        self.keyboard_timeout = timeout;
        self
    }

    /// Enable automatic reconnection
    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    /// Set the reconnection delay
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the maximum reconnection attempts
    pub fn with_max_reconnect_attempts(mut self, max: Option<usize>) -> Self {
        self.max_reconnect_attempts = max;
        self
    }

    /// Get the host address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Alternate screen size as `(width, height)`
    pub fn screen_size(&self) -> (usize, usize) {
        let (width, height) = self.model.dimensions();
        (self.width.unwrap_or(width), self.height.unwrap_or(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TerminalConfig::new("mainframe", 992);
        assert_eq!(config.address(), "mainframe:992");
        assert_eq!(config.device_type, "IBM-3278-2-E");
        assert_eq!(config.screen_size(), (80, 24));
        assert!(config.tn3270e);
        assert!(!config.auto_reconnect);
    }

    #[test]
    fn test_builders() {
        let config = TerminalConfig::default()
            .with_model(ScreenModel::Model4)
            .with_lu_name("LU01")
            .with_auto_reconnect(true)
            .with_max_reconnect_attempts(None);
        assert_eq!(config.device_type, "IBM-3278-4-E");
        assert_eq!(config.screen_size(), (80, 43));
        assert_eq!(config.lu_name.as_deref(), Some("LU01"));
        assert_eq!(config.max_reconnect_attempts, None);

        let config = config.with_screen_size(100, 30);
        assert_eq!(config.screen_size(), (100, 30));
    }
}
