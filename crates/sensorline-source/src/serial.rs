use std::io::{ErrorKind, Read};
use std::time::Duration;

use serialport::{SerialPort, SerialPortInfo, SerialPortType};

use crate::error::{Result, SourceError};
use crate::traits::SampleSource;

/// Default baud rate of the sensor boards.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default blocking read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Settings used to open a serial port.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Device path (e.g. `/dev/ttyACM0`, `COM5`).
    pub path: String,
    /// Baud rate. Default: 9600.
    pub baud_rate: u32,
    /// Read timeout for each poll. Default: 1s.
    pub read_timeout: Duration,
    /// Time to wait after opening before the first read.
    ///
    /// Most Arduino-style boards reset when the port opens and print nothing
    /// until their sketch restarts.
    pub settle_delay: Duration,
}

impl SerialConfig {
    /// Config for `path` with default baud rate and timeouts.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            settle_delay: Duration::ZERO,
        }
    }
}

/// A serial-connected sensor board.
pub struct SerialSource {
    port: Box<dyn SerialPort>,
    path: String,
    baud_rate: u32,
}

impl SerialSource {
    /// Open the port described by `config`, waiting out the settle delay.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(config.path.as_str(), config.baud_rate)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| SourceError::Open {
                path: config.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %config.path,
            baud_rate = config.baud_rate,
            "opened serial port"
        );

        if !config.settle_delay.is_zero() {
            tracing::debug!(delay = ?config.settle_delay, "waiting for board to settle");
            std::thread::sleep(config.settle_delay);
        }

        Ok(Self {
            port,
            path: config.path.clone(),
            baud_rate: config.baud_rate,
        })
    }

    /// Device path this source was opened with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Baud rate this source was opened with.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl SampleSource for SerialSource {
    fn poll(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.port.read(buf) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::TimedOut => return Ok(0),
                Err(err) => return Err(SourceError::Io(err)),
            }
        }
    }

    fn describe(&self) -> String {
        format!("{} @ {} baud", self.path, self.baud_rate)
    }
}

impl std::fmt::Debug for SerialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialSource")
            .field("path", &self.path)
            .field("baud_rate", &self.baud_rate)
            .finish()
    }
}

/// A serial port discovered on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub kind: &'static str,
    pub description: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (kind, description) = match info.port_type {
            SerialPortType::UsbPort(usb) => {
                let description = match (usb.manufacturer, usb.product) {
                    (Some(m), Some(p)) => format!("{m} {p} ({:04x}:{:04x})", usb.vid, usb.pid),
                    (Some(text), None) | (None, Some(text)) => {
                        format!("{text} ({:04x}:{:04x})", usb.vid, usb.pid)
                    }
                    (None, None) => format!("{:04x}:{:04x}", usb.vid, usb.pid),
                };
                ("usb", Some(description))
            }
            SerialPortType::PciPort => ("pci", None),
            SerialPortType::BluetoothPort => ("bluetooth", None),
            SerialPortType::Unknown => ("unknown", None),
        };
        Self {
            name: info.port_name,
            kind,
            description,
        }
    }
}

/// Enumerate serial ports available on this machine.
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().map_err(SourceError::Enumerate)?;
    Ok(ports.into_iter().map(PortInfo::from).collect())
}
