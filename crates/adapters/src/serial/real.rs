// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real serial port adapter backed by `tokio-serial`.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::SerialPortBuilderExt;

use super::{FlowControl, Parity, PortSettings, SerialError, SerialPortAdapter};

/// A serial port opened via the platform's native serial driver.
pub struct TokioSerialAdapter {
    port: tokio_serial::SerialStream,
}

fn to_tokio_parity(p: Parity) -> tokio_serial::Parity {
    match p {
        Parity::None => tokio_serial::Parity::None,
        Parity::Even => tokio_serial::Parity::Even,
        Parity::Odd => tokio_serial::Parity::Odd,
        // tokio-serial has no Mark/Space variant; Modbus/industrial gear that
        // asks for them is rare enough that None is an acceptable fallback.
        Parity::Mark | Parity::Space => tokio_serial::Parity::None,
    }
}

fn to_tokio_flow_control(f: FlowControl) -> tokio_serial::FlowControl {
    match f {
        FlowControl::None => tokio_serial::FlowControl::None,
        FlowControl::RtsCts => tokio_serial::FlowControl::Hardware,
        FlowControl::XonXoff => tokio_serial::FlowControl::Software,
    }
}

fn to_tokio_stop_bits(stop_bits: f32) -> tokio_serial::StopBits {
    if stop_bits >= 2.0 {
        tokio_serial::StopBits::Two
    } else {
        tokio_serial::StopBits::One
    }
}

fn to_tokio_data_bits(data_bits: u8) -> tokio_serial::DataBits {
    match data_bits {
        5 => tokio_serial::DataBits::Five,
        6 => tokio_serial::DataBits::Six,
        7 => tokio_serial::DataBits::Seven,
        _ => tokio_serial::DataBits::Eight,
    }
}

#[async_trait]
impl SerialPortAdapter for TokioSerialAdapter {
    async fn open(settings: &PortSettings) -> Result<Self, SerialError> {
        let builder = tokio_serial::new(&settings.port, settings.baud_rate)
            .data_bits(to_tokio_data_bits(settings.data_bits))
            .parity(to_tokio_parity(settings.parity))
            .stop_bits(to_tokio_stop_bits(settings.stop_bits))
            .flow_control(to_tokio_flow_control(settings.flow_control))
            .timeout(Duration::from_millis(settings.timeout_ms));

        let port = builder.open_native_async().map_err(|e| SerialError::OpenFailed {
            port: settings.port.clone(),
            message: e.to_string(),
        })?;

        Ok(Self { port })
    }

    async fn read(&mut self, max_len: usize) -> Result<Vec<u8>, SerialError> {
        let mut buf = vec![0u8; max_len];
        match self.port.read(&mut buf).await {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(SerialError::ReadFailed(e.to_string())),
        }
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), SerialError> {
        self.port
            .write_all(data)
            .await
            .map_err(|e| SerialError::WriteFailed(e.to_string()))
    }

    async fn close(&mut self) {
        // Dropping the handle closes the underlying file descriptor.
    }
}
