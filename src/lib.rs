#![cfg_attr(not(test), no_std)]

use embedded_io_async::{Error as _, ErrorKind, Read, Write};
use log::debug;

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod frame;
pub use frame::*;

/// Represents an MH-Z19 CO2 sensor.
///
/// The driver owns the serial interface, so transactions are serialized by `&mut self`:
/// the protocol has no request IDs and a second request in flight would be answered
/// out of order.
///
/// # Type Parameters
///
/// * `Serial`: The type of the serial interface used to communicate with the sensor.
///   It must implement `embedded_io_async::Read` and `embedded_io_async::Write`, run at
///   [`BAUD_RATE`] 8N1 and time out reads after [`READ_TIMEOUT_MS`].
pub struct MhZ19<Serial> {
    serial: Serial,
    config: Config,
}

impl<S> MhZ19<S>
where
    S: Read + Write,
{
    /// Creates a new `MhZ19` sensor instance.
    ///
    /// # Arguments
    ///
    /// * `serial`: The serial interface for communication with the sensor.
    /// * `config`: The driver configuration.
    pub fn new(serial: S, config: Config) -> Self {
        Self { serial, config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases the serial interface.
    pub fn release(self) -> S {
        self.serial
    }

    /// Reads the current CO2 concentration.
    ///
    /// Each attempt writes the read command and reads up to nine bytes of reply. With the
    /// default configuration exactly one attempt is made. Before a retry, whatever is
    /// still arriving from the previous attempt is read and discarded.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` with the concentration in ppm.
    /// * `Err(Error::Malformed)` if the reply was short or not a read reply.
    /// * `Err(Error::BadChecksum)` if checksum verification is enabled and fails.
    /// * `Err(Error::WriteFailure)` or `Err(Error::ReadFailure)` for serial communication issues.
    pub async fn read_co2(&mut self) -> Result<Reading, Error> {
        let attempts = self.config.attempts();
        let mut last_error = Error::Malformed;

        for attempt in 1..=attempts {
            let result = if attempt > 1 {
                match self.drain().await {
                    Ok(()) => self.read_co2_once().await,
                    Err(e) => Err(e),
                }
            } else {
                self.read_co2_once().await
            };

            match result {
                Ok(reading) => {
                    debug!("CO2 concentration: {} ppm", reading.co2_ppm);
                    return Ok(reading);
                }
                Err(e) => {
                    log::warn!("CO2 read attempt {}/{} failed: {:?}", attempt, attempts, e);
                    last_error = e;
                }
            }
        }

        log::error!("Failed to read CO2 after {} attempt(s)", attempts);
        Err(last_error)
    }

    async fn read_co2_once(&mut self) -> Result<Reading, Error> {
        self.write(&build_read_command()).await?;

        let mut buffer = [0u8; FRAME_LEN];
        let len = self.read(&mut buffer).await?;
        let reply = &buffer[..len];
        debug!("Received reply: {:02X?}", reply);

        if self.config.verify_checksum {
            parse_read_response_strict(reply)
        } else {
            parse_read_response(reply)
        }
    }

    /// Turns automatic baseline correction on or off.
    pub async fn set_abc(&mut self, on: bool) -> Result<(), Error> {
        debug!("Setting ABC logic to: {}", if on { "on" } else { "off" });
        self.write(&build_abc_command(on)).await
    }

    /// Calibrates the zero point.
    ///
    /// The sensor must have been in fresh air (around 400 ppm) for a while beforehand.
    pub async fn zero_point_calibration(&mut self) -> Result<(), Error> {
        debug!("Calibrating zero point");
        self.write(&build_zero_calibration_command()).await
    }

    /// Calibrates the span point to `span` ppm.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the command was written.
    /// * `Err(Error::InvalidArg)` if `span` is outside 0-65535. Nothing is written.
    /// * `Err(Error::WriteFailure)` for serial communication issues.
    pub async fn span_point_calibration(&mut self, span: i32) -> Result<(), Error> {
        let command = build_span_calibration_command(span).map_err(|e| {
            log::error!("Span value {} out of range (0-65535)", span);
            e
        })?;
        debug!("Calibrating span point to {} ppm", span);
        self.write(&command).await
    }

    /// Switches the detection range.
    pub async fn set_detection_range(&mut self, range: DetectionRange) -> Result<(), Error> {
        debug!("Setting detection range to {} ppm", range.ppm());
        self.write(&build_detection_range_command(range)).await
    }

    // Writes a complete frame to the serial port.
    async fn write(&mut self, frame: &Frame) -> Result<(), Error> {
        debug!("Executing command: {:02X?}", frame);
        self.serial.flush().await.map_err(|_| Error::WriteFailure)?;
        self.serial
            .write_all(frame)
            .await
            .map_err(|e| {
                log::error!("Serial write error: {:?}", e);
                Error::WriteFailure
            })?;
        self.serial.flush().await.map_err(|_| Error::WriteFailure)?; // Ensure data is sent
        Ok(())
    }

    // Reads up to one frame. A timeout or end of stream ends the read early and is not an
    // error; the caller sees the short length.
    async fn read(&mut self, buffer: &mut [u8; FRAME_LEN]) -> Result<usize, Error> {
        let mut filled = 0;

        while filled < buffer.len() {
            match self.serial.read(&mut buffer[filled..]).await {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    debug!("Read timed out after {} byte(s)", filled);
                    break;
                }
                Err(e) => {
                    log::debug!("Serial read error after {} byte(s): {:?}", filled, e);
                    return Err(Error::ReadFailure);
                }
            }
        }

        Ok(filled)
    }

    // Discards pending input until the line goes quiet (timeout or end of stream).
    async fn drain(&mut self) -> Result<(), Error> {
        let mut scratch = [0u8; FRAME_LEN];
        let mut discarded = 0;

        loop {
            match self.serial.read(&mut scratch).await {
                Ok(0) => break,
                Ok(n) => discarded += n,
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) => {
                    log::debug!("Serial read error while draining: {:?}", e);
                    return Err(Error::ReadFailure);
                }
            }
        }

        if discarded > 0 {
            debug!("Discarded {} stale byte(s) before retrying", discarded);
        }
        Ok(())
    }
}
