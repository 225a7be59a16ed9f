//! Frame encoding and decoding for the MH-Z19 UART protocol.
//!
//! Every frame, in both directions, is nine bytes long:
//!
//! ```text
//! +------+---------+---------+-------+-------+-------+-------+-------+----------+
//! | 0xFF | address | command | data0 | data1 | data2 | data3 | data4 | checksum |
//! +------+---------+---------+-------+-------+-------+-------+-------+----------+
//! ```
//!
//! The checksum covers bytes 1 to 7. A read reply carries the response code `0x86` in
//! byte 1 and the concentration in bytes 2 and 3 (big-endian).
//!
//! Nothing in this module performs I/O or logs; the functions are pure transformations.

use crate::constants::*;
use crate::error::Error;

/// A complete command or response frame.
pub type Frame = [u8; FRAME_LEN];

/// Computes the protocol checksum of the seven bytes following the start marker.
///
/// This is the two's complement of the byte sum: `0xFF - (sum % 256) + 1`, truncated to
/// eight bits.
pub fn checksum(bytes: &[u8; 7]) -> u8 {
    let sum = bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b));
    0xFFu8.wrapping_sub(sum).wrapping_add(1)
}

/// Computes the checksum a frame should carry in its last byte.
pub fn frame_checksum(frame: &Frame) -> u8 {
    let mut body = [0u8; 7];
    body.copy_from_slice(&frame[1..8]);
    checksum(&body)
}

/// Measurement ranges the sensor can be switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionRange {
    Ppm2000,
    Ppm5000,
}

impl DetectionRange {
    /// Upper bound of the range in ppm.
    pub fn ppm(self) -> u16 {
        match self {
            DetectionRange::Ppm2000 => 2000,
            DetectionRange::Ppm5000 => 5000,
        }
    }
}

impl TryFrom<u16> for DetectionRange {
    type Error = Error;

    fn try_from(ppm: u16) -> Result<Self, Self::Error> {
        match ppm {
            2000 => Ok(DetectionRange::Ppm2000),
            5000 => Ok(DetectionRange::Ppm5000),
            _ => Err(Error::InvalidArg),
        }
    }
}

/// A CO2 concentration reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// CO2 concentration in ppm.
    pub co2_ppm: u16,
}

/// The commands understood by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request the current CO2 concentration.
    ReadCo2,
    /// Calibrate the zero point (400 ppm, fresh air).
    ZeroPointCalibration,
    /// Calibrate the span point to the given concentration.
    SpanPointCalibration(u16),
    /// Turn automatic baseline correction on or off.
    Abc(bool),
    /// Switch the detection range.
    DetectionRange(DetectionRange),
}

impl Command {
    /// Command code placed in byte 2.
    pub fn code(&self) -> u8 {
        match self {
            Command::ReadCo2 => CMD_READ_CO2,
            Command::ZeroPointCalibration => CMD_ZERO_POINT_CALIBRATION,
            Command::SpanPointCalibration(_) => CMD_SPAN_POINT_CALIBRATION,
            Command::Abc(_) => CMD_ABC,
            Command::DetectionRange(_) => CMD_DETECTION_RANGE,
        }
    }

    /// Data bytes 3 to 7, zero-filled where the command has no parameter.
    pub fn payload(&self) -> [u8; 5] {
        match *self {
            Command::ReadCo2 | Command::ZeroPointCalibration => [0; 5],
            Command::SpanPointCalibration(span) => {
                let [hi, lo] = span.to_be_bytes();
                [hi, lo, 0, 0, 0]
            }
            Command::Abc(on) => [if on { ABC_ON } else { ABC_OFF }, 0, 0, 0, 0],
            Command::DetectionRange(range) => {
                let [hi, lo] = range.ppm().to_be_bytes();
                [0, 0, 0, hi, lo]
            }
        }
    }

    /// Assembles the full frame, checksum included.
    pub fn frame(&self) -> Frame {
        let p = self.payload();
        let mut frame = [
            START_BYTE,
            SENSOR_ADDRESS,
            self.code(),
            p[0],
            p[1],
            p[2],
            p[3],
            p[4],
            0x00, // checksum
        ];
        frame[8] = frame_checksum(&frame);
        frame
    }
}

/// `FF 01 86 00 00 00 00 00 79`
pub fn build_read_command() -> Frame {
    Command::ReadCo2.frame()
}

/// `FF 01 79 A0 00 00 00 00 E6` when `on`, `FF 01 79 00 00 00 00 00 86` otherwise.
pub fn build_abc_command(on: bool) -> Frame {
    Command::Abc(on).frame()
}

/// `FF 01 87 00 00 00 00 00 78`
pub fn build_zero_calibration_command() -> Frame {
    Command::ZeroPointCalibration.frame()
}

/// Builds a span point calibration frame.
///
/// Returns `Error::InvalidArg` if `span` does not fit in 16 bits; values are never
/// truncated.
pub fn build_span_calibration_command(span: i32) -> Result<Frame, Error> {
    let span = u16::try_from(span).map_err(|_| Error::InvalidArg)?;
    Ok(Command::SpanPointCalibration(span).frame())
}

/// `FF 01 99 00 00 00 13 88 CB` for 5000 ppm, `FF 01 99 00 00 00 07 D0 8F` for 2000 ppm.
pub fn build_detection_range_command(range: DetectionRange) -> Frame {
    Command::DetectionRange(range).frame()
}

/// Parses the reply to a read command.
///
/// Only the start marker, the response code and the length are checked. The trailing
/// checksum is ignored, so a reply truncated after the concentration bytes is accepted.
pub fn parse_read_response(bytes: &[u8]) -> Result<Reading, Error> {
    if bytes.len() < MIN_READ_RESPONSE_LEN || bytes[0] != START_BYTE || bytes[1] != CMD_READ_CO2
    {
        return Err(Error::Malformed);
    }
    Ok(Reading {
        co2_ppm: u16::from_be_bytes([bytes[2], bytes[3]]),
    })
}

/// Like [`parse_read_response`], but also requires a complete frame with a valid checksum.
pub fn parse_read_response_strict(bytes: &[u8]) -> Result<Reading, Error> {
    let reading = parse_read_response(bytes)?;
    let frame = Frame::try_from(bytes).map_err(|_| Error::Malformed)?;
    if frame_checksum(&frame) != frame[8] {
        return Err(Error::BadChecksum);
    }
    Ok(reading)
}
