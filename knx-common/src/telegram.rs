//! Telegram interface and the standard TP1 frame
//!
//! # Frame layout
//!
//! | Byte | Content |
//! | ---- | ------- |
//! | 0    | Control field, priority in bits 3..2 |
//! | 1-2  | Source individual address |
//! | 3-4  | Target address |
//! | 5    | Bit 7: group target, bits 6..4: routing counter, bits 3..0: payload length |
//! | 6    | TPCI, and the upper two bits of the APCI command |
//! | 7    | Lower two bits of the APCI command, bits 5..0: first payload byte |
//! | 8..  | Payload region, `payload length - 1` bytes |
//! | last | Checksum |
//!
//! The payload length counts byte 7, so a payload of length `n` has `n - 1` bytes in the payload
//! region. Values of 6 bits or fewer travel in the first payload byte alone.
use defmt_or_log::debug;
use snafu::Snafu;

use crate::address::{Address, GroupAddress, IndividualAddress};

/// Size of the fixed header preceding the TPCI byte
pub const HEADER_SIZE: usize = 6;
/// Largest payload length that fits the 4-bit length field
pub const MAX_PAYLOAD_LENGTH: u8 = 15;
/// Size of the largest standard frame, including the checksum
pub const MAX_TELEGRAM_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_LENGTH as usize + 2;
/// Smallest valid frame: header, TPCI, APCI and checksum
pub const MIN_TELEGRAM_SIZE: usize = HEADER_SIZE + 3;

const PAYLOAD_START: usize = 8;
const CONTROL_FIELD_DEFAULT: u8 = 0xBC;
const ROUTING_FIELD_DEFAULT: u8 = 0xE0;
const PRIORITY_MASK: u8 = 0x0C;
const GROUP_TARGET_FLAG: u8 = 0x80;
const PAYLOAD_LENGTH_MASK: u8 = 0x0F;
const FIRST_PAYLOAD_MASK: u8 = 0x3F;

/// Telegram transmission priority
///
/// Discriminants are the values of the 2-bit priority field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Priority {
    /// Reserved for system management
    System = 0b00,
    /// Normal priority for short frames
    Normal = 0b01,
    /// Urgent priority, e.g. alarms
    Urgent = 0b10,
    /// Low priority, the default for application data
    #[default]
    Low = 0b11,
}

impl Priority {
    /// Decode a priority from the two least significant bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0b00 => Priority::System,
            0b01 => Priority::Normal,
            0b10 => Priority::Urgent,
            _ => Priority::Low,
        }
    }
}

/// The 4-bit application layer command carried in bytes 6 and 7
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ApciCommand {
    GroupValueRead = 0,
    GroupValueResponse = 1,
    #[default]
    GroupValueWrite = 2,
    IndividualAddrWrite = 3,
    IndividualAddrRequest = 4,
    IndividualAddrResponse = 5,
    AdcRead = 6,
    AdcResponse = 7,
    MemoryRead = 8,
    MemoryResponse = 9,
    MemoryWrite = 10,
    UserMessage = 11,
    MaskVersionRead = 12,
    MaskVersionResponse = 13,
    Restart = 14,
    Escape = 15,
}

impl ApciCommand {
    /// Decode a command from the four least significant bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        use ApciCommand::*;
        match bits & 0xF {
            0 => GroupValueRead,
            1 => GroupValueResponse,
            2 => GroupValueWrite,
            3 => IndividualAddrWrite,
            4 => IndividualAddrRequest,
            5 => IndividualAddrResponse,
            6 => AdcRead,
            7 => AdcResponse,
            8 => MemoryRead,
            9 => MemoryResponse,
            10 => MemoryWrite,
            11 => UserMessage,
            12 => MaskVersionRead,
            13 => MaskVersionResponse,
            14 => Restart,
            _ => Escape,
        }
    }
}

/// Access to the fields of a telegram needed to exchange object values
///
/// Payload region accesses must be consistent: data written at an offset is read back unchanged
/// from the same offset.
pub trait Telegram {
    /// Read the target address
    fn target(&self) -> Address;
    /// Set the target address
    fn set_target(&mut self, target: Address);
    /// Read the transmission priority
    fn priority(&self) -> Priority;
    /// Set the transmission priority
    fn set_priority(&mut self, priority: Priority);
    /// Read the payload length, counting the first payload byte
    fn payload_length(&self) -> u8;
    /// Set the payload length, counting the first payload byte
    fn set_payload_length(&mut self, length: u8);
    /// Read the 6-bit first payload byte
    fn first_payload_byte(&self) -> u8;
    /// Set the 6-bit first payload byte. Upper bits are discarded.
    fn set_first_payload_byte(&mut self, value: u8);
    /// Copy `dest.len()` bytes from the payload region, starting at `offset`
    fn read_payload(&self, offset: usize, dest: &mut [u8]);
    /// Copy `src` into the payload region, starting at `offset`
    fn write_payload(&mut self, offset: usize, src: &[u8]);
}

/// Error returned when decoding a received frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum TelegramError {
    /// The frame is shorter than the smallest possible telegram
    #[snafu(display("Telegram too short: {size} bytes"))]
    TooShort {
        /// Number of bytes received
        size: usize,
    },
    /// The frame is larger than the largest standard telegram
    #[snafu(display("Telegram too long: {size} bytes"))]
    TooLong {
        /// Number of bytes received
        size: usize,
    },
    /// The length field does not match the number of bytes received
    #[snafu(display("Telegram length field implies {expected} bytes, received {actual}"))]
    SizeMismatch {
        /// Frame size implied by the length field
        expected: usize,
        /// Number of bytes received
        actual: usize,
    },
    /// The checksum byte does not match the frame content
    #[snafu(display("Bad telegram checksum: expected 0x{expected:02x}, found 0x{found:02x}"))]
    BadChecksum {
        /// Checksum computed from the frame
        expected: u8,
        /// Checksum byte received
        found: u8,
    },
}

/// A standard KNX TP1 frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnxTelegram {
    buf: [u8; MAX_TELEGRAM_SIZE],
}

impl Default for KnxTelegram {
    fn default() -> Self {
        Self::new()
    }
}

impl KnxTelegram {
    /// Create a group value write with low priority and payload length 1
    pub const fn new() -> Self {
        let mut buf = [0u8; MAX_TELEGRAM_SIZE];
        buf[0] = CONTROL_FIELD_DEFAULT;
        buf[5] = ROUTING_FIELD_DEFAULT | 1;
        buf[7] = (ApciCommand::GroupValueWrite as u8 & 0x3) << 6;
        Self { buf }
    }

    /// Decode a received frame, checking its length field and checksum
    pub fn from_bytes(data: &[u8]) -> Result<Self, TelegramError> {
        if data.len() < MIN_TELEGRAM_SIZE {
            return TooShortSnafu { size: data.len() }.fail();
        }
        if data.len() > MAX_TELEGRAM_SIZE {
            return TooLongSnafu { size: data.len() }.fail();
        }
        let mut buf = [0u8; MAX_TELEGRAM_SIZE];
        buf[..data.len()].copy_from_slice(data);
        let telegram = Self { buf };

        let expected = telegram.size();
        if expected != data.len() {
            return SizeMismatchSnafu {
                expected,
                actual: data.len(),
            }
            .fail();
        }

        let expected = telegram.calc_checksum();
        let found = telegram.buf[expected_checksum_index(&telegram)];
        if expected != found {
            debug!("Dropping telegram with bad checksum");
            return BadChecksumSnafu { expected, found }.fail();
        }
        Ok(telegram)
    }

    /// Update the checksum and return the frame bytes
    pub fn encode(&mut self) -> &[u8] {
        let index = expected_checksum_index(self);
        self.buf[index] = self.calc_checksum();
        &self.buf[..self.size()]
    }

    /// Total frame size in bytes, including the checksum
    pub fn size(&self) -> usize {
        HEADER_SIZE + self.payload_length() as usize + 2
    }

    /// Read the source address
    pub fn source(&self) -> IndividualAddress {
        IndividualAddress::from_raw(u16::from_be_bytes([self.buf[1], self.buf[2]]))
    }

    /// Set the source address
    pub fn set_source(&mut self, source: IndividualAddress) {
        self.buf[1..3].copy_from_slice(&source.raw().to_be_bytes());
    }

    /// Read the application command
    pub fn command(&self) -> ApciCommand {
        ApciCommand::from_bits(((self.buf[6] & 0x3) << 2) | (self.buf[7] >> 6))
    }

    /// Set the application command
    pub fn set_command(&mut self, command: ApciCommand) {
        let bits = command as u8;
        self.buf[6] = (self.buf[6] & !0x3) | (bits >> 2);
        self.buf[7] = (self.buf[7] & FIRST_PAYLOAD_MASK) | ((bits & 0x3) << 6);
    }

    /// Returns true when the checksum byte matches the frame content
    pub fn is_checksum_correct(&self) -> bool {
        self.buf[expected_checksum_index(self)] == self.calc_checksum()
    }

    fn calc_checksum(&self) -> u8 {
        !self.buf[..expected_checksum_index(self)]
            .iter()
            .fold(0u8, |acc, b| acc ^ b)
    }
}

fn expected_checksum_index(telegram: &KnxTelegram) -> usize {
    telegram.size() - 1
}

impl Telegram for KnxTelegram {
    fn target(&self) -> Address {
        let raw = u16::from_be_bytes([self.buf[3], self.buf[4]]);
        if self.buf[5] & GROUP_TARGET_FLAG != 0 {
            Address::Group(GroupAddress::from_raw(raw))
        } else {
            Address::Individual(IndividualAddress::from_raw(raw))
        }
    }

    fn set_target(&mut self, target: Address) {
        self.buf[3..5].copy_from_slice(&target.raw().to_be_bytes());
        if target.is_group() {
            self.buf[5] |= GROUP_TARGET_FLAG;
        } else {
            self.buf[5] &= !GROUP_TARGET_FLAG;
        }
    }

    fn priority(&self) -> Priority {
        Priority::from_bits((self.buf[0] & PRIORITY_MASK) >> 2)
    }

    fn set_priority(&mut self, priority: Priority) {
        self.buf[0] = (self.buf[0] & !PRIORITY_MASK) | ((priority as u8) << 2);
    }

    fn payload_length(&self) -> u8 {
        self.buf[5] & PAYLOAD_LENGTH_MASK
    }

    /// Lengths outside `1..=MAX_PAYLOAD_LENGTH` are clamped, so the checksum never overwrites the
    /// command byte.
    fn set_payload_length(&mut self, length: u8) {
        let length = length.clamp(1, MAX_PAYLOAD_LENGTH);
        self.buf[5] = (self.buf[5] & !PAYLOAD_LENGTH_MASK) | length;
    }

    fn first_payload_byte(&self) -> u8 {
        self.buf[7] & FIRST_PAYLOAD_MASK
    }

    fn set_first_payload_byte(&mut self, value: u8) {
        self.buf[7] = (self.buf[7] & !FIRST_PAYLOAD_MASK) | (value & FIRST_PAYLOAD_MASK);
    }

    fn read_payload(&self, offset: usize, dest: &mut [u8]) {
        let start = PAYLOAD_START + offset;
        dest.copy_from_slice(&self.buf[start..start + dest.len()]);
    }

    fn write_payload(&mut self, offset: usize, src: &[u8]) {
        let start = PAYLOAD_START + offset;
        self.buf[start..start + src.len()].copy_from_slice(src);
    }
}
