//! The communication object
//!
//! A [`ComObject`] holds the value of one datapoint along with its validity and activity state, and
//! converts the value to and from telegram payloads.
//!
//! # Value storage
//!
//! The payload length of the datapoint type decides how the value is stored. Values with a
//! payload length of 1 or 2 fit in a single byte, and are stored inline. Longer values are stored
//! in a heap buffer of `length - 1` bytes which is allocated when the object is created and freed
//! when it is dropped. The storage mode never changes afterwards.
//!
//! # Telegram layout
//!
//! On the bus, a payload of length 1 carries the value in the 6-bit first payload byte. All longer
//! payloads carry the value in the payload region following it, so an 8-bit value with payload
//! length 2 is read from and written to offset 0 of the payload region, not the first payload
//! byte.
use alloc::{boxed::Box, vec};

use defmt_or_log::{debug, trace};
use knx_common::{
    address::{Address, GroupAddress},
    dpt::Dpt,
    objects::ComFlags,
    telegram::{Priority, Telegram},
};
use snafu::Snafu;

/// Error returned by [`ComObject::update_from_telegram`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum ComObjectError {
    /// The telegram payload length does not match the object length
    #[snafu(display("Telegram payload length {actual} does not match object length {expected}"))]
    LengthMismatch {
        /// Length of the object
        expected: u8,
        /// Payload length of the telegram
        actual: u8,
    },
}

#[derive(Debug)]
enum Value {
    Short(u8),
    Long(Box<[u8]>),
}

/// A communication object
#[derive(Debug)]
pub struct ComObject {
    dpt: Dpt,
    flags: ComFlags,
    length: u8,
    active: bool,
    valid: bool,
    value: Value,
}

impl ComObject {
    /// Create a new object for a datapoint type
    ///
    /// The object starts inactive, with a zero value. It is valid unless `flags` includes
    /// [`ComFlags::INIT_READ`], in which case it becomes valid on the first value update.
    pub fn new(dpt: Dpt, flags: ComFlags) -> Self {
        let length = dpt.payload_length();
        let value = if length <= 2 {
            Value::Short(0)
        } else {
            Value::Long(vec![0u8; length as usize - 1].into_boxed_slice())
        };
        Self {
            dpt,
            flags,
            length,
            active: false,
            valid: !flags.contains(ComFlags::INIT_READ),
            value,
        }
    }

    /// The datapoint type of the object
    pub fn dpt(&self) -> Dpt {
        self.dpt
    }

    /// The indicator flags of the object
    pub fn flags(&self) -> ComFlags {
        self.flags
    }

    /// The telegram payload length of the object value
    pub fn length(&self) -> u8 {
        self.length
    }

    /// The number of bytes exchanged by [`read_value`](Self::read_value) and
    /// [`update_value`](Self::update_value)
    pub fn value_size(&self) -> usize {
        match &self.value {
            Value::Short(_) => 1,
            Value::Long(buf) => buf.len(),
        }
    }

    /// Returns true if the object takes part in bus communication
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable bus communication for the object
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Returns true if the object holds a value
    ///
    /// Objects created with [`ComFlags::INIT_READ`] are invalid until their first update.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Copy the current value into `dest`
    ///
    /// # Panics
    ///
    /// Panics if `dest` is shorter than [`value_size`](Self::value_size).
    pub fn read_value(&self, dest: &mut [u8]) {
        match &self.value {
            Value::Short(byte) => dest[0] = *byte,
            Value::Long(buf) => dest[..buf.len()].copy_from_slice(buf),
        }
    }

    /// Replace the value with the first [`value_size`](Self::value_size) bytes of `src`
    ///
    /// The object is valid afterwards. Objects of length 1 store the whole byte, but only its low 6
    /// bits reach the bus, see [`copy_value`](Self::copy_value).
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than [`value_size`](Self::value_size).
    pub fn update_value(&mut self, src: &[u8]) {
        match &mut self.value {
            Value::Short(byte) => *byte = src[0],
            Value::Long(buf) => {
                let len = buf.len();
                buf.copy_from_slice(&src[..len]);
            }
        }
        self.valid = true;
    }

    /// Replace the value with the payload of a received telegram
    ///
    /// # Errors
    ///
    /// - [`ComObjectError::LengthMismatch`] if the telegram payload length differs from the
    ///   object length. The object is left unchanged.
    pub fn update_from_telegram<T: Telegram + ?Sized>(
        &mut self,
        telegram: &T,
    ) -> Result<(), ComObjectError> {
        let actual = telegram.payload_length();
        if actual != self.length {
            debug!(
                "Ignoring telegram with payload length {} for object of length {}",
                actual, self.length
            );
            return LengthMismatchSnafu {
                expected: self.length,
                actual,
            }
            .fail();
        }
        let length = self.length;
        match &mut self.value {
            Value::Short(byte) if length == 1 => *byte = telegram.first_payload_byte(),
            Value::Short(byte) => telegram.read_payload(0, core::slice::from_mut(byte)),
            Value::Long(buf) => telegram.read_payload(0, buf),
        }
        self.valid = true;
        trace!("Updated object value from telegram");
        Ok(())
    }

    /// Write the send attributes of the object into an outgoing telegram
    ///
    /// Sets the priority and group target address provided by the owner, and the payload length of
    /// the object.
    pub fn copy_attributes<T: Telegram + ?Sized>(
        &self,
        dest: &mut T,
        address: GroupAddress,
        priority: Priority,
    ) {
        dest.set_priority(priority);
        dest.set_target(Address::Group(address));
        dest.set_payload_length(self.length);
    }

    /// Write the current value into the payload of an outgoing telegram
    ///
    /// The telegram payload length is expected to be set already, see
    /// [`copy_attributes`](Self::copy_attributes).
    ///
    /// For objects of length 1 the value goes in the 6-bit first payload byte, and bits 7..6 are
    /// dropped.
    pub fn copy_value<T: Telegram + ?Sized>(&self, dest: &mut T) {
        match &self.value {
            Value::Short(byte) if self.length == 1 => dest.set_first_payload_byte(*byte),
            Value::Short(byte) => dest.write_payload(0, core::slice::from_ref(byte)),
            Value::Long(buf) => dest.write_payload(0, buf),
        }
    }
}
