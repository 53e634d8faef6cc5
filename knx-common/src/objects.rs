//! Communication object definitions
//!

use crate::{address::GroupAddress, dpt::Dpt, telegram::Priority};

/// The indicator flags of a communication object
///
/// Bit values follow the usual KNX indicator encoding, so a flag set can be stored in a single
/// configuration byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComFlags(u8);

impl ComFlags {
    /// No flags set
    pub const NONE: ComFlags = ComFlags(0);
    /// C: the object takes part in bus communication
    pub const COMMUNICATION: ComFlags = ComFlags(0x20);
    /// R: the value may be read from the bus
    pub const READ: ComFlags = ComFlags(0x10);
    /// W: the value may be written from the bus
    pub const WRITE: ComFlags = ComFlags(0x08);
    /// T: value changes are transmitted
    pub const TRANSMIT: ComFlags = ComFlags(0x04);
    /// U: read responses from the bus update the value
    pub const UPDATE: ComFlags = ComFlags(0x02);
    /// I: the value is read from the bus at startup, and is not valid until then
    pub const INIT_READ: ComFlags = ComFlags(0x01);

    const LETTERS: [(char, ComFlags); 6] = [
        ('c', Self::COMMUNICATION),
        ('r', Self::READ),
        ('w', Self::WRITE),
        ('t', Self::TRANSMIT),
        ('u', Self::UPDATE),
        ('i', Self::INIT_READ),
    ];

    /// Create a flag set from its raw byte value
    pub const fn from_bits(bits: u8) -> Self {
        ComFlags(bits & 0x3F)
    }

    /// Get the raw byte value
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns true if all flags in `other` are set
    pub const fn contains(&self, other: ComFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Combine two flag sets
    pub const fn union(self, other: ComFlags) -> Self {
        ComFlags(self.0 | other.0)
    }

    /// Parse a flag set from indicator letters, e.g. `"CRWT"`
    ///
    /// Letters are case insensitive. Returns the first unrecognised character on failure.
    pub fn from_letters(letters: &str) -> Result<Self, char> {
        letters.chars().try_fold(ComFlags::NONE, |flags, c| {
            Self::LETTERS
                .iter()
                .find(|(letter, _)| *letter == c.to_ascii_lowercase())
                .map(|(_, flag)| flags.union(*flag))
                .ok_or(c)
        })
    }
}

impl core::ops::BitOr for ComFlags {
    type Output = ComFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl core::fmt::Display for ComFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (letter, flag) in Self::LETTERS {
            if self.contains(flag) {
                write!(f, "{}", letter.to_ascii_uppercase())?;
            }
        }
        Ok(())
    }
}

/// Static description of a communication object
///
/// A device declares one descriptor per datapoint, usually as a `static` list, and creates its
/// communication objects from them at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComObjectDescriptor {
    /// The datapoint type of the object value
    pub dpt: Dpt,
    /// Indicator flags
    pub flags: ComFlags,
    /// The group address used when sending, if the object is bound
    pub address: Option<GroupAddress>,
    /// The priority used when sending
    pub priority: Priority,
}

impl ComObjectDescriptor {
    /// Create an unbound descriptor with low priority
    pub const fn new(dpt: Dpt, flags: ComFlags) -> Self {
        Self {
            dpt,
            flags,
            address: None,
            priority: Priority::Low,
        }
    }

    /// Convenience function to bind the descriptor to a group address
    pub const fn address(mut self, address: GroupAddress) -> Self {
        self.address = Some(address);
        self
    }

    /// Convenience function to set the priority
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}
