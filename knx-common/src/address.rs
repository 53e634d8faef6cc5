//! KNX bus addresses

/// A 3-level group address, `main/middle/sub`
///
/// Encoded on the bus as 5 bits main group, 3 bits middle group and 8 bits sub group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GroupAddress(u16);

impl GroupAddress {
    /// Create a group address from its three levels
    pub const fn new(main: u8, middle: u8, sub: u8) -> Result<Self, InvalidAddressError> {
        if main > 31 || middle > 7 {
            return Err(InvalidAddressError);
        }
        Ok(GroupAddress(
            ((main as u16) << 11) | ((middle as u16) << 8) | sub as u16,
        ))
    }

    /// Create a group address from its raw 16-bit bus encoding
    pub const fn from_raw(raw: u16) -> Self {
        GroupAddress(raw)
    }

    /// Get the raw 16-bit bus encoding
    pub const fn raw(&self) -> u16 {
        self.0
    }

    /// The main group (0-31)
    pub const fn main(&self) -> u8 {
        (self.0 >> 11) as u8
    }

    /// The middle group (0-7)
    pub const fn middle(&self) -> u8 {
        ((self.0 >> 8) & 0x7) as u8
    }

    /// The sub group (0-255)
    pub const fn sub(&self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

impl From<GroupAddress> for u16 {
    fn from(value: GroupAddress) -> Self {
        value.raw()
    }
}

impl core::fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}/{}", self.main(), self.middle(), self.sub())
    }
}

/// The physical address of a device, `area.line.device`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndividualAddress(u16);

impl IndividualAddress {
    /// Create an individual address from area, line and device number
    pub const fn new(area: u8, line: u8, device: u8) -> Result<Self, InvalidAddressError> {
        if area > 15 || line > 15 {
            return Err(InvalidAddressError);
        }
        Ok(IndividualAddress(
            ((area as u16) << 12) | ((line as u16) << 8) | device as u16,
        ))
    }

    /// Create an individual address from its raw 16-bit bus encoding
    pub const fn from_raw(raw: u16) -> Self {
        IndividualAddress(raw)
    }

    /// Get the raw 16-bit bus encoding
    pub const fn raw(&self) -> u16 {
        self.0
    }

    #[allow(missing_docs)]
    pub const fn area(&self) -> u8 {
        (self.0 >> 12) as u8
    }

    #[allow(missing_docs)]
    pub const fn line(&self) -> u8 {
        ((self.0 >> 8) & 0xf) as u8
    }

    #[allow(missing_docs)]
    pub const fn device(&self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

impl core::fmt::Display for IndividualAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.area(), self.line(), self.device())
    }
}

/// The destination of a telegram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// Multicast to all objects bound to the group
    Group(GroupAddress),
    /// Point-to-point to a single device
    Individual(IndividualAddress),
}

impl Address {
    /// Get the raw 16-bit bus encoding
    pub const fn raw(&self) -> u16 {
        match self {
            Address::Group(addr) => addr.raw(),
            Address::Individual(addr) => addr.raw(),
        }
    }

    /// Returns true for group addresses
    pub const fn is_group(&self) -> bool {
        matches!(self, Address::Group(_))
    }
}

impl From<GroupAddress> for Address {
    fn from(value: GroupAddress) -> Self {
        Address::Group(value)
    }
}

impl From<IndividualAddress> for Address {
    fn from(value: IndividualAddress) -> Self {
        Address::Individual(value)
    }
}

/// Returned when an address level is out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAddressError;

impl core::fmt::Display for InvalidAddressError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Invalid address")
    }
}
impl core::error::Error for InvalidAddressError {}
