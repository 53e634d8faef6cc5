//! A fixed capacity table owning the communication objects of a device
//!
//! Objects are numbered by their position in the descriptor list used to create the table. Along
//! with each object the table stores the group address and priority used when the object sends,
//! since these are device configuration rather than object state.
//!
//! The table also decides which objects take part in bus traffic. An object is active while it is
//! bound to a group address, and [`ComObjectTable::set_active`] overrides this. Inactive objects do
//! not send, and received telegrams are not applied to them.
use defmt_or_log::{debug, info};
use heapless::Vec;
use knx_common::{
    address::GroupAddress,
    objects::ComObjectDescriptor,
    telegram::{Priority, Telegram},
};
use snafu::Snafu;

use crate::com_object::{ComObject, ComObjectError};

/// Error returned by [`ComObjectTable`] operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum TableError {
    /// More descriptors were provided than the table can hold
    #[snafu(display("Table capacity of {capacity} objects exceeded"))]
    CapacityExceeded {
        /// The table capacity
        capacity: usize,
    },
    /// There is no object with the given number
    #[snafu(display("No communication object {index}"))]
    NoSuchObject {
        /// The requested object number
        index: usize,
    },
    /// The object has no group address to send to
    #[snafu(display("Communication object {index} is not bound to a group address"))]
    Unbound {
        /// The requested object number
        index: usize,
    },
    /// The object is not taking part in bus traffic
    #[snafu(display("Communication object {index} is inactive"))]
    Inactive {
        /// The requested object number
        index: usize,
    },
    /// The object rejected the operation
    #[snafu(context(false), display("{source}"))]
    Object {
        /// The object error
        source: ComObjectError,
    },
}

#[derive(Debug)]
struct Entry {
    object: ComObject,
    address: Option<GroupAddress>,
    priority: Priority,
}

/// Owns up to `N` communication objects and their send attributes
#[derive(Debug)]
pub struct ComObjectTable<const N: usize> {
    entries: Vec<Entry, N>,
}

impl<const N: usize> Default for ComObjectTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ComObjectTable<N> {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a table with one object per descriptor
    ///
    /// # Errors
    ///
    /// - [`TableError::CapacityExceeded`] if there are more than `N` descriptors
    pub fn from_descriptors(descriptors: &[ComObjectDescriptor]) -> Result<Self, TableError> {
        let mut table = Self::new();
        for desc in descriptors {
            table.push(desc)?;
        }
        info!("Created {} communication objects", table.len());
        Ok(table)
    }

    /// Create a new object from a descriptor and append it to the table
    ///
    /// Returns the number of the new object, which is active if the descriptor has a group
    /// address.
    pub fn push(&mut self, desc: &ComObjectDescriptor) -> Result<usize, TableError> {
        let mut object = ComObject::new(desc.dpt, desc.flags);
        object.set_active(desc.address.is_some());
        let entry = Entry {
            object,
            address: desc.address,
            priority: desc.priority,
        };
        self.entries
            .push(entry)
            .map_err(|_| TableError::CapacityExceeded { capacity: N })?;
        Ok(self.entries.len() - 1)
    }

    /// The number of objects in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no objects
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an object by number
    pub fn get(&self, index: usize) -> Option<&ComObject> {
        self.entries.get(index).map(|e| &e.object)
    }

    /// Get a mutable reference to an object by number
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ComObject> {
        self.entries.get_mut(index).map(|e| &mut e.object)
    }

    /// Iterate over all objects in number order
    pub fn iter(&self) -> impl Iterator<Item = &ComObject> {
        self.entries.iter().map(|e| &e.object)
    }

    /// Get the group address an object sends to
    pub fn address(&self, index: usize) -> Option<GroupAddress> {
        self.entries.get(index).and_then(|e| e.address)
    }

    /// Bind an object to a group address, or unbind it with `None`
    ///
    /// Binding activates the object and unbinding deactivates it.
    pub fn set_address(
        &mut self,
        index: usize,
        address: Option<GroupAddress>,
    ) -> Result<(), TableError> {
        let entry = self.entry_mut(index)?;
        entry.address = address;
        entry.object.set_active(address.is_some());
        Ok(())
    }

    /// Enable or disable bus traffic for an object
    pub fn set_active(&mut self, index: usize, active: bool) -> Result<(), TableError> {
        let entry = self.entry_mut(index)?;
        entry.object.set_active(active);
        debug!("Object {} active: {}", index, active);
        Ok(())
    }

    /// Get the priority an object sends with
    pub fn priority(&self, index: usize) -> Option<Priority> {
        self.entries.get(index).map(|e| e.priority)
    }

    /// Iterate over the numbers of all active objects bound to `address`
    pub fn find_by_address(&self, address: GroupAddress) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.address == Some(address) && e.object.is_active())
            .map(|(i, _)| i)
    }

    /// Fill an outgoing telegram with the attributes and value of an object
    ///
    /// # Errors
    ///
    /// - [`TableError::NoSuchObject`] if `index` is out of range
    /// - [`TableError::Unbound`] if the object has no group address
    /// - [`TableError::Inactive`] if the object is inactive
    pub fn prepare_telegram<T: Telegram + ?Sized>(
        &self,
        index: usize,
        dest: &mut T,
    ) -> Result<(), TableError> {
        let entry = self
            .entries
            .get(index)
            .ok_or(TableError::NoSuchObject { index })?;
        let address = entry.address.ok_or(TableError::Unbound { index })?;
        if !entry.object.is_active() {
            return InactiveSnafu { index }.fail();
        }
        entry.object.copy_attributes(dest, address, entry.priority);
        entry.object.copy_value(dest);
        Ok(())
    }

    /// Update an object from the payload of a received telegram
    ///
    /// # Errors
    ///
    /// - [`TableError::NoSuchObject`] if `index` is out of range
    /// - [`TableError::Inactive`] if the object is inactive
    /// - [`TableError::Object`] if the object rejects the telegram, see
    ///   [`ComObject::update_from_telegram`]
    pub fn update_from_telegram<T: Telegram + ?Sized>(
        &mut self,
        index: usize,
        telegram: &T,
    ) -> Result<(), TableError> {
        let entry = self.entry_mut(index)?;
        if !entry.object.is_active() {
            return InactiveSnafu { index }.fail();
        }
        if let Err(e) = entry.object.update_from_telegram(telegram) {
            debug!("Object {} rejected telegram", index);
            return Err(e.into());
        }
        Ok(())
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut Entry, TableError> {
        self.entries
            .get_mut(index)
            .ok_or(TableError::NoSuchObject { index })
    }
}

#[cfg(test)]
mod tests {
    use knx_common::{
        address::Address,
        dpt::Dpt,
        objects::ComFlags,
        telegram::KnxTelegram,
    };

    use super::*;

    const TEMP_ADDR: GroupAddress = GroupAddress::from_raw(0x0A03);
    const SWITCH_ADDR: GroupAddress = GroupAddress::from_raw(0x0001);

    const DESCRIPTORS: [ComObjectDescriptor; 3] = [
        ComObjectDescriptor::new(Dpt::Temperature, ComFlags::COMMUNICATION)
            .address(TEMP_ADDR)
            .priority(Priority::Normal),
        ComObjectDescriptor::new(Dpt::Switch, ComFlags::INIT_READ).address(SWITCH_ADDR),
        ComObjectDescriptor::new(Dpt::StringAscii, ComFlags::NONE),
    ];

    #[test]
    fn test_from_descriptors() {
        let table = ComObjectTable::<4>::from_descriptors(&DESCRIPTORS).unwrap();
        assert_eq!(3, table.len());
        assert!(!table.is_empty());
        assert_eq!(Dpt::Temperature, table.get(0).unwrap().dpt());
        assert!(!table.get(1).unwrap().is_valid());
        assert_eq!(15, table.get(2).unwrap().length());
        assert!(table.get(3).is_none());
        assert_eq!(Some(TEMP_ADDR), table.address(0));
        assert_eq!(None, table.address(2));
        assert_eq!(Some(Priority::Normal), table.priority(0));
        assert_eq!(Some(Priority::Low), table.priority(1));
        assert_eq!(3, table.iter().count());
        let active: std::vec::Vec<bool> = table.iter().map(|o| o.is_active()).collect();
        assert_eq!(vec![true, true, false], active);
    }

    #[test]
    fn test_capacity_exceeded() {
        let result = ComObjectTable::<2>::from_descriptors(&DESCRIPTORS);
        assert_eq!(
            Err(TableError::CapacityExceeded { capacity: 2 }),
            result.map(|t| t.len())
        );
    }

    #[test]
    fn test_find_by_address() {
        let mut table = ComObjectTable::<4>::from_descriptors(&DESCRIPTORS).unwrap();
        assert_eq!(vec![0], table.find_by_address(TEMP_ADDR).collect::<std::vec::Vec<_>>());
        table.set_address(2, Some(TEMP_ADDR)).unwrap();
        assert_eq!(
            vec![0, 2],
            table.find_by_address(TEMP_ADDR).collect::<std::vec::Vec<_>>()
        );
        assert_eq!(
            Err(TableError::NoSuchObject { index: 5 }),
            table.set_address(5, None)
        );
    }

    #[test]
    fn test_prepare_telegram() {
        let mut table = ComObjectTable::<4>::from_descriptors(&DESCRIPTORS).unwrap();
        table.get_mut(0).unwrap().update_value(&[0x0C, 0x1A]);

        let mut telegram = KnxTelegram::new();
        table.prepare_telegram(0, &mut telegram).unwrap();
        assert_eq!(Address::Group(TEMP_ADDR), telegram.target());
        assert_eq!(Priority::Normal, telegram.priority());
        assert_eq!(3, telegram.payload_length());
        let mut payload = [0u8; 2];
        telegram.read_payload(0, &mut payload);
        assert_eq!([0x0C, 0x1A], payload);

        assert_eq!(
            Err(TableError::Unbound { index: 2 }),
            table.prepare_telegram(2, &mut telegram)
        );
        assert_eq!(
            Err(TableError::NoSuchObject { index: 3 }),
            table.prepare_telegram(3, &mut telegram)
        );
    }

    #[test]
    fn test_inactive_object_neither_sends_nor_receives() {
        let mut table = ComObjectTable::<4>::from_descriptors(&DESCRIPTORS).unwrap();
        table.set_active(1, false).unwrap();
        assert!(!table.get(1).unwrap().is_active());

        let mut telegram = KnxTelegram::new();
        assert_eq!(
            Err(TableError::Inactive { index: 1 }),
            table.prepare_telegram(1, &mut telegram)
        );

        telegram.set_first_payload_byte(1);
        assert_eq!(
            Err(TableError::Inactive { index: 1 }),
            table.update_from_telegram(1, &telegram)
        );
        assert!(!table.get(1).unwrap().is_valid());
        assert_eq!(0, table.find_by_address(SWITCH_ADDR).count());

        table.set_active(1, true).unwrap();
        assert_eq!(vec![1], table.find_by_address(SWITCH_ADDR).collect::<std::vec::Vec<_>>());
        table.update_from_telegram(1, &telegram).unwrap();
        assert!(table.get(1).unwrap().is_valid());
        table.prepare_telegram(1, &mut telegram).unwrap();

        assert_eq!(
            Err(TableError::NoSuchObject { index: 4 }),
            table.set_active(4, true)
        );
    }

    #[test]
    fn test_binding_controls_activity() {
        let mut table = ComObjectTable::<4>::from_descriptors(&DESCRIPTORS).unwrap();
        table.set_address(2, Some(SWITCH_ADDR)).unwrap();
        assert!(table.get(2).unwrap().is_active());
        table.set_address(0, None).unwrap();
        assert!(!table.get(0).unwrap().is_active());
        assert_eq!(
            vec![1, 2],
            table.find_by_address(SWITCH_ADDR).collect::<std::vec::Vec<_>>()
        );
    }

    #[test]
    fn test_update_from_telegram() {
        let mut table = ComObjectTable::<4>::from_descriptors(&DESCRIPTORS).unwrap();
        let mut telegram = KnxTelegram::new();
        telegram.set_first_payload_byte(1);
        table.update_from_telegram(1, &telegram).unwrap();
        assert!(table.get(1).unwrap().is_valid());

        assert_eq!(
            Err(TableError::Object {
                source: ComObjectError::LengthMismatch {
                    expected: 3,
                    actual: 1
                }
            }),
            table.update_from_telegram(0, &telegram)
        );
    }
}
