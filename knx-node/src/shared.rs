//! Shared access to a table of communication objects
//!
//! [`ComObject`](crate::ComObject) does no locking of its own. When the bus processing and the
//! application run in different contexts (e.g. an interrupt handler and the main loop), the table
//! can be placed in a [`SharedComObjects`] static, and every access is made inside a critical
//! section.
use core::cell::RefCell;

use critical_section::Mutex;

use crate::com_object_table::ComObjectTable;

/// A [`ComObjectTable`] protected by a critical section mutex
///
/// ```ignore
/// static OBJECTS: SharedComObjects<8> = SharedComObjects::new();
///
/// OBJECTS.replace(ComObjectTable::from_descriptors(&DESCRIPTORS)?);
/// OBJECTS.with(|table| table.update_from_telegram(0, &telegram))?;
/// ```
#[derive(Debug)]
pub struct SharedComObjects<const N: usize> {
    inner: Mutex<RefCell<ComObjectTable<N>>>,
}

impl<const N: usize> Default for SharedComObjects<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SharedComObjects<N> {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(ComObjectTable::new())),
        }
    }

    /// Replace the table, returning the previous one
    pub fn replace(&self, table: ComObjectTable<N>) -> ComObjectTable<N> {
        critical_section::with(|cs| self.inner.borrow(cs).replace(table))
    }

    /// Run `f` with exclusive access to the table
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from within `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut ComObjectTable<N>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }
}
