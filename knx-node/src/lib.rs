//! KNX communication objects for a bus device
//!
//! A communication object is the unit of application state a KNX device exchanges with the bus:
//! a switch state, a temperature reading, a scene number. This crate implements the objects and a
//! table to own them. It is primarily intended to be run on microcontrollers, and so it is no_std
//! compatible, though it needs an allocator for objects whose value is longer than one byte.
//!
//! # Creating objects
//!
//! A device declares its objects with a list of
//! [`ComObjectDescriptor`](common::objects::ComObjectDescriptor)s, either statically or loaded
//! from a [`DeviceConfig`](common::device_config) TOML file on std targets, and creates them at
//! startup:
//!
//! ```
//! use knx_node::common::{ComFlags, ComObjectDescriptor, Dpt, GroupAddress};
//! use knx_node::ComObjectTable;
//!
//! static DESCRIPTORS: [ComObjectDescriptor; 2] = [
//!     ComObjectDescriptor::new(Dpt::Switch, ComFlags::from_bits(0x3C))
//!         .address(GroupAddress::from_raw(0x0001)),
//!     ComObjectDescriptor::new(Dpt::Temperature, ComFlags::from_bits(0x35))
//!         .address(GroupAddress::from_raw(0x0A03)),
//! ];
//!
//! let table = ComObjectTable::<8>::from_descriptors(&DESCRIPTORS).unwrap();
//! assert_eq!(2, table.len());
//! ```
//!
//! # Exchanging values
//!
//! Received telegrams are applied with [`ComObject::update_from_telegram`], which checks the
//! payload length against the object. To send, fill a telegram with
//! [`ComObject::copy_attributes`] and [`ComObject::copy_value`], or
//! [`ComObjectTable::prepare_telegram`] which does both using the address and priority stored in
//! the table.
//!
//! ```
//! use knx_node::common::{ComFlags, Dpt, GroupAddress, KnxTelegram, Priority};
//! use knx_node::ComObject;
//!
//! let mut obj = ComObject::new(Dpt::Temperature, ComFlags::NONE);
//! obj.update_value(&[0x0C, 0x1A]);
//!
//! let mut telegram = KnxTelegram::new();
//! obj.copy_attributes(&mut telegram, GroupAddress::from_raw(0x0A03), Priority::Low);
//! obj.copy_value(&mut telegram);
//! let frame = telegram.encode();
//! assert_eq!(11, frame.len());
//! ```
//!
//! # Concurrency
//!
//! Objects do no locking. Use [`SharedComObjects`] to share a table between contexts.
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod com_object;
mod com_object_table;
mod shared;

// Re-export types used by applications
pub use critical_section;
pub use knx_common as common;

pub use com_object::{ComObject, ComObjectError};
pub use com_object_table::{ComObjectTable, TableError};
pub use shared::SharedComObjects;
