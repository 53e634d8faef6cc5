//! Common functionality shared among the knx crates.
//!
//! This crate provides the pieces a communication object depends on: the datapoint type registry,
//! bus addresses, the [`Telegram`](telegram::Telegram) interface with a standard frame
//! implementation, and object flags and descriptors. With the `std` feature it can also load a
//! device configuration from TOML.
//!
//! Most users will have no reason to depend on this crate directly, as it is re-exported by
//! `knx-node`.
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs, missing_copy_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod address;
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod device_config;
pub mod dpt;
pub mod objects;
pub mod telegram;

pub use address::{Address, GroupAddress, IndividualAddress};
pub use dpt::{Dpt, DptFormat};
pub use objects::{ComFlags, ComObjectDescriptor};
pub use telegram::{KnxTelegram, Priority, Telegram, TelegramError};
