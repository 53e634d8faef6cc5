//! Device config file
//!
//! A DeviceConfig is created from a TOML file, and lists the communication objects of a device.
//! Each entry becomes a [`ComObjectDescriptor`], from which the node creates its objects at
//! startup.
//!
//! # An example TOML file
//!
//! ```toml
//! device_name = "weather-station"
//!
//! [[objects]]
//! name = "Outside temperature"
//! dpt = "9.001"
//! flags = "CRT"
//! group_address = "1/2/3"
//!
//! [[objects]]
//! name = "Frost alarm"
//! dpt = "DPT1.005"
//! flags = "CRTI"
//! group_address = "1/2/4"
//! priority = "urgent"
//!
//! # Objects without a group address are created unbound
//! [[objects]]
//! name = "Display text"
//! dpt = "16.000"
//! flags = "CW"
//! ```
//!
//! # Fields
//!
//! - `dpt`: the datapoint type as `main.sub`, optionally prefixed with `DPT`.
//! - `flags`: indicator letters, any of `C`, `R`, `W`, `T`, `U`, `I`. Defaults to none.
//! - `group_address`: a 3-level group address `main/middle/sub`.
//! - `priority`: one of `system`, `urgent`, `normal`, `low`. Defaults to `low`.
use serde::{de::Error, Deserialize};
use snafu::ResultExt as _;
use snafu::Snafu;

use crate::{
    address::GroupAddress,
    dpt::Dpt,
    objects::{ComFlags, ComObjectDescriptor},
    telegram::Priority,
};

/// Error returned when loading a device config fails
#[derive(Debug, Snafu)]
pub enum LoadError {
    /// An IO error occured while reading the file
    #[snafu(display("IO error: {source}"))]
    Io {
        /// The underlying IO error
        source: std::io::Error,
    },
    /// An error occured in the TOML parser
    #[snafu(display("Toml parse error: {source}"))]
    TomlParsing {
        /// The toml error which led to this error
        source: toml::de::Error,
    },
}

/// The top level device configuration
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// A human readable name for the device
    #[serde(default)]
    pub device_name: String,
    /// The communication objects, in object number order
    #[serde(default)]
    pub objects: Vec<ObjectDefinition>,
}

/// Descriptor for a communication object
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ObjectDefinition {
    /// A human readable name to describe the object
    #[serde(default)]
    pub name: String,
    /// The datapoint type
    pub dpt: DptDeser,
    /// The indicator flags
    #[serde(default)]
    pub flags: FlagsDeser,
    /// The group address the object sends to
    pub group_address: Option<GroupAddressDeser>,
    /// The send priority
    #[serde(default)]
    pub priority: PriorityDeser,
}

impl ObjectDefinition {
    /// Convert the definition into a runtime descriptor
    pub fn descriptor(&self) -> ComObjectDescriptor {
        ComObjectDescriptor {
            dpt: self.dpt.0,
            flags: self.flags.0,
            address: self.group_address.map(|a| a.0),
            priority: self.priority.0,
        }
    }
}

impl DeviceConfig {
    /// Try to read a device config from a file
    pub fn load(config_path: impl AsRef<std::path::Path>) -> Result<Self, LoadError> {
        let config_str = std::fs::read_to_string(&config_path).context(IoSnafu)?;
        Self::load_from_str(&config_str)
    }

    /// Try to read a config from a &str
    pub fn load_from_str(config_str: &str) -> Result<Self, LoadError> {
        toml::from_str(config_str).context(TomlParsingSnafu)
    }

    /// Get the runtime descriptors for all objects, in object number order
    pub fn descriptors(&self) -> Vec<ComObjectDescriptor> {
        self.objects.iter().map(|obj| obj.descriptor()).collect()
    }
}

/// A newtype on Dpt to implement deserialization from `"main.sub"` strings
#[derive(Clone, Copy, Debug)]
pub struct DptDeser(pub Dpt);
impl<'de> serde::Deserialize<'de> for DptDeser {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let re_dpt = regex::Regex::new(r"^(?:dpt\s*)?(\d+)\.(\d+)$").unwrap();

        let s = String::deserialize(deserializer)?;
        let caps = re_dpt
            .captures(s.trim().to_lowercase().as_str())
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .ok_or_else(|| D::Error::custom(format!("Invalid datapoint type: {}", s)))?;
        let (main, sub): (u16, u16) = match (caps.0.parse(), caps.1.parse()) {
            (Ok(main), Ok(sub)) => (main, sub),
            _ => return Err(D::Error::custom(format!("Invalid datapoint type: {}", s))),
        };
        Dpt::from_number(main, sub)
            .map(DptDeser)
            .ok_or_else(|| D::Error::custom(format!("Unsupported datapoint type: {}", s)))
    }
}

/// A newtype on ComFlags to implement deserialization from indicator letters
#[derive(Clone, Copy, Debug, Default)]
pub struct FlagsDeser(pub ComFlags);
impl<'de> serde::Deserialize<'de> for FlagsDeser {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ComFlags::from_letters(s.trim())
            .map(FlagsDeser)
            .map_err(|c| {
                D::Error::custom(format!(
                    "Invalid flag '{}' in {} (allowed: 'C', 'R', 'W', 'T', 'U', 'I')",
                    c, s
                ))
            })
    }
}

/// A newtype on GroupAddress to implement deserialization from `"main/middle/sub"` strings
#[derive(Clone, Copy, Debug)]
pub struct GroupAddressDeser(pub GroupAddress);
impl<'de> serde::Deserialize<'de> for GroupAddressDeser {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let re_group = regex::Regex::new(r"^(\d+)/(\d+)/(\d+)$").unwrap();

        let s = String::deserialize(deserializer)?;
        let invalid = || D::Error::custom(format!("Invalid group address: {}", s));
        let caps = re_group.captures(s.trim()).ok_or_else(invalid)?;
        let mut levels = [0u8; 3];
        for (i, level) in levels.iter_mut().enumerate() {
            *level = caps[i + 1].parse().map_err(|_| invalid())?;
        }
        GroupAddress::new(levels[0], levels[1], levels[2])
            .map(GroupAddressDeser)
            .map_err(|_| invalid())
    }
}

/// A newtype on Priority to implement deserialization
#[derive(Clone, Copy, Debug, Default)]
pub struct PriorityDeser(pub Priority);
impl<'de> serde::Deserialize<'de> for PriorityDeser {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.to_lowercase().as_str() {
            "system" => Ok(PriorityDeser(Priority::System)),
            "urgent" => Ok(PriorityDeser(Priority::Urgent)),
            "normal" => Ok(PriorityDeser(Priority::Normal)),
            "low" => Ok(PriorityDeser(Priority::Low)),
            _ => Err(D::Error::custom(format!(
                "Invalid priority: {} (allowed: 'system', 'urgent', 'normal', or 'low')",
                s
            ))),
        }
    }
}
