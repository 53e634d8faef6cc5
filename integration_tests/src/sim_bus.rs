//! A simulated bus line carrying encoded frames between devices
//!
//! Every frame sent on the bus is encoded to bytes, recorded in the bus history, and decoded again
//! by each receiving device, so tests exercise the same path as a real line.
use knx_common::{
    device_config::{DeviceConfig, LoadError},
    Address, IndividualAddress, KnxTelegram, Telegram, TelegramError,
};
use knx_node::{ComObjectTable, TableError};
use snafu::Snafu;

/// Maximum number of objects a simulated device can hold
pub const DEVICE_CAPACITY: usize = 16;

#[derive(Debug, Snafu)]
pub enum SimError {
    #[snafu(context(false), display("{source}"))]
    Load { source: LoadError },
    #[snafu(context(false), display("{source}"))]
    Table { source: TableError },
    #[snafu(context(false), display("{source}"))]
    Telegram { source: TelegramError },
    #[snafu(display("No device {index} on the bus"))]
    NoSuchDevice { index: usize },
}

/// A device with a table of objects created from a config file
#[derive(Debug)]
pub struct SimDevice {
    pub name: String,
    pub address: IndividualAddress,
    pub objects: ComObjectTable<DEVICE_CAPACITY>,
}

impl SimDevice {
    pub fn from_config(
        config: &DeviceConfig,
        address: IndividualAddress,
    ) -> Result<Self, SimError> {
        let objects = ComObjectTable::from_descriptors(&config.descriptors())?;
        Ok(Self {
            name: config.device_name.clone(),
            address,
            objects,
        })
    }

    pub fn load(
        config_path: impl AsRef<std::path::Path>,
        address: IndividualAddress,
    ) -> Result<Self, SimError> {
        let config = DeviceConfig::load(config_path)?;
        Self::from_config(&config, address)
    }

    /// Build the encoded frame which sends the value of object `index`
    pub fn encode_object(&self, index: usize) -> Result<Vec<u8>, SimError> {
        let mut telegram = KnxTelegram::new();
        telegram.set_source(self.address);
        self.objects.prepare_telegram(index, &mut telegram)?;
        Ok(telegram.encode().to_vec())
    }

    /// Decode a frame and apply it to every active object bound to its target group address
    ///
    /// Returns the result for each of those objects, in object number order. An object rejecting
    /// the telegram does not stop delivery to the others. Frames sent to an individual address are
    /// ignored.
    pub fn receive(&mut self, frame: &[u8]) -> Result<Vec<ObjectUpdate>, SimError> {
        let telegram = KnxTelegram::from_bytes(frame)?;
        let Address::Group(address) = telegram.target() else {
            return Ok(Vec::new());
        };
        let indices: Vec<usize> = self.objects.find_by_address(address).collect();
        Ok(indices
            .into_iter()
            .map(|index| (index, self.objects.update_from_telegram(index, &telegram)))
            .collect())
    }
}

/// An object number and the result of applying a telegram to it
pub type ObjectUpdate = (usize, Result<(), TableError>);

/// The outcome of delivering a frame to one device
#[derive(Debug)]
pub struct Delivery {
    pub device: usize,
    pub result: Result<Vec<ObjectUpdate>, SimError>,
}

impl Delivery {
    /// Numbers of the objects which accepted the frame
    pub fn updated(&self) -> Vec<usize> {
        match &self.result {
            Ok(updates) => updates
                .iter()
                .filter(|(_, r)| r.is_ok())
                .map(|(i, _)| *i)
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SimBus {
    devices: Vec<SimDevice>,
    history: Vec<Vec<u8>>,
}

impl SimBus {
    pub fn new(devices: Vec<SimDevice>) -> Self {
        Self {
            devices,
            history: Vec::new(),
        }
    }

    pub fn device(&self, index: usize) -> &SimDevice {
        &self.devices[index]
    }

    pub fn device_mut(&mut self, index: usize) -> &mut SimDevice {
        &mut self.devices[index]
    }

    /// All frames sent on the bus, oldest first
    pub fn history(&self) -> &[Vec<u8>] {
        &self.history
    }

    /// Send the value of object `index` on device `sender` to all other devices
    pub fn transmit(&mut self, sender: usize, index: usize) -> Result<Vec<Delivery>, SimError> {
        let frame = self
            .devices
            .get(sender)
            .ok_or(SimError::NoSuchDevice { index: sender })?
            .encode_object(index)?;
        Ok(self.deliver(Some(sender), frame))
    }

    /// Put a raw frame on the bus, delivering it to every device except `sender`
    pub fn deliver(&mut self, sender: Option<usize>, frame: Vec<u8>) -> Vec<Delivery> {
        let deliveries = self
            .devices
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| Some(*i) != sender)
            .map(|(device, dev)| Delivery {
                device,
                result: dev.receive(&frame),
            })
            .collect();
        self.history.push(frame);
        deliveries
    }
}
