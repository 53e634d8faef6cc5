#![allow(dead_code)]
use integration_tests::{
    device_config_path,
    sim_bus::{SimBus, SimDevice},
};
use knx_common::IndividualAddress;

pub const WEATHER: usize = 0;
pub const PANEL: usize = 1;

/// Object numbers on the weather station, in config file order
pub mod weather {
    pub const TEMPERATURE: usize = 0;
    pub const FROST_ALARM: usize = 1;
    pub const WIND_SPEED: usize = 2;
    pub const FORECAST: usize = 3;
}

/// Object numbers on the display panel, in config file order
pub mod panel {
    pub const TEMPERATURE: usize = 0;
    pub const FROST_WARNING: usize = 1;
    pub const WIND_GAUGE: usize = 2;
    pub const FORECAST: usize = 3;
    pub const TEMPERATURE_LOG: usize = 4;
    pub const BACKLIGHT: usize = 5;
}

pub fn weather_address() -> IndividualAddress {
    IndividualAddress::new(1, 1, 10).unwrap()
}

pub fn panel_address() -> IndividualAddress {
    IndividualAddress::new(1, 1, 20).unwrap()
}

/// Create a bus with the weather station and the display panel
pub fn setup_bus() -> SimBus {
    let weather = SimDevice::load(device_config_path("weather_station.toml"), weather_address())
        .unwrap();
    let panel =
        SimDevice::load(device_config_path("display_panel.toml"), panel_address()).unwrap();
    SimBus::new(vec![weather, panel])
}
