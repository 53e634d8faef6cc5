use integration_tests::sim_bus::{SimBus, SimDevice, SimError};
use knx_common::{
    device_config::DeviceConfig, telegram::ApciCommand, Address, GroupAddress, IndividualAddress,
    KnxTelegram, Priority, Telegram, TelegramError,
};
use knx_node::{ComObjectError, TableError};

mod utils;
use utils::*;

#[test]
fn test_temperature_reaches_all_bound_objects() {
    let mut bus = setup_bus();
    bus.device_mut(WEATHER)
        .objects
        .get_mut(weather::TEMPERATURE)
        .unwrap()
        .update_value(&[0x0C, 0x1A]);

    let deliveries = bus.transmit(WEATHER, weather::TEMPERATURE).unwrap();
    assert_eq!(1, deliveries.len());
    assert_eq!(PANEL, deliveries[0].device);
    assert_eq!(
        vec![panel::TEMPERATURE, panel::TEMPERATURE_LOG],
        deliveries[0].updated()
    );

    let panel = bus.device(PANEL);
    for index in [panel::TEMPERATURE, panel::TEMPERATURE_LOG] {
        let obj = panel.objects.get(index).unwrap();
        assert!(obj.is_valid());
        let mut value = [0u8; 2];
        obj.read_value(&mut value);
        assert_eq!([0x0C, 0x1A], value);
    }
    // Unrelated objects are untouched
    assert!(!panel.objects.get(panel::FROST_WARNING).unwrap().is_valid());

    assert_eq!(1, bus.history().len());
    assert_eq!(11, bus.history()[0].len());
}

#[test]
fn test_frame_attributes() {
    let mut bus = setup_bus();
    bus.device_mut(WEATHER)
        .objects
        .get_mut(weather::FROST_ALARM)
        .unwrap()
        .update_value(&[1]);
    bus.transmit(WEATHER, weather::FROST_ALARM).unwrap();

    let frame = &bus.history()[0];
    assert_eq!(9, frame.len());
    let telegram = KnxTelegram::from_bytes(frame).unwrap();
    assert_eq!(weather_address(), telegram.source());
    assert_eq!(
        Address::Group(GroupAddress::new(1, 2, 4).unwrap()),
        telegram.target()
    );
    assert_eq!(Priority::Urgent, telegram.priority());
    assert_eq!(ApciCommand::GroupValueWrite, telegram.command());
    assert_eq!(1, telegram.payload_length());
    assert_eq!(1, telegram.first_payload_byte());

    let mut value = [0u8];
    let panel = bus.device(PANEL);
    panel
        .objects
        .get(panel::FROST_WARNING)
        .unwrap()
        .read_value(&mut value);
    assert_eq!([1], value);
}

#[test]
fn test_longest_value_fills_largest_frame() {
    let mut bus = setup_bus();
    let text = *b"Sunny, 21 C   ";
    bus.device_mut(WEATHER)
        .objects
        .get_mut(weather::FORECAST)
        .unwrap()
        .update_value(&text);
    bus.transmit(WEATHER, weather::FORECAST).unwrap();

    assert_eq!(23, bus.history()[0].len());
    let mut received = [0u8; 14];
    bus.device(PANEL)
        .objects
        .get(panel::FORECAST)
        .unwrap()
        .read_value(&mut received);
    assert_eq!(text, received);
}

#[test]
fn test_mismatched_receiver_is_unchanged() {
    let mut bus = setup_bus();
    bus.device_mut(PANEL)
        .objects
        .get_mut(panel::WIND_GAUGE)
        .unwrap()
        .update_value(&[0x80]);
    bus.device_mut(WEATHER)
        .objects
        .get_mut(weather::WIND_SPEED)
        .unwrap()
        .update_value(&[0x01, 0x2C]);

    let deliveries = bus.transmit(WEATHER, weather::WIND_SPEED).unwrap();
    let updates = deliveries[0].result.as_ref().unwrap();
    assert_eq!(
        vec![(
            panel::WIND_GAUGE,
            Err(TableError::Object {
                source: ComObjectError::LengthMismatch {
                    expected: 2,
                    actual: 3
                }
            })
        )],
        *updates
    );

    let gauge = bus.device(PANEL).objects.get(panel::WIND_GAUGE).unwrap();
    let mut value = [0u8];
    gauge.read_value(&mut value);
    assert_eq!([0x80], value);
}

#[test]
fn test_corrupt_frame_rejected() {
    let mut bus = setup_bus();
    let mut frame = bus.device(WEATHER).encode_object(weather::TEMPERATURE).unwrap();
    let last = frame.len() - 1;
    frame[last] ^= 0xFF;

    let deliveries = bus.deliver(None, frame);
    assert_eq!(2, deliveries.len());
    for delivery in deliveries {
        assert!(matches!(
            delivery.result,
            Err(SimError::Telegram {
                source: TelegramError::BadChecksum { .. }
            })
        ));
    }
    assert!(!bus
        .device(PANEL)
        .objects
        .get(panel::TEMPERATURE)
        .unwrap()
        .is_valid());
}

#[test]
fn test_unbound_object_cannot_send() {
    let mut bus = setup_bus();
    let result = bus.transmit(PANEL, panel::BACKLIGHT);
    assert!(matches!(
        result,
        Err(SimError::Table {
            source: TableError::Unbound { index: 5 }
        })
    ));
    assert!(bus.history().is_empty());
}

#[test]
fn test_reply_after_rebinding() {
    let mut bus = setup_bus();
    let address = GroupAddress::new(1, 2, 6).unwrap();
    bus.device_mut(PANEL)
        .objects
        .set_address(panel::BACKLIGHT, Some(address))
        .unwrap();
    bus.device_mut(PANEL)
        .objects
        .get_mut(panel::BACKLIGHT)
        .unwrap()
        .update_value(&[0xFF]);

    // Nothing on the weather station listens on 1/2/6
    let deliveries = bus.transmit(PANEL, panel::BACKLIGHT).unwrap();
    assert_eq!(WEATHER, deliveries[0].device);
    assert!(deliveries[0].result.as_ref().unwrap().is_empty());

    let telegram = KnxTelegram::from_bytes(&bus.history()[0]).unwrap();
    assert_eq!(panel_address(), telegram.source());
    assert_eq!(2, telegram.payload_length());
    let mut payload = [0u8];
    telegram.read_payload(0, &mut payload);
    assert_eq!([0xFF], payload);
}

#[test]
fn test_rejecting_object_does_not_block_others() {
    const RECEIVER: &str = r#"
        device_name = "mixed-receiver"

        [[objects]]
        name = "Wrong type"
        dpt = "5.001"
        flags = "CW"
        group_address = "1/2/3"

        [[objects]]
        name = "Temperature"
        dpt = "9.001"
        flags = "CWI"
        group_address = "1/2/3"
    "#;
    let config = DeviceConfig::load_from_str(RECEIVER).unwrap();
    let receiver =
        SimDevice::from_config(&config, IndividualAddress::new(1, 1, 30).unwrap()).unwrap();
    let station = SimDevice::load(
        integration_tests::device_config_path("weather_station.toml"),
        weather_address(),
    )
    .unwrap();
    let mut bus = SimBus::new(vec![station, receiver]);
    bus.device_mut(0)
        .objects
        .get_mut(weather::TEMPERATURE)
        .unwrap()
        .update_value(&[0x0C, 0x1A]);

    let deliveries = bus.transmit(0, weather::TEMPERATURE).unwrap();
    let updates = deliveries[0].result.as_ref().unwrap();
    assert_eq!(2, updates.len());
    assert!(matches!(updates[0], (0, Err(TableError::Object { .. }))));
    assert_eq!((1, Ok(())), updates[1]);
    assert_eq!(vec![1], deliveries[0].updated());

    let temperature = bus.device(1).objects.get(1).unwrap();
    assert!(temperature.is_valid());
    let mut value = [0u8; 2];
    temperature.read_value(&mut value);
    assert_eq!([0x0C, 0x1A], value);
}

#[test]
fn test_inactive_object_ignores_frames() {
    let mut bus = setup_bus();
    bus.device_mut(PANEL)
        .objects
        .set_active(panel::TEMPERATURE_LOG, false)
        .unwrap();
    bus.device_mut(WEATHER)
        .objects
        .get_mut(weather::TEMPERATURE)
        .unwrap()
        .update_value(&[0x0C, 0x1A]);

    let deliveries = bus.transmit(WEATHER, weather::TEMPERATURE).unwrap();
    assert_eq!(vec![panel::TEMPERATURE], deliveries[0].updated());
    let panel = bus.device(PANEL);
    assert!(panel.objects.get(panel::TEMPERATURE).unwrap().is_valid());
    assert!(!panel.objects.get(panel::TEMPERATURE_LOG).unwrap().is_valid());
}

#[test]
fn test_inactive_object_cannot_send() {
    let mut bus = setup_bus();
    bus.device_mut(WEATHER)
        .objects
        .set_active(weather::TEMPERATURE, false)
        .unwrap();

    let result = bus.transmit(WEATHER, weather::TEMPERATURE);
    assert!(matches!(
        result,
        Err(SimError::Table {
            source: TableError::Inactive { index: 0 }
        })
    ));
    assert!(bus.history().is_empty());

    bus.device_mut(WEATHER)
        .objects
        .set_active(weather::TEMPERATURE, true)
        .unwrap();
    assert!(bus.transmit(WEATHER, weather::TEMPERATURE).is_ok());
    assert_eq!(1, bus.history().len());
}
