//! A device with a statically declared object list
//!
//! On an MCU the receive path would run in the bus interrupt and the send path in the main loop.
//! Here both run on one thread, exchanging frames through a byte buffer.
use knx_node::common::{
    Address, ComFlags, ComObjectDescriptor, Dpt, GroupAddress, IndividualAddress, KnxTelegram,
    Priority, Telegram,
};
use knx_node::{ComObjectTable, SharedComObjects};

const SWITCH: usize = 0;
const BRIGHTNESS: usize = 1;
const ROOM_TEMP: usize = 2;

static DESCRIPTORS: [ComObjectDescriptor; 3] = [
    ComObjectDescriptor::new(Dpt::Switch, ComFlags::from_bits(0x2B))
        .address(GroupAddress::from_raw(0x0801)),
    ComObjectDescriptor::new(Dpt::Scaling, ComFlags::from_bits(0x3C))
        .address(GroupAddress::from_raw(0x0802)),
    ComObjectDescriptor::new(Dpt::Temperature, ComFlags::from_bits(0x34))
        .address(GroupAddress::from_raw(0x0A03))
        .priority(Priority::Normal),
];

static OBJECTS: SharedComObjects<8> = SharedComObjects::new();

/// Receive path: apply a frame to every object listening on its target
fn on_frame(frame: &[u8]) {
    let telegram = match KnxTelegram::from_bytes(frame) {
        Ok(t) => t,
        Err(e) => {
            println!("Dropping frame: {e}");
            return;
        }
    };
    let Address::Group(address) = telegram.target() else {
        return;
    };
    OBJECTS.with(|table| {
        let indices: Vec<usize> = table.find_by_address(address).collect();
        for index in indices {
            match table.update_from_telegram(index, &telegram) {
                Ok(()) => println!("Object {index} updated from {}", telegram.source()),
                Err(e) => println!("Object {index}: {e}"),
            }
        }
    });
}

fn main() {
    let table = ComObjectTable::from_descriptors(&DESCRIPTORS).expect("Too many objects");
    OBJECTS.replace(table);

    // A wall switch on the same group address turns the light on
    let mut wall_switch = ComObjectTable::<1>::from_descriptors(&DESCRIPTORS[..1]).unwrap();
    wall_switch.get_mut(0).unwrap().update_value(&[1]);
    let mut telegram = KnxTelegram::new();
    telegram.set_source(IndividualAddress::new(1, 1, 5).unwrap());
    wall_switch.prepare_telegram(0, &mut telegram).unwrap();
    on_frame(telegram.encode());

    // A corrupted frame is rejected before it reaches any object
    let mut corrupt = telegram.encode().to_vec();
    corrupt[8] ^= 0x01;
    on_frame(&corrupt);

    OBJECTS.with(|table| {
        let mut value = [0u8];
        table.get(SWITCH).unwrap().read_value(&mut value);
        println!("Switch is {}", if value[0] != 0 { "on" } else { "off" });

        // The application reports brightness and temperature
        table.get_mut(BRIGHTNESS).unwrap().update_value(&[0xCC]);
        table.get_mut(ROOM_TEMP).unwrap().update_value(&[0x0C, 0x1A]);
    });

    for index in [BRIGHTNESS, ROOM_TEMP] {
        let mut telegram = KnxTelegram::new();
        OBJECTS
            .with(|table| table.prepare_telegram(index, &mut telegram))
            .unwrap();
        println!("Object {index} sends {:02x?}", telegram.encode());
    }
}
