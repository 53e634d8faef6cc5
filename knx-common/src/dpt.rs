//! Datapoint type registry
//!
//! Every [`Dpt`] maps to a [`DptFormat`], and every format has a fixed bit width. The size of a
//! telegram payload carrying the datapoint follows from the width: a value of `n` bits occupies
//! `n / 8 + 1` payload bytes, where the first byte is the 6-bit field shared with the APCI.
//!
//! Both lookups are exhaustive matches, so the registry is total over the [`Dpt`] type and an
//! unknown identifier cannot reach the length computation.

/// The encoding format of a datapoint, named after the KNX format notation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum DptFormat {
    B1,
    B2,
    B1U3,
    A8,
    U8,
    V8,
    B5N3,
    B8,
    N8,
    R2U6,
    B1R1U6,
    U16,
    V16,
    F16,
    N3N5R2N6N2N6,
    R3N5R4U4R1U7,
    U8U8U8,
    U32,
    V32,
    F32,
    V64,
    /// Date and time, `U8[r4U4][r3U5][U3U5][r2U6][r2U6]B16`
    DateTime,
    /// 14 character string
    A112,
}

impl DptFormat {
    /// The number of bits used by a value of this format
    pub const fn bit_width(self) -> u8 {
        use DptFormat::*;
        match self {
            B1 => 1,
            B2 => 2,
            B1U3 => 4,
            A8 | U8 | V8 | B5N3 | B8 | N8 | R2U6 | B1R1U6 => 8,
            U16 | V16 | F16 => 16,
            N3N5R2N6N2N6 | R3N5R4U4R1U7 | U8U8U8 => 24,
            U32 | V32 | F32 => 32,
            V64 | DateTime => 64,
            A112 => 112,
        }
    }
}

/// A datapoint type supported by the registry
///
/// Variant names follow the KNX datapoint names; use [`Dpt::number`] for the `main.sub` number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Dpt {
    // 1.xxx
    Switch,
    Bool,
    Enable,
    Alarm,
    UpDown,
    OpenClose,
    Start,
    Trigger,
    Occupancy,
    WindowDoor,
    HeatCool,
    // 2.xxx
    SwitchControl,
    // 3.xxx
    DimmingControl,
    BlindControl,
    // 4.xxx
    CharAscii,
    CharLatin1,
    // 5.xxx
    Scaling,
    Angle,
    Percent8,
    Counter8,
    // 6.xxx
    PercentV8,
    CounterV8,
    // 7.xxx
    Pulses16,
    TimePeriodMsec,
    TimePeriodHours,
    // 8.xxx
    PulsesDiff16,
    DeltaTimeMsec,
    // 9.xxx
    Temperature,
    Illuminance,
    WindSpeed,
    Pressure,
    Humidity,
    Voltage,
    Current,
    // 10.001, 11.001
    TimeOfDay,
    Date,
    // 12.xxx, 13.xxx
    Counter32,
    CounterV32,
    ActiveEnergy,
    // 14.xxx
    ElectricCurrent,
    ElectricPotential,
    Power,
    // 16.xxx
    StringAscii,
    StringLatin1,
    // 17.001, 18.001
    SceneNumber,
    SceneControl,
    // 19.001
    DateTime,
    // 20.102
    HvacMode,
    // 21.001
    StatusGen,
    // 29.010
    ActiveEnergyV64,
    // 232.600
    ColourRgb,
}

impl Dpt {
    /// All datapoint types known to the registry
    pub const ALL: &'static [Dpt] = &[
        Dpt::Switch,
        Dpt::Bool,
        Dpt::Enable,
        Dpt::Alarm,
        Dpt::UpDown,
        Dpt::OpenClose,
        Dpt::Start,
        Dpt::Trigger,
        Dpt::Occupancy,
        Dpt::WindowDoor,
        Dpt::HeatCool,
        Dpt::SwitchControl,
        Dpt::DimmingControl,
        Dpt::BlindControl,
        Dpt::CharAscii,
        Dpt::CharLatin1,
        Dpt::Scaling,
        Dpt::Angle,
        Dpt::Percent8,
        Dpt::Counter8,
        Dpt::PercentV8,
        Dpt::CounterV8,
        Dpt::Pulses16,
        Dpt::TimePeriodMsec,
        Dpt::TimePeriodHours,
        Dpt::PulsesDiff16,
        Dpt::DeltaTimeMsec,
        Dpt::Temperature,
        Dpt::Illuminance,
        Dpt::WindSpeed,
        Dpt::Pressure,
        Dpt::Humidity,
        Dpt::Voltage,
        Dpt::Current,
        Dpt::TimeOfDay,
        Dpt::Date,
        Dpt::Counter32,
        Dpt::CounterV32,
        Dpt::ActiveEnergy,
        Dpt::ElectricCurrent,
        Dpt::ElectricPotential,
        Dpt::Power,
        Dpt::StringAscii,
        Dpt::StringLatin1,
        Dpt::SceneNumber,
        Dpt::SceneControl,
        Dpt::DateTime,
        Dpt::HvacMode,
        Dpt::StatusGen,
        Dpt::ActiveEnergyV64,
        Dpt::ColourRgb,
    ];

    /// Get the `(main, sub)` number of the datapoint type, e.g. `(9, 1)` for DPT 9.001
    pub const fn number(self) -> (u16, u16) {
        use Dpt::*;
        match self {
            Switch => (1, 1),
            Bool => (1, 2),
            Enable => (1, 3),
            Alarm => (1, 5),
            UpDown => (1, 8),
            OpenClose => (1, 9),
            Start => (1, 10),
            Trigger => (1, 17),
            Occupancy => (1, 18),
            WindowDoor => (1, 19),
            HeatCool => (1, 100),
            SwitchControl => (2, 1),
            DimmingControl => (3, 7),
            BlindControl => (3, 8),
            CharAscii => (4, 1),
            CharLatin1 => (4, 2),
            Scaling => (5, 1),
            Angle => (5, 3),
            Percent8 => (5, 4),
            Counter8 => (5, 10),
            PercentV8 => (6, 1),
            CounterV8 => (6, 10),
            Pulses16 => (7, 1),
            TimePeriodMsec => (7, 2),
            TimePeriodHours => (7, 7),
            PulsesDiff16 => (8, 1),
            DeltaTimeMsec => (8, 2),
            Temperature => (9, 1),
            Illuminance => (9, 4),
            WindSpeed => (9, 5),
            Pressure => (9, 6),
            Humidity => (9, 7),
            Voltage => (9, 20),
            Current => (9, 21),
            TimeOfDay => (10, 1),
            Date => (11, 1),
            Counter32 => (12, 1),
            CounterV32 => (13, 1),
            ActiveEnergy => (13, 10),
            ElectricCurrent => (14, 19),
            ElectricPotential => (14, 27),
            Power => (14, 56),
            StringAscii => (16, 0),
            StringLatin1 => (16, 1),
            SceneNumber => (17, 1),
            SceneControl => (18, 1),
            DateTime => (19, 1),
            HvacMode => (20, 102),
            StatusGen => (21, 1),
            ActiveEnergyV64 => (29, 10),
            ColourRgb => (232, 600),
        }
    }

    /// Look up a datapoint type by its `main.sub` number
    pub fn from_number(main: u16, sub: u16) -> Option<Dpt> {
        Self::ALL.iter().copied().find(|dpt| dpt.number() == (main, sub))
    }

    /// Get the encoding format of the datapoint type
    pub const fn format(self) -> DptFormat {
        use Dpt::*;
        match self {
            Switch | Bool | Enable | Alarm | UpDown | OpenClose | Start | Trigger | Occupancy
            | WindowDoor | HeatCool => DptFormat::B1,
            SwitchControl => DptFormat::B2,
            DimmingControl | BlindControl => DptFormat::B1U3,
            CharAscii | CharLatin1 => DptFormat::A8,
            Scaling | Angle | Percent8 | Counter8 => DptFormat::U8,
            PercentV8 | CounterV8 => DptFormat::V8,
            Pulses16 | TimePeriodMsec | TimePeriodHours => DptFormat::U16,
            PulsesDiff16 | DeltaTimeMsec => DptFormat::V16,
            Temperature | Illuminance | WindSpeed | Pressure | Humidity | Voltage | Current => {
                DptFormat::F16
            }
            TimeOfDay => DptFormat::N3N5R2N6N2N6,
            Date => DptFormat::R3N5R4U4R1U7,
            Counter32 => DptFormat::U32,
            CounterV32 | ActiveEnergy => DptFormat::V32,
            ElectricCurrent | ElectricPotential | Power => DptFormat::F32,
            StringAscii | StringLatin1 => DptFormat::A112,
            SceneNumber => DptFormat::R2U6,
            SceneControl => DptFormat::B1R1U6,
            DateTime => DptFormat::DateTime,
            HvacMode => DptFormat::N8,
            StatusGen => DptFormat::B8,
            ActiveEnergyV64 => DptFormat::V64,
            ColourRgb => DptFormat::U8U8U8,
        }
    }

    /// The telegram payload length, in bytes, of a value of this type
    ///
    /// This counts the 6-bit first payload byte, so it is always at least 1.
    pub const fn payload_length(self) -> u8 {
        self.format().bit_width() / 8 + 1
    }
}

impl core::fmt::Display for Dpt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (main, sub) = self.number();
        write!(f, "{}.{:03}", main, sub)
    }
}
