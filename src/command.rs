use std::fmt;

use crate::error::{BusError, Result};

/// One of the four passenger-cabin corners. Used for both doors and windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorPosition {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl DoorPosition {
    pub const ALL: [DoorPosition; 4] = [
        Self::FrontLeft,
        Self::FrontRight,
        Self::RearLeft,
        Self::RearRight,
    ];
}

impl fmt::Display for DoorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrontLeft => write!(f, "front-left"),
            Self::FrontRight => write!(f, "front-right"),
            Self::RearLeft => write!(f, "rear-left"),
            Self::RearRight => write!(f, "rear-right"),
        }
    }
}

/// Exterior lighting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LightState {
    #[default]
    Off,
    Parking,
    Headlights,
    HighBeams,
}

/// Visual theme of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UiStyle {
    #[default]
    Classic,
    Modern,
    Sport,
}

/// Top-level screen shown by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UiScreen {
    #[default]
    Home,
    Media,
    Navigation,
    Climate,
    Vehicle,
}

/// HVAC operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClimateState {
    #[default]
    Off,
    Auto,
    Heat,
    Cool,
    Defrost,
}

/// Adjustable axis of the driver seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeatAxis {
    ForwardBack,
    UpDown,
    Recline,
}

impl fmt::Display for SeatAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForwardBack => write!(f, "forward-back"),
            Self::UpDown => write!(f, "up-down"),
            Self::Recline => write!(f, "recline"),
        }
    }
}

/// Radio tuner band. The band itself lives in the scene as a string property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TunerBand {
    Am,
    #[default]
    Fm,
}

impl TunerBand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Fm => "FM",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "AM" => Ok(Self::Am),
            "FM" => Ok(Self::Fm),
            other => Err(BusError::UnknownBand(other.to_string())),
        }
    }

    /// The other band.
    pub fn toggle(self) -> Self {
        match self {
            Self::Am => Self::Fm,
            Self::Fm => Self::Am,
        }
    }
}

impl fmt::Display for TunerBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enums stored in the scene as int properties.
///
/// The index is stable and is what UI bindings see. Unknown indexes map to
/// `None` so a reader can fall back to the default variant.
pub trait PropertyEnum: Sized + Copy + 'static {
    const VARIANTS: &'static [Self];

    fn index(self) -> i32;

    fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::VARIANTS.get(i).copied())
    }
}

macro_rules! property_enum {
    ($ty:ty, [$($variant:ident),+ $(,)?]) => {
        impl PropertyEnum for $ty {
            const VARIANTS: &'static [Self] = &[$(<$ty>::$variant),+];

            fn index(self) -> i32 {
                self as i32
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

property_enum!(LightState, [Off, Parking, Headlights, HighBeams]);
property_enum!(UiStyle, [Classic, Modern, Sport]);
property_enum!(UiScreen, [Home, Media, Navigation, Climate, Vehicle]);
property_enum!(ClimateState, [Off, Auto, Heat, Cool, Defrost]);

/// A single vehicle/UI state change, produced on the vehicle-I/O thread and
/// applied once on the UI thread.
///
/// Every variant carries at most one scalar payload (the seat axis only
/// selects which property the value lands on).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    ToggleDoor(DoorPosition),
    ToggleWindow(DoorPosition),
    ToggleBackDoor,
    ToggleMiscOnOff,
    ToggleAmFm,
    ToggleAccessory,
    SetUiScreen(UiScreen),
    SetLightState(LightState),
    SetUiStyle(UiStyle),
    SetSeatOffset(SeatAxis, f32),
    /// Tuner frequency in the unit of the current band (kHz for AM, MHz for FM).
    SetTunerFrequency(f32),
    SetClimateState(ClimateState),
    /// Playback position of the current media item, 0.0..=1.0.
    SetSeekPosition(f32),
}

impl Command {
    /// Short kind name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToggleDoor(_) => "ToggleDoor",
            Self::ToggleWindow(_) => "ToggleWindow",
            Self::ToggleBackDoor => "ToggleBackDoor",
            Self::ToggleMiscOnOff => "ToggleMiscOnOff",
            Self::ToggleAmFm => "ToggleAmFm",
            Self::ToggleAccessory => "ToggleAccessory",
            Self::SetUiScreen(_) => "SetUiScreen",
            Self::SetLightState(_) => "SetLightState",
            Self::SetUiStyle(_) => "SetUiStyle",
            Self::SetSeatOffset(..) => "SetSeatOffset",
            Self::SetTunerFrequency(_) => "SetTunerFrequency",
            Self::SetClimateState(_) => "SetClimateState",
            Self::SetSeekPosition(_) => "SetSeekPosition",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToggleDoor(pos) | Self::ToggleWindow(pos) => {
                write!(f, "{}({pos})", self.name())
            }
            Self::SetUiScreen(screen) => write!(f, "SetUiScreen({screen})"),
            Self::SetLightState(state) => write!(f, "SetLightState({state})"),
            Self::SetUiStyle(style) => write!(f, "SetUiStyle({style})"),
            Self::SetSeatOffset(axis, value) => write!(f, "SetSeatOffset({axis}, {value})"),
            Self::SetTunerFrequency(freq) => write!(f, "SetTunerFrequency({freq})"),
            Self::SetClimateState(state) => write!(f, "SetClimateState({state})"),
            Self::SetSeekPosition(pos) => write!(f, "SetSeekPosition({pos})"),
            _ => f.write_str(self.name()),
        }
    }
}
