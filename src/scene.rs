use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::command::{
    ClimateState, DoorPosition, LightState, PropertyEnum, SeatAxis, TunerBand, UiScreen, UiStyle,
};
use crate::error::{BusError, Result};

/// Scene node names written by the dispatcher and the input handlers.
pub mod node {
    use crate::command::{DoorPosition, SeatAxis};

    pub const BACK_DOOR_OPEN: &str = "car.back_door.open";
    pub const MISC_ON: &str = "car.misc.on";
    pub const ACCESSORY_ON: &str = "car.accessory.on";
    pub const LIGHT_STATE: &str = "car.lights.state";
    pub const CLIMATE_STATE: &str = "car.climate.state";
    pub const UI_SCREEN: &str = "ui.screen";
    pub const UI_STYLE: &str = "ui.style";
    pub const RADIO_BAND: &str = "radio.band";
    pub const RADIO_FREQUENCY: &str = "radio.frequency";
    pub const MEDIA_SEEK_POSITION: &str = "media.seek_position";
    pub const MEDIA_SELECTED_INDEX: &str = "media.selected_index";
    pub const MEDIA_FOCUSED_INDEX: &str = "media.focused_index";

    pub fn door_open(pos: DoorPosition) -> &'static str {
        match pos {
            DoorPosition::FrontLeft => "car.door.front_left.open",
            DoorPosition::FrontRight => "car.door.front_right.open",
            DoorPosition::RearLeft => "car.door.rear_left.open",
            DoorPosition::RearRight => "car.door.rear_right.open",
        }
    }

    pub fn window_open(pos: DoorPosition) -> &'static str {
        match pos {
            DoorPosition::FrontLeft => "car.window.front_left.open",
            DoorPosition::FrontRight => "car.window.front_right.open",
            DoorPosition::RearLeft => "car.window.rear_left.open",
            DoorPosition::RearRight => "car.window.rear_right.open",
        }
    }

    pub fn seat_offset(axis: SeatAxis) -> &'static str {
        match axis {
            SeatAxis::ForwardBack => "seat.forward_back.offset",
            SeatAxis::UpDown => "seat.up_down.offset",
            SeatAxis::Recline => "seat.recline.offset",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.2}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

/// Property primitives supplied by the scene layer. Called from the UI thread only.
///
/// Every successful `set_*` publishes the property, even if the value did
/// not change, so bindings depending on it re-evaluate.
pub trait SceneProperties {
    fn set_bool_property(&mut self, node: &str, value: bool) -> Result<()>;
    fn set_int_property(&mut self, node: &str, value: i32) -> Result<()>;
    fn set_float_property(&mut self, node: &str, value: f32) -> Result<()>;
    fn set_string_property(&mut self, node: &str, value: &str) -> Result<()>;

    fn bool_property(&self, node: &str) -> Result<bool>;
    fn int_property(&self, node: &str) -> Result<i32>;
    fn float_property(&self, node: &str) -> Result<f32>;
    fn string_property(&self, node: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
struct Property {
    value: PropertyValue,
    revision: u64,
}

/// In-memory scene: a flat map from node name to a typed property.
///
/// Only registered nodes can be written; the type of a node is fixed by the
/// value it was registered with.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    props: HashMap<String, Property>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding every node the dashboard binds to, at its resting value.
    pub fn dashboard() -> Self {
        let mut store = Self::new();
        for pos in DoorPosition::ALL {
            store.register(node::door_open(pos), PropertyValue::Bool(false));
            store.register(node::window_open(pos), PropertyValue::Bool(false));
        }
        for axis in [SeatAxis::ForwardBack, SeatAxis::UpDown, SeatAxis::Recline] {
            store.register(node::seat_offset(axis), PropertyValue::Float(0.0));
        }
        store.register(node::BACK_DOOR_OPEN, PropertyValue::Bool(false));
        store.register(node::MISC_ON, PropertyValue::Bool(false));
        store.register(node::ACCESSORY_ON, PropertyValue::Bool(false));
        store.register(
            node::LIGHT_STATE,
            PropertyValue::Int(LightState::default().index()),
        );
        store.register(
            node::CLIMATE_STATE,
            PropertyValue::Int(ClimateState::default().index()),
        );
        store.register(node::UI_SCREEN, PropertyValue::Int(UiScreen::default().index()));
        store.register(node::UI_STYLE, PropertyValue::Int(UiStyle::default().index()));
        store.register(
            node::RADIO_BAND,
            PropertyValue::Str(TunerBand::default().as_str().to_string()),
        );
        store.register(node::RADIO_FREQUENCY, PropertyValue::Float(87.5));
        store.register(node::MEDIA_SEEK_POSITION, PropertyValue::Float(0.0));
        store.register(node::MEDIA_SELECTED_INDEX, PropertyValue::Int(0));
        store.register(node::MEDIA_FOCUSED_INDEX, PropertyValue::Int(0));
        store
    }

    /// Add or replace a node. Resets its revision.
    pub fn register(&mut self, node: &str, value: PropertyValue) {
        self.props
            .insert(node.to_string(), Property { value, revision: 0 });
    }

    /// Remove a node, e.g. when the screen that owns it is unloaded.
    pub fn unregister(&mut self, node: &str) -> Option<PropertyValue> {
        self.props.remove(node).map(|p| p.value)
    }

    pub fn get(&self, node: &str) -> Option<&PropertyValue> {
        self.props.get(node).map(|p| &p.value)
    }

    /// How many times `node` has been published since it was registered.
    pub fn revision(&self, node: &str) -> Option<u64> {
        self.props.get(node).map(|p| p.revision)
    }

    fn set(&mut self, node: &str, value: PropertyValue) -> Result<()> {
        let prop = self
            .props
            .get_mut(node)
            .ok_or_else(|| BusError::NodeNotFound(node.to_string()))?;
        if std::mem::discriminant(&prop.value) != std::mem::discriminant(&value) {
            return Err(BusError::TypeMismatch {
                node: node.to_string(),
                expected: prop.value.type_name(),
                actual: value.type_name(),
            });
        }
        trace!("publish {node} = {value}");
        prop.value = value;
        prop.revision += 1;
        Ok(())
    }

    fn lookup(&self, node: &str) -> Result<&PropertyValue> {
        self.get(node)
            .ok_or_else(|| BusError::NodeNotFound(node.to_string()))
    }

    fn mismatch(node: &str, expected: &'static str, actual: &PropertyValue) -> BusError {
        BusError::TypeMismatch {
            node: node.to_string(),
            expected,
            actual: actual.type_name(),
        }
    }
}

impl SceneProperties for PropertyStore {
    fn set_bool_property(&mut self, node: &str, value: bool) -> Result<()> {
        self.set(node, PropertyValue::Bool(value))
    }

    fn set_int_property(&mut self, node: &str, value: i32) -> Result<()> {
        self.set(node, PropertyValue::Int(value))
    }

    fn set_float_property(&mut self, node: &str, value: f32) -> Result<()> {
        self.set(node, PropertyValue::Float(value))
    }

    fn set_string_property(&mut self, node: &str, value: &str) -> Result<()> {
        self.set(node, PropertyValue::Str(value.to_string()))
    }

    fn bool_property(&self, node: &str) -> Result<bool> {
        match self.lookup(node)? {
            PropertyValue::Bool(v) => Ok(*v),
            other => Err(Self::mismatch(node, "bool", other)),
        }
    }

    fn int_property(&self, node: &str) -> Result<i32> {
        match self.lookup(node)? {
            PropertyValue::Int(v) => Ok(*v),
            other => Err(Self::mismatch(node, "int", other)),
        }
    }

    fn float_property(&self, node: &str) -> Result<f32> {
        match self.lookup(node)? {
            PropertyValue::Float(v) => Ok(*v),
            other => Err(Self::mismatch(node, "float", other)),
        }
    }

    fn string_property(&self, node: &str) -> Result<String> {
        match self.lookup(node)? {
            PropertyValue::Str(v) => Ok(v.clone()),
            other => Err(Self::mismatch(node, "string", other)),
        }
    }
}
