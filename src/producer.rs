use std::sync::Arc;

use log::warn;

use crate::command::{
    ClimateState, Command, DoorPosition, LightState, SeatAxis, UiScreen, UiStyle,
};
use crate::published::PublishedUiState;
use crate::queue::CommandQueue;

/// Entry points the vehicle-I/O subsystem calls to drive the dashboard.
///
/// Implementors only need `submit` and the two accessors; the per-command
/// methods build the matching `Command`. Entry points never block and never
/// touch UI-owned state directly.
pub trait VehicleControl: Send + Sync {
    /// Hand one command to the UI thread.
    fn submit(&self, cmd: Command);

    /// Screen the UI is currently showing.
    fn current_ui_screen(&self) -> UiScreen;

    /// Style the UI is currently using.
    fn current_ui_style(&self) -> UiStyle;

    fn toggle_door(&self, door: DoorPosition) {
        self.submit(Command::ToggleDoor(door));
    }

    fn toggle_window(&self, window: DoorPosition) {
        self.submit(Command::ToggleWindow(window));
    }

    fn toggle_back_door(&self) {
        self.submit(Command::ToggleBackDoor);
    }

    fn toggle_misc_on_off(&self) {
        self.submit(Command::ToggleMiscOnOff);
    }

    fn toggle_am_fm(&self) {
        self.submit(Command::ToggleAmFm);
    }

    fn toggle_accessory(&self) {
        self.submit(Command::ToggleAccessory);
    }

    fn set_ui_screen(&self, screen: UiScreen) {
        self.submit(Command::SetUiScreen(screen));
    }

    fn set_light_state(&self, state: LightState) {
        self.submit(Command::SetLightState(state));
    }

    fn set_ui_style(&self, style: UiStyle) {
        self.submit(Command::SetUiStyle(style));
    }

    fn set_climate_state(&self, state: ClimateState) {
        self.submit(Command::SetClimateState(state));
    }

    fn set_seat_offset(&self, axis: SeatAxis, value: f32) {
        if finite_or_warn("seat offset", value) {
            self.submit(Command::SetSeatOffset(axis, value));
        }
    }

    fn set_tuner_frequency(&self, frequency: f32) {
        if finite_or_warn("tuner frequency", frequency) {
            self.submit(Command::SetTunerFrequency(frequency));
        }
    }

    fn set_seek_position(&self, position: f32) {
        if finite_or_warn("seek position", position) {
            self.submit(Command::SetSeekPosition(position));
        }
    }
}

fn finite_or_warn(what: &str, value: f32) -> bool {
    if value.is_finite() {
        true
    } else {
        warn!("ignoring non-finite {what}: {value}");
        false
    }
}

/// `VehicleControl` backed by the shared command queue.
///
/// Built once on the UI side before the vehicle-I/O thread is spawned and
/// moved (as `Arc<dyn VehicleControl>`) into that thread.
#[derive(Clone)]
pub struct QueueProducer {
    queue: Arc<CommandQueue>,
    published: Arc<PublishedUiState>,
}

impl QueueProducer {
    pub fn new(queue: Arc<CommandQueue>, published: Arc<PublishedUiState>) -> Self {
        Self { queue, published }
    }
}

impl VehicleControl for QueueProducer {
    fn submit(&self, cmd: Command) {
        self.queue.enqueue(cmd);
    }

    fn current_ui_screen(&self) -> UiScreen {
        self.published.screen()
    }

    fn current_ui_style(&self) -> UiStyle {
        self.published.style()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::OverflowPolicy;

    fn producer() -> (QueueProducer, Arc<CommandQueue>, Arc<PublishedUiState>) {
        let queue = Arc::new(CommandQueue::new(OverflowPolicy::Unbounded));
        let published = Arc::new(PublishedUiState::default());
        let producer = QueueProducer::new(Arc::clone(&queue), Arc::clone(&published));
        (producer, queue, published)
    }

    #[test]
    fn test_entry_points_enqueue_matching_commands() {
        let (producer, queue, _) = producer();
        producer.toggle_door(DoorPosition::RearRight);
        producer.toggle_window(DoorPosition::FrontLeft);
        producer.toggle_back_door();
        producer.toggle_misc_on_off();
        producer.toggle_am_fm();
        producer.toggle_accessory();
        producer.set_ui_screen(UiScreen::Media);
        producer.set_light_state(LightState::Parking);
        producer.set_ui_style(UiStyle::Modern);
        producer.set_climate_state(ClimateState::Cool);
        producer.set_seat_offset(SeatAxis::Recline, -1.5);
        producer.set_tuner_frequency(101.1);
        producer.set_seek_position(0.25);

        assert_eq!(
            queue.drain(),
            vec![
                Command::ToggleDoor(DoorPosition::RearRight),
                Command::ToggleWindow(DoorPosition::FrontLeft),
                Command::ToggleBackDoor,
                Command::ToggleMiscOnOff,
                Command::ToggleAmFm,
                Command::ToggleAccessory,
                Command::SetUiScreen(UiScreen::Media),
                Command::SetLightState(LightState::Parking),
                Command::SetUiStyle(UiStyle::Modern),
                Command::SetClimateState(ClimateState::Cool),
                Command::SetSeatOffset(SeatAxis::Recline, -1.5),
                Command::SetTunerFrequency(101.1),
                Command::SetSeekPosition(0.25),
            ]
        );
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let (producer, queue, _) = producer();
        producer.set_seat_offset(SeatAxis::UpDown, f32::NAN);
        producer.set_tuner_frequency(f32::INFINITY);
        producer.set_seek_position(f32::NEG_INFINITY);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_accessors_read_published_state() {
        let (producer, queue, published) = producer();
        assert_eq!(producer.current_ui_screen(), UiScreen::Home);

        published.publish_screen(UiScreen::Navigation);
        published.publish_style(UiStyle::Sport);

        assert_eq!(producer.current_ui_screen(), UiScreen::Navigation);
        assert_eq!(producer.current_ui_style(), UiStyle::Sport);
        assert!(queue.is_empty());
    }
}
