use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use log::info;

use crate::command::{
    ClimateState, DoorPosition, LightState, PropertyEnum, SeatAxis, UiScreen, UiStyle,
};
use crate::notify::VehicleNotification;
use crate::producer::VehicleControl;

/// Number of entry points exercised per round of the simulated vehicle.
pub const SCRIPT_STEPS: u64 = 12;

/// FM broadcast band, MHz.
const FM_LOW: f32 = 87.5;
const FM_HIGH: f32 = 108.0;

/// Run the simulated vehicle-I/O loop on a blocking thread.
///
/// Drives one scripted entry point every `period` and reads reverse-path
/// notifications in between. Returns when the notification channel
/// disconnects (the UI side has shut down).
pub fn vehicle_loop(
    control: Arc<dyn VehicleControl>,
    notify_rx: mpsc::Receiver<VehicleNotification>,
    period: Duration,
) {
    info!("vehicle I/O loop started, period {period:?}");
    let mut step: u64 = 0;

    loop {
        let deadline = Instant::now() + period;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match notify_rx.recv_timeout(remaining) {
                Ok(notification) => handle_notification(notification),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    info!("UI gone after {step} vehicle events, stopping");
                    return;
                }
            }
        }

        drive_step(control.as_ref(), step);
        step += 1;
    }
}

/// Fire the entry point scheduled for `step`.
pub fn drive_step(control: &dyn VehicleControl, step: u64) {
    let round = (step / SCRIPT_STEPS) as usize;
    let door = DoorPosition::ALL[round % DoorPosition::ALL.len()];

    match step % SCRIPT_STEPS {
        0 => control.toggle_door(door),
        1 => control.set_light_state(cycle::<LightState>(round)),
        2 => control.set_seat_offset(SeatAxis::UpDown, (round % 5) as f32 * 0.5),
        3 => control.toggle_window(door),
        4 => {
            let span = FM_HIGH - FM_LOW;
            control.set_tuner_frequency(FM_LOW + (round as f32 * 2.3) % span);
        }
        5 => control.set_climate_state(cycle::<ClimateState>(round)),
        6 => control.toggle_am_fm(),
        7 => control.set_ui_screen(cycle::<UiScreen>(round)),
        8 => {
            // Seeking only makes sense while the media screen is up.
            if control.current_ui_screen() == UiScreen::Media {
                control.set_seek_position((round % 10) as f32 / 10.0);
            } else {
                control.toggle_accessory();
            }
        }
        9 => control.toggle_back_door(),
        10 => control.set_ui_style(cycle::<UiStyle>(round)),
        _ => control.toggle_misc_on_off(),
    }
}

fn cycle<T: PropertyEnum>(round: usize) -> T {
    T::VARIANTS[round % T::VARIANTS.len()]
}

fn handle_notification(notification: VehicleNotification) {
    match notification {
        VehicleNotification::SectionToggled { section, opened } => {
            let state = if opened { "opened" } else { "closed" };
            info!("vehicle: {section} {state} from UI");
        }
        VehicleNotification::MediaItemClicked(index) => {
            info!("vehicle: play media item {index}");
        }
        VehicleNotification::MediaItemFocused(index) => {
            info!("vehicle: preview media item {index}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::published::PublishedUiState;
    use crate::producer::QueueProducer;
    use crate::queue::{CommandQueue, OverflowPolicy};
    use std::thread;

    fn producer() -> (QueueProducer, Arc<CommandQueue>, Arc<PublishedUiState>) {
        let queue = Arc::new(CommandQueue::new(OverflowPolicy::Unbounded));
        let published = Arc::new(PublishedUiState::default());
        (
            QueueProducer::new(Arc::clone(&queue), Arc::clone(&published)),
            queue,
            published,
        )
    }

    #[test]
    fn test_one_round_hits_every_entry_point_once() {
        let (producer, queue, _) = producer();
        for step in 0..SCRIPT_STEPS {
            drive_step(&producer, step);
        }
        let commands = queue.drain();
        assert_eq!(commands.len(), SCRIPT_STEPS as usize);
        assert_eq!(commands[0], Command::ToggleDoor(DoorPosition::FrontLeft));
        assert_eq!(commands[1], Command::SetLightState(LightState::Off));
        assert_eq!(commands[8], Command::ToggleAccessory);
    }

    #[test]
    fn test_seeks_when_media_screen_published() {
        let (producer, queue, published) = producer();
        published.publish_screen(UiScreen::Media);
        drive_step(&producer, SCRIPT_STEPS + 8);
        assert_eq!(queue.drain(), vec![Command::SetSeekPosition(0.1)]);
    }

    #[test]
    fn test_tuner_frequency_stays_in_band() {
        let (producer, queue, _) = producer();
        for round in 0..50 {
            drive_step(&producer, round * SCRIPT_STEPS + 4);
        }
        for cmd in queue.drain() {
            let Command::SetTunerFrequency(f) = cmd else {
                panic!("unexpected {cmd}");
            };
            assert!((FM_LOW..FM_HIGH).contains(&f));
        }
    }

    #[test]
    fn test_loop_stops_when_ui_disconnects() {
        let (producer, queue, _) = producer();
        let (tx, rx) = mpsc::channel();
        let control: Arc<dyn VehicleControl> = Arc::new(producer);

        let handle = thread::spawn(move || vehicle_loop(control, rx, Duration::from_millis(1)));
        tx.send(VehicleNotification::MediaItemClicked(0)).unwrap();
        thread::sleep(Duration::from_millis(20));
        drop(tx);

        handle.join().unwrap();
        assert!(queue.stats().enqueued > 0);
    }
}
