use std::fmt;
use std::sync::mpsc;

use log::debug;

use crate::command::DoorPosition;
use crate::error::Result;
use crate::scene::{SceneProperties, node};

/// A part of the car the user can open or close by tapping its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleSection {
    Door(DoorPosition),
    Window(DoorPosition),
    BackDoor,
}

impl VehicleSection {
    /// Scene node holding the section's open state.
    pub fn node(self) -> &'static str {
        match self {
            Self::Door(pos) => node::door_open(pos),
            Self::Window(pos) => node::window_open(pos),
            Self::BackDoor => node::BACK_DOOR_OPEN,
        }
    }
}

impl fmt::Display for VehicleSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Door(pos) => write!(f, "door {pos}"),
            Self::Window(pos) => write!(f, "window {pos}"),
            Self::BackDoor => write!(f, "back door"),
        }
    }
}

/// Calls from the UI thread into the vehicle domain.
///
/// Implementations must not block and must not enqueue into the command
/// queue.
pub trait VehicleNotifier {
    fn notify_vehicle_section_toggled(&self, section: VehicleSection, opened: bool);
    fn notify_media_item_clicked(&self, index: usize);
    fn notify_media_item_focused(&self, index: usize);
}

/// A reverse-path notification as seen by the vehicle domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleNotification {
    SectionToggled {
        section: VehicleSection,
        opened: bool,
    },
    MediaItemClicked(usize),
    MediaItemFocused(usize),
}

/// `VehicleNotifier` that forwards into an unbounded channel read by the
/// vehicle-I/O thread.
pub struct ChannelNotifier {
    tx: mpsc::Sender<VehicleNotification>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::Sender<VehicleNotification>) -> Self {
        Self { tx }
    }

    /// A notifier and the receiving end the vehicle domain listens on.
    pub fn channel() -> (Self, mpsc::Receiver<VehicleNotification>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }

    fn send(&self, notification: VehicleNotification) {
        if self.tx.send(notification).is_err() {
            debug!("vehicle domain gone, dropping {notification:?}");
        }
    }
}

impl VehicleNotifier for ChannelNotifier {
    fn notify_vehicle_section_toggled(&self, section: VehicleSection, opened: bool) {
        self.send(VehicleNotification::SectionToggled { section, opened });
    }

    fn notify_media_item_clicked(&self, index: usize) {
        self.send(VehicleNotification::MediaItemClicked(index));
    }

    fn notify_media_item_focused(&self, index: usize) {
        self.send(VehicleNotification::MediaItemFocused(index));
    }
}

// --- UI input handlers ---

/// Tap on a section model: flip its open state in the scene, then tell the
/// vehicle domain. Returns the new state.
pub fn tap_section<S, N>(scene: &mut S, notifier: &N, section: VehicleSection) -> Result<bool>
where
    S: SceneProperties + ?Sized,
    N: VehicleNotifier + ?Sized,
{
    let node = section.node();
    let opened = !scene.bool_property(node)?;
    scene.set_bool_property(node, opened)?;
    notifier.notify_vehicle_section_toggled(section, opened);
    Ok(opened)
}

/// Click on an entry of the media list.
pub fn click_media_item<S, N>(scene: &mut S, notifier: &N, index: usize) -> Result<()>
where
    S: SceneProperties + ?Sized,
    N: VehicleNotifier + ?Sized,
{
    scene.set_int_property(node::MEDIA_SELECTED_INDEX, clamp_index(index))?;
    notifier.notify_media_item_clicked(index);
    Ok(())
}

/// Focus moved onto an entry of the media list.
pub fn focus_media_item<S, N>(scene: &mut S, notifier: &N, index: usize) -> Result<()>
where
    S: SceneProperties + ?Sized,
    N: VehicleNotifier + ?Sized,
{
    scene.set_int_property(node::MEDIA_FOCUSED_INDEX, clamp_index(index))?;
    notifier.notify_media_item_focused(index);
    Ok(())
}

fn clamp_index(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PropertyStore;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<VehicleNotification>>,
    }

    impl VehicleNotifier for Recorder {
        fn notify_vehicle_section_toggled(&self, section: VehicleSection, opened: bool) {
            self.seen
                .borrow_mut()
                .push(VehicleNotification::SectionToggled { section, opened });
        }

        fn notify_media_item_clicked(&self, index: usize) {
            self.seen
                .borrow_mut()
                .push(VehicleNotification::MediaItemClicked(index));
        }

        fn notify_media_item_focused(&self, index: usize) {
            self.seen
                .borrow_mut()
                .push(VehicleNotification::MediaItemFocused(index));
        }
    }

    #[test]
    fn test_tap_flips_and_notifies() {
        let mut scene = PropertyStore::dashboard();
        let recorder = Recorder::default();
        let section = VehicleSection::Door(DoorPosition::RearLeft);

        assert!(tap_section(&mut scene, &recorder, section).unwrap());
        assert!(!tap_section(&mut scene, &recorder, section).unwrap());

        assert!(!scene.bool_property(section.node()).unwrap());
        assert_eq!(
            *recorder.seen.borrow(),
            vec![
                VehicleNotification::SectionToggled {
                    section,
                    opened: true
                },
                VehicleNotification::SectionToggled {
                    section,
                    opened: false
                },
            ]
        );
    }

    #[test]
    fn test_tap_missing_node_does_not_notify() {
        let mut scene = PropertyStore::dashboard();
        scene.unregister(node::BACK_DOOR_OPEN);
        let recorder = Recorder::default();

        assert!(tap_section(&mut scene, &recorder, VehicleSection::BackDoor).is_err());
        assert!(recorder.seen.borrow().is_empty());
    }

    #[test]
    fn test_media_handlers() {
        let mut scene = PropertyStore::dashboard();
        let recorder = Recorder::default();

        focus_media_item(&mut scene, &recorder, 3).unwrap();
        click_media_item(&mut scene, &recorder, 3).unwrap();

        assert_eq!(scene.int_property(node::MEDIA_FOCUSED_INDEX).unwrap(), 3);
        assert_eq!(scene.int_property(node::MEDIA_SELECTED_INDEX).unwrap(), 3);
        assert_eq!(
            *recorder.seen.borrow(),
            vec![
                VehicleNotification::MediaItemFocused(3),
                VehicleNotification::MediaItemClicked(3),
            ]
        );
    }

    #[test]
    fn test_channel_notifier_delivers() {
        let (notifier, rx) = ChannelNotifier::channel();
        notifier.notify_media_item_clicked(7);
        notifier.notify_vehicle_section_toggled(VehicleSection::BackDoor, true);

        assert_eq!(rx.try_recv().unwrap(), VehicleNotification::MediaItemClicked(7));
        assert_eq!(
            rx.try_recv().unwrap(),
            VehicleNotification::SectionToggled {
                section: VehicleSection::BackDoor,
                opened: true
            }
        );
    }

    #[test]
    fn test_channel_notifier_survives_closed_receiver() {
        let (notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.notify_media_item_focused(1);
    }
}
