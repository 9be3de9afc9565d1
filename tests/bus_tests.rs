//! Cross-thread behaviour of the command bus: producer threads on one side,
//! a single draining consumer on the other.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use proptest::prelude::*;
use vehicle_bus::command::{DoorPosition, LightState, PropertyEnum, SeatAxis};
use vehicle_bus::notify::{self, ChannelNotifier, VehicleSection};
use vehicle_bus::scene::node;
use vehicle_bus::{
    Command, CommandQueue, Dispatcher, OverflowPolicy, PropertyStore, PublishedUiState,
    QueueProducer, SceneProperties, VehicleControl,
};

fn bus() -> (Arc<CommandQueue>, Arc<PublishedUiState>, QueueProducer) {
    let queue = Arc::new(CommandQueue::new(OverflowPolicy::Unbounded));
    let published = Arc::new(PublishedUiState::default());
    let producer = QueueProducer::new(Arc::clone(&queue), Arc::clone(&published));
    (queue, published, producer)
}

#[test]
fn producer_thread_to_dispatcher() {
    let (queue, published, producer) = bus();
    let mut dispatcher = Dispatcher::new(published);
    let mut scene = PropertyStore::dashboard();
    let door = node::door_open(DoorPosition::FrontLeft);
    let before = scene.bool_property(door).unwrap();

    thread::spawn(move || {
        producer.toggle_door(DoorPosition::FrontLeft);
        producer.set_light_state(LightState::Headlights);
        producer.set_seat_offset(SeatAxis::UpDown, 2.0);
    })
    .join()
    .unwrap();

    let drained = queue.drain();
    assert_eq!(
        drained,
        vec![
            Command::ToggleDoor(DoorPosition::FrontLeft),
            Command::SetLightState(LightState::Headlights),
            Command::SetSeatOffset(SeatAxis::UpDown, 2.0),
        ]
    );

    let report = dispatcher.dispatch(drained, &mut scene);
    assert_eq!(report.applied, 3);
    assert_eq!(scene.bool_property(door).unwrap(), !before);
    assert_eq!(
        scene.int_property(node::LIGHT_STATE).unwrap(),
        LightState::Headlights.index()
    );
    assert_eq!(
        scene.float_property(node::seat_offset(SeatAxis::UpDown)).unwrap(),
        2.0
    );
}

#[test]
fn two_producers_racing_a_drain() {
    let a = Command::ToggleDoor(DoorPosition::RearLeft);
    let b = Command::SetTunerFrequency(99.9);

    for _ in 0..200 {
        let (queue, _, producer) = bus();
        let barrier = Arc::new(Barrier::new(3));

        let spawn = |cmd: Command| {
            let producer = producer.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                producer.submit(cmd);
            })
        };
        let ha = spawn(a);
        let hb = spawn(b);

        barrier.wait();
        let first = queue.drain();
        ha.join().unwrap();
        hb.join().unwrap();
        let second = queue.drain();

        let mut all = first;
        all.extend(second.iter().copied());
        assert!(
            all == vec![a, b] || all == vec![b, a],
            "invalid total order: {all:?}"
        );
        assert!(queue.drain().is_empty());
    }
}

#[test]
fn published_screen_reaches_producer_thread() {
    let (queue, published, producer) = bus();
    let mut dispatcher = Dispatcher::new(published);
    let mut scene = PropertyStore::dashboard();

    let control: Arc<dyn VehicleControl> = Arc::new(producer);
    let remote = Arc::clone(&control);
    thread::spawn(move || remote.set_ui_screen(vehicle_bus::command::UiScreen::Climate))
        .join()
        .unwrap();

    dispatcher.tick(&queue, &mut scene);

    let screen = thread::spawn(move || control.current_ui_screen())
        .join()
        .unwrap();
    assert_eq!(screen, vehicle_bus::command::UiScreen::Climate);
}

#[test]
fn reverse_path_never_feeds_queue() {
    let (queue, _, _) = bus();
    let mut scene = PropertyStore::dashboard();
    let (notifier, rx) = ChannelNotifier::channel();

    for pos in DoorPosition::ALL {
        notify::tap_section(&mut scene, &notifier, VehicleSection::Door(pos)).unwrap();
        notify::tap_section(&mut scene, &notifier, VehicleSection::Window(pos)).unwrap();
    }
    notify::tap_section(&mut scene, &notifier, VehicleSection::BackDoor).unwrap();
    notify::focus_media_item(&mut scene, &notifier, 2).unwrap();
    notify::click_media_item(&mut scene, &notifier, 2).unwrap();

    assert_eq!(rx.try_iter().count(), 11);
    assert!(queue.is_empty());
    assert_eq!(queue.stats().enqueued, 0);
}

fn seek(i: usize) -> Command {
    Command::SetSeekPosition(i as f32)
}

proptest! {
    /// N enqueues followed by one drain come back in enqueue order.
    #[test]
    fn drain_is_fifo(values in proptest::collection::vec(-1.0e6f32..1.0e6, 0..200)) {
        let (queue, _, _) = bus();
        let expected: Vec<Command> = values.iter().map(|v| Command::SetSeekPosition(*v)).collect();
        for cmd in &expected {
            queue.enqueue(*cmd);
        }
        prop_assert_eq!(queue.drain(), expected);
        prop_assert!(queue.is_empty());
    }

    /// Interleaved drains return every command exactly once, and anything
    /// enqueued after a drain returned is absent from that drain.
    #[test]
    fn drains_lose_and_duplicate_nothing(
        batches in proptest::collection::vec(0usize..20, 1..20),
    ) {
        let (queue, _, _) = bus();
        let mut next = 0usize;
        let mut seen = Vec::new();

        for size in batches {
            for _ in 0..size {
                queue.enqueue(seek(next));
                next += 1;
            }
            let drained = queue.drain();
            let pending_after = queue.len();
            prop_assert_eq!(pending_after, 0);
            queue.enqueue(seek(next));
            prop_assert!(!drained.contains(&seek(next)));
            next += 1;
            seen.extend(drained);
        }
        seen.extend(queue.drain());

        let expected: Vec<Command> = (0..next).map(seek).collect();
        prop_assert_eq!(&seen, &expected);
        let unique: HashSet<u32> = seen
            .iter()
            .map(|c| match c {
                Command::SetSeekPosition(v) => v.to_bits(),
                _ => unreachable!(),
            })
            .collect();
        prop_assert_eq!(unique.len(), next);
    }
}
