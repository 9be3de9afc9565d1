use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{self, MissedTickBehavior};

/// Unified UI-thread event.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// One UI update. The host answers each tick with `App::on_tick`, which
    /// drains the command queue once and runs the batch through the
    /// `Dispatcher`, then redraws.
    Tick,
    Resize(u16, u16),
}

/// Single stream of terminal input and update ticks for the UI loop.
///
/// Ticks arrive every `BusConfig::tick_interval`, so that interval is the
/// command dispatch cadence: anything the vehicle thread enqueues waits at
/// most one interval before it reaches the scene. A slow frame delays the
/// next tick instead of bursting the missed ones, so a stall never turns into
/// several back-to-back drains.
pub struct EventHandler {
    rx: UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Start the terminal reader and the ticker on the current tokio runtime.
    pub fn new(tick_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_terminal_reader(tx.clone());
        spawn_ticker(tx, tick_interval);
        Self { rx }
    }

    /// Wait for the next event. `None` once both background tasks are gone.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

fn spawn_terminal_reader(tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut input = EventStream::new();
        while let Some(Ok(event)) = input.next().await {
            let forwarded = match event {
                Event::Key(key) => AppEvent::Key(key),
                Event::Resize(w, h) => AppEvent::Resize(w, h),
                // Mouse, focus and paste events have no binding.
                _ => continue,
            };
            if tx.send(forwarded).is_err() {
                break;
            }
        }
    });
}

/// Emit `AppEvent::Tick` every `period` until the receiver is dropped. The
/// first tick fires immediately so the scene is populated before the first
/// full interval passes.
fn spawn_ticker(tx: UnboundedSender<AppEvent>, period: Duration) {
    tokio::spawn(async move {
        let mut ticks = time::interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Runtime;

    fn next_tick(rt: &Runtime, rx: &mut UnboundedReceiver<AppEvent>) -> AppEvent {
        rt.block_on(async { time::timeout(Duration::from_secs(1), rx.recv()).await })
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_ticker_emits_ticks_at_cadence() {
        let rt = Runtime::new().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        rt.block_on(async { spawn_ticker(tx, Duration::from_millis(5)) });

        for _ in 0..3 {
            assert!(matches!(next_tick(&rt, &mut rx), AppEvent::Tick));
        }
    }

    #[test]
    fn test_first_tick_is_immediate() {
        let rt = Runtime::new().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        rt.block_on(async { spawn_ticker(tx, Duration::from_secs(3600)) });

        assert!(matches!(next_tick(&rt, &mut rx), AppEvent::Tick));
    }
}
