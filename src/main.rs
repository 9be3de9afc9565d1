use std::io;
use std::panic;
use std::sync::Arc;
use std::thread;

use crossterm::event::KeyEventKind;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use vehicle_bus::tui::app::App;
use vehicle_bus::tui::event::{AppEvent, EventHandler};
use vehicle_bus::tui::{terminal, ui, vehicle_task};
use vehicle_bus::{
    BusConfig, ChannelNotifier, CommandQueue, Dispatcher, PublishedUiState, QueueProducer,
    VehicleControl,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("vehicle-bus fatal error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = BusConfig::from_env()?;
    log::info!("starting with {config:?}");

    let queue = Arc::new(CommandQueue::new(config.overflow));
    let published = Arc::new(PublishedUiState::default());
    let (notifier, notify_rx) = ChannelNotifier::channel();

    // The callback table exists before the vehicle thread does; spawning it
    // is what publishes the table to that thread.
    let control: Arc<dyn VehicleControl> = Arc::new(QueueProducer::new(
        Arc::clone(&queue),
        Arc::clone(&published),
    ));
    let vehicle_period = config.vehicle_period;
    let vehicle_handle = thread::Builder::new()
        .name("vehicle-io".to_string())
        .spawn(move || vehicle_task::vehicle_loop(control, notify_rx, vehicle_period))?;

    let app = App::new(queue, Dispatcher::new(published), notifier);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_tui(app, config))?;

    // Dropping the app (and with it the notifier) above stops the vehicle loop.
    if vehicle_handle.join().is_err() {
        eprintln!("vehicle thread panicked");
    }

    Ok(())
}

async fn run_tui(mut app: App<ChannelNotifier>, config: BusConfig) -> io::Result<()> {
    // Restored when this returns, whether the loop ends or a draw fails.
    let _session = terminal::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    // Install panic hook to restore terminal on panic.
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        terminal::restore();
        original_hook(info);
    }));

    let mut events = EventHandler::new(config.tick_interval);

    // Main event loop.
    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        if let Some(event) = events.next().await {
            match event {
                AppEvent::Key(key) => {
                    // crossterm 0.28 sends both Press and Release on some platforms.
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key);
                    }
                }
                AppEvent::Tick => app.on_tick(),
                AppEvent::Resize(_, _) => {
                    // Terminal auto-resizes on next draw.
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
