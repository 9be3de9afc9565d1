pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod notify;
pub mod producer;
pub mod published;
pub mod queue;
pub mod scene;
pub mod tui;

pub use command::Command;
pub use config::BusConfig;
pub use dispatch::{Dispatcher, TickReport};
pub use error::{BusError, Result};
pub use notify::{ChannelNotifier, VehicleNotification, VehicleNotifier, VehicleSection};
pub use producer::{QueueProducer, VehicleControl};
pub use published::PublishedUiState;
pub use queue::{CommandQueue, OverflowPolicy, QueueStats};
pub use scene::{PropertyStore, SceneProperties};
