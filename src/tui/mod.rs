pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;
pub mod vehicle_task;
