use std::sync::atomic::{AtomicI32, Ordering};

use crate::command::{PropertyEnum, UiScreen, UiStyle};

/// UI mode values owned by the UI thread and readable from any thread.
///
/// The dispatcher is the only writer. Stores use `Release` and loads use
/// `Acquire`, so a reader that observes a new screen also observes every
/// scene write the dispatcher made before publishing it.
#[derive(Debug)]
pub struct PublishedUiState {
    screen: AtomicI32,
    style: AtomicI32,
}

impl PublishedUiState {
    pub fn new(screen: UiScreen, style: UiStyle) -> Self {
        Self {
            screen: AtomicI32::new(screen.index()),
            style: AtomicI32::new(style.index()),
        }
    }

    pub fn publish_screen(&self, screen: UiScreen) {
        self.screen.store(screen.index(), Ordering::Release);
    }

    pub fn publish_style(&self, style: UiStyle) {
        self.style.store(style.index(), Ordering::Release);
    }

    pub fn screen(&self) -> UiScreen {
        UiScreen::from_index(self.screen.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn style(&self) -> UiStyle {
        UiStyle::from_index(self.style.load(Ordering::Acquire)).unwrap_or_default()
    }
}

impl Default for PublishedUiState {
    fn default() -> Self {
        Self::new(UiScreen::default(), UiStyle::default())
    }
}
