//! Screen implementations. Each screen is a top-level Component.

pub mod monitor;

use crate::component::Component;

/// Create the root screen component.
pub fn create_screen() -> Box<dyn Component> {
    Box::new(monitor::MonitorScreen::new())
}
