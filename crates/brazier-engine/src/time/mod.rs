//! Time subsystem.
//!
//! The simulation advances in fixed slices delivered by a [`TickTimer`]; the
//! renderer is driven separately by redraw requests.

mod tick_timer;

pub use tick_timer::{TickTimer, DEFAULT_TICK_PERIOD};
