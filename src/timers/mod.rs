//! Wall-clock timing of engine phases.
//!
//! Timers nest: starting a timer while another is running makes the new
//! one a child of the running one, so `"solve" -> "polish"` records the
//! polish time as part of the solve time.

mod timers;
pub(crate) use timers::*;
