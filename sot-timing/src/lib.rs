pub mod countdown;
pub mod deferred;
pub mod timer;

pub use countdown::{Countdown, Tick};
pub use deferred::Deferred;
pub use timer::{HighPrecisionTimer, ManualTimer, Timer};
