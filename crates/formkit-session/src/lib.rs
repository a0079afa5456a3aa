mod callback;
mod clock;
mod gate;

pub use callback::{CallbackError, CallbackParams, parse_callback};
pub use clock::{Clock, ManualClock, SystemClock};
pub use gate::{Session, SessionGate, SessionState};
