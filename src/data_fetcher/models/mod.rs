pub mod openf1;
pub mod session;

pub use openf1::{ApiDriver, ApiLap, ApiMeeting, ApiRaceControl, ApiSession, ApiStint};
pub use session::{Session, SessionId, SessionKind, SessionLap, seconds_to_duration};
