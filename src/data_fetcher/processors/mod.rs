pub mod event_matching;
pub mod lap_assembly;
pub mod track_status;

pub use event_matching::resolve_meeting;
pub use lap_assembly::{SessionPayload, assemble_session_laps};
pub use track_status::track_status_by_lap;
