pub mod event_window;
pub mod group_assignment;
pub mod roster;

pub use event_window::{EventKey, EventPhase, EventWindow, ResolvedEvent};
pub use group_assignment::GroupAssignment;
pub use roster::{LunchGroups, LunchParticipant};
