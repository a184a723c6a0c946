pub mod events;
pub mod matches;
pub mod settlement;
pub(crate) mod tasks;
