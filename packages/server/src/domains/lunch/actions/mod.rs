//! Lunch domain actions - pure business logic with no I/O

mod partition;

pub use partition::{partition, partition_into_groups, MIN_GROUP_SIZE};
