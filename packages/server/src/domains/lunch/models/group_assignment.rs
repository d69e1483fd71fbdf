use serde::{Deserialize, Serialize};

use crate::common::ParticipantId;

/// The published lunch groups for one event.
///
/// Written once per event; an assignment with no groups means there were
/// not enough people.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupAssignment {
    groups: Vec<Vec<ParticipantId>>,
}

impl GroupAssignment {
    pub fn new(groups: Vec<Vec<ParticipantId>>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Vec<ParticipantId>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn participant_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}
