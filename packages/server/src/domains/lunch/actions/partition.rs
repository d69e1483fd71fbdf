//! Random partitioning of a roster into lunch groups.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::common::ParticipantId;

/// Smallest group worth sending to lunch.
pub const MIN_GROUP_SIZE: usize = 3;

/// Shuffle `ids` and split them into groups of three, spreading the
/// leftovers round-robin over the first groups.
///
/// Fewer than [`MIN_GROUP_SIZE`] ids yields no groups. Otherwise there are
/// exactly `len / 3` groups and every id lands in exactly one of them.
pub fn partition_into_groups<R>(ids: &[ParticipantId], rng: &mut R) -> Vec<Vec<ParticipantId>>
where
    R: Rng + ?Sized,
{
    if ids.len() < MIN_GROUP_SIZE {
        return Vec::new();
    }

    let mut shuffled = ids.to_vec();
    shuffled.shuffle(rng);

    let num_groups = shuffled.len() / MIN_GROUP_SIZE;
    let leftovers = shuffled.split_off(num_groups * MIN_GROUP_SIZE);

    let mut groups: Vec<Vec<ParticipantId>> = shuffled
        .chunks(MIN_GROUP_SIZE)
        .map(<[ParticipantId]>::to_vec)
        .collect();

    for (i, id) in leftovers.into_iter().enumerate() {
        groups[i % num_groups].push(id);
    }

    groups
}

/// [`partition_into_groups`] using the thread-local RNG.
pub fn partition(ids: &[ParticipantId]) -> Vec<Vec<ParticipantId>> {
    partition_into_groups(ids, &mut rand::thread_rng())
}
