use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tournaments::rounds::draws::DrawError;

/// Rooms are opaque labels supplied by the tournament.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Room(pub String);

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Room {
    fn from(value: &str) -> Self {
        Room(value.to_string())
    }
}

/// Samples `needed` distinct rooms from the pool.
pub fn sample_rooms<R: Rng + ?Sized>(
    rooms: &[Room],
    needed: usize,
    rng: &mut R,
) -> Result<Vec<Room>, DrawError> {
    if needed > rooms.len() {
        return Err(DrawError::InsufficientRooms {
            needed,
            available: rooms.len(),
        });
    }

    Ok(rand::seq::index::sample(rng, rooms.len(), needed)
        .into_iter()
        .map(|idx| rooms[idx].clone())
        .collect())
}

/// Gives every debate that needs a room one from the pool, without
/// replacement. Debates for which `needs_room` is false get `None`.
pub fn allocate_rooms<R: Rng + ?Sized>(
    rooms: &[Room],
    needs_room: &[bool],
    rng: &mut R,
) -> Result<Vec<Option<Room>>, DrawError> {
    let needed = needs_room.iter().filter(|needs| **needs).count();
    let mut sampled = sample_rooms(rooms, needed, rng)?.into_iter();

    Ok(needs_room
        .iter()
        .map(|needs| if *needs { sampled.next() } else { None })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    fn pool(n: usize) -> Vec<Room> {
        (0..n).map(|i| Room(format!("Room {i}"))).collect()
    }

    #[test]
    fn rooms_are_not_reused_within_a_round() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let rooms = pool(6);

        let allocated =
            allocate_rooms(&rooms, &[true, false, true, true], &mut rng)
                .unwrap();

        assert!(allocated[1].is_none());
        let used = allocated.iter().flatten().collect::<HashSet<_>>();
        assert_eq!(used.len(), 3);
    }

    #[test]
    fn too_few_rooms_is_an_error() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);

        assert_eq!(
            sample_rooms(&pool(2), 3, &mut rng),
            Err(DrawError::InsufficientRooms {
                needed: 3,
                available: 2
            })
        );
    }
}
