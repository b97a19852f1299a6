//! Seeded UUIDs.

use rand::Rng;
use uuid::{Builder, Uuid};

/// Draw a version 4 UUID from `rng`.
///
/// `Uuid::new_v4` reads the OS RNG and would make runs irreproducible.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}
