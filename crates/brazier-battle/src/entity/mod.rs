//! Scene entities: characters with bone skeletons, hitboxes and status markers.

mod character;
mod hitbox;
mod skeleton;

pub use character::{Character, Side, Status};
pub use hitbox::{Hitbox, HitboxKind};
pub use skeleton::{Bone, BoneId, Skeleton, MAX_DEPTH};
