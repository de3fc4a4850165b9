//! # vexillum-contact
//!
//! Collision resolution between the flag and its pole.
//!
//! The only obstacle is the pole itself: an infinite vertical cylinder
//! through the pole base. Particles that end up inside its exclusion radius
//! are projected radially back onto the boundary.

pub mod pole_collider;
pub mod response;

pub use pole_collider::PoleCollider;
pub use response::ContactResult;
