pub mod lifecycle;
pub mod slot;

pub use lifecycle::{LayerTarget, MapLifecycle};
pub use slot::InstanceSlot;
