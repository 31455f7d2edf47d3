pub mod reconcile;
pub mod timestamp;
pub mod usage;
pub mod zone;
