//! Sensor drivers

pub mod ir_distance;
pub mod rd03d;

pub use ir_distance::IrDistanceSensor;
pub use rd03d::{decode_target, Rd03d};
