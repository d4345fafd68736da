// Domain layer: plain report data and the ports the engine talks through.

pub mod model;
pub mod ports;
