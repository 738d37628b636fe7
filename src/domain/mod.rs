// Domain layer: wire models, presets and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod preset;
