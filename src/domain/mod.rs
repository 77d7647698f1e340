// Domain layer: core models and ports. Concrete storage and loaders live under adapters.

pub mod model;
pub mod ports;
