// Domain layer: probe models, the platform catalog and the ports adapters implement.

pub mod model;
pub mod platforms;
pub mod ports;
