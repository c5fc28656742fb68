// Domain layer: request-scoped models and the ports for the external collaborators.

pub mod model;
pub mod ports;
