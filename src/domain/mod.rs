// Domain layer: the webhook payload model and the ports the relay talks through.

pub mod model;
pub mod ports;
