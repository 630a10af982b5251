// Domain layer: shared feature schema, request/response types and ports.

pub mod model;
pub mod ports;
