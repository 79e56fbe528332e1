// Domain layer: CPF handling, registry records and the ports the audit runs against.

pub mod cpf;
pub mod model;
pub mod ports;
