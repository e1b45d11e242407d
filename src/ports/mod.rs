pub mod clock_port;
pub mod gateway_transport_port;

pub use clock_port::Clock;
pub use gateway_transport_port::GatewayTransport;
