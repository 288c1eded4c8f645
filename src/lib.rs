pub mod agent;
pub mod camera;
pub mod comms;
pub mod messages;
pub mod transport;
pub mod utils;

// Crate version exposed for runtime queries
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
