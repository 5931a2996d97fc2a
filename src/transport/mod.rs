pub mod serial;
pub mod tcp;
pub mod traits;

pub use serial::{SerialConnector, DEFAULT_BAUD};
pub use tcp::TcpListenConnector;
pub use traits::{HostConnector, HostStream};
