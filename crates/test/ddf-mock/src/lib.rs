//! In-process stand-ins for the device manager services of `ddf-api`.
//!
//! Every mock records what the driver asked of it so tests can assert on
//! call counts and ordering, and can be told to fail on demand.

mod authority;
mod dispatch;
mod functions;

pub use authority::{MockAuthority, MockSession};
pub use dispatch::MockDispatch;
pub use functions::MockFunctions;
pub use ports::PortSpace;
