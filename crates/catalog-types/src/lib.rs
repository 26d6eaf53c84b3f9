pub mod fixture;
pub mod id;
pub mod laptop;
pub mod message;
pub mod method;
pub mod prelude;
pub mod role;
#[cfg(feature = "sample")]
pub mod sample;
pub mod signal;

pub use id::{resolve_laptop_id, IdError};
pub use laptop::{Filter, Laptop, Memory, MemoryUnit, Rating};
pub use role::Role;
pub use signal::{CallSignal, Interrupted};
