pub mod code;
pub mod kind;
#[cfg(feature = "http")]
pub mod mapping_http;
pub mod model;
pub mod prelude;
pub mod render;
pub mod severity;

pub use code::{codes, ErrorCode};
pub use model::{ErrorBuilder, ErrorObj};
