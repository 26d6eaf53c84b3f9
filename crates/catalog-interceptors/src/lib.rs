pub mod client;
pub mod context;
pub mod metadata;
pub mod prelude;
pub mod server;
pub mod stages;
pub mod status;
pub mod stream;

pub use context::CallContext;
pub use metadata::Metadata;
pub use stages::{InterceptorChain, Stage};
pub use status::{Code, Status};
