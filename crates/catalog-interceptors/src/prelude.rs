pub use crate::client::{ClientAuthGate, RefreshPolicy, RefreshState, TokenSource};
pub use crate::context::CallContext;
pub use crate::metadata::{Metadata, AUTHORIZATION};
pub use crate::server::{GateObserver, RejectReason, ServerAuthGate};
pub use crate::stages::context_init::ContextInitStage;
pub use crate::stages::{InterceptorChain, Stage};
pub use crate::status::{Code, Status};
pub use crate::stream::{channel, StreamSink, Streaming};
