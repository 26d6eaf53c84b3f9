pub mod demo;
pub mod password;
pub mod runtime;
pub mod serve;

pub use demo::{cmd_demo, run_demo, DemoArgs, DemoFlow, DemoReport};
pub use password::{cmd_hash_password, HashPasswordArgs};
pub use runtime::init_logging;
pub use serve::{cmd_serve, ServeArgs};
