pub use crate::auth::AuthServer;
pub use crate::channel::LocalChannel;
pub use crate::client::{AuthClient, LaptopClient};
pub use crate::laptop::{LaptopServer, DEFAULT_MAX_IMAGE_BYTES};
pub use crate::observe::CallObserver;
pub use crate::server::CatalogServer;
