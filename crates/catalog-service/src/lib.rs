pub mod auth;
pub mod channel;
pub mod client;
pub mod laptop;
pub mod observe;
pub mod prelude;
pub mod server;

pub use auth::AuthServer;
pub use channel::LocalChannel;
pub use client::{AuthClient, LaptopClient};
pub use laptop::LaptopServer;
pub use server::CatalogServer;
