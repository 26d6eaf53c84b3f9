pub mod clock;
pub mod errors;
pub mod password;
pub mod policy;
pub mod prelude;
pub mod token;
pub mod user;

pub use errors::AuthError;
pub use policy::AccessPolicy;
pub use token::{Claims, TokenAuthority, TokenError};
pub use user::{InMemoryUserStore, User, UserStore};
