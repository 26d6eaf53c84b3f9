pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::errors::AuthError;
pub use crate::password::{HashParams, PasswordHasher};
pub use crate::policy::AccessPolicy;
pub use crate::token::{Claims, TokenAuthority, TokenError, DEFAULT_TOKEN_TTL};
pub use crate::user::{seed_users, InMemoryUserStore, User, UserSeed, UserStore};
