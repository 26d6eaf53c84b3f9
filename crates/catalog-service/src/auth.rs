use catalog_auth::{TokenAuthority, UserStore};
use catalog_interceptors::{CallContext, Status};
use catalog_types::message::{LoginRequest, LoginResponse};
use std::sync::Arc;

pub struct AuthServer {
    users: Arc<dyn UserStore>,
    authority: Arc<TokenAuthority>,
}

impl AuthServer {
    pub fn new(users: Arc<dyn UserStore>, authority: Arc<TokenAuthority>) -> Self {
        Self { users, authority }
    }

    pub async fn login(
        &self,
        cx: &CallContext,
        request: LoginRequest,
    ) -> Result<LoginResponse, Status> {
        cx.signal.check()?;

        let user = self.users.find(&request.username).await.map_err(|err| {
            tracing::error!(error = %err, "user lookup failed");
            Status::internal(format!("cannot find user: {err}"))
        })?;

        let user = match user {
            Some(user) if user.is_correct_password(&request.password) => user,
            _ => return Err(Status::not_found("incorrect username or password")),
        };

        let access_token = self.authority.issue(&user).map_err(|err| {
            tracing::error!(error = %err, "token signing failed");
            Status::internal("cannot generate access token")
        })?;

        tracing::info!(username = %user.username, role = %user.role, "user logged in");
        Ok(LoginResponse { access_token })
    }
}
