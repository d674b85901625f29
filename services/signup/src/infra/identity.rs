use anyhow::Context as _;
use serde::Deserialize;
use serde_json::json;

use onboard_domain::id::UserId;

use crate::domain::repository::IdentityPort;
use crate::domain::types::{IdentityUser, NewIdentityUser};
use crate::error::SignupError;
use crate::infra::http::{ensure_success, read_json};
use crate::infra::supabase::SupabaseClient;

/// Identity port backed by the GoTrue admin API.
#[derive(Clone)]
pub struct GoTrueIdentityPort {
    pub client: SupabaseClient,
}

#[derive(Debug, Deserialize)]
struct AdminUser {
    id: uuid::Uuid,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdminUserList {
    #[serde(default)]
    users: Vec<AdminUser>,
}

impl From<AdminUser> for IdentityUser {
    fn from(user: AdminUser) -> Self {
        Self {
            id: UserId(user.id),
            email: user.email.unwrap_or_default(),
        }
    }
}

/// GoTrue rejects duplicate accounts with a 4xx and varying codes; the message is the
/// stable part. Server errors are never duplicates.
fn is_duplicate_user(status: u16, body: &str) -> bool {
    if !(400..500).contains(&status) {
        return false;
    }
    let body = body.to_lowercase();
    body.contains("already") || body.contains("exists")
}

impl IdentityPort for GoTrueIdentityPort {
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityUser>, SignupError> {
        let mut url = self.client.admin_url("users")?;
        url.query_pairs_mut().append_pair("email", email);
        let resp = self
            .client
            .authorize(self.client.http().get(url))
            .send()
            .await
            .context("Find user")?;
        let list: AdminUserList = read_json(resp, "Find user").await?;
        Ok(list
            .users
            .into_iter()
            .find(|u| {
                u.email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .map(IdentityUser::from))
    }

    async fn create_user(&self, user: &NewIdentityUser) -> Result<IdentityUser, SignupError> {
        let url = self.client.admin_url("users")?;
        let resp = self
            .client
            .authorize(self.client.http().post(url))
            .json(&json!({
                "email": user.email,
                "password": user.password,
                "email_confirm": true,
                "user_metadata": { "full_name": user.full_name },
            }))
            .send()
            .await
            .context("Create user")?;
        match ensure_success(resp, "Create user").await {
            Ok(resp) => {
                let created: AdminUser = resp.json().await.context("Create user")?;
                Ok(created.into())
            }
            Err(SignupError::Upstream { status, body, .. }) if is_duplicate_user(status, &body) => {
                Err(SignupError::EmailAlreadyRegistered)
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_user(&self, id: UserId) -> Result<(), SignupError> {
        let url = self.client.admin_url(&format!("users/{id}"))?;
        let resp = self
            .client
            .authorize(self.client.http().delete(url))
            .send()
            .await
            .context("Delete user")?;
        ensure_success(resp, "Delete user").await?;
        Ok(())
    }
}
