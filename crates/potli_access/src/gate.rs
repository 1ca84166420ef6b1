use potli_common::models::AdminUser;
use potli_db::{DbError, Repository, SqlUserRepository};
use serde_json::Value;

/// User metadata key granting access to the restricted sections.
pub const ACCESS_FLAG: &str = "can_access_users_developer";

const RESTRICTED_PREFIXES: [&str; 6] = [
    "/admin/users",
    "/admin/invites",
    "/admin/api-keys",
    "/admin/hooks",
    "/admin/workflows-executions",
    "/admin/index",
];

/// Invitees have no account yet.
const INVITE_ACCEPT_PREFIX: &str = "/admin/invites/accept";

pub fn is_restricted_path(path: &str) -> bool {
    if path.starts_with(INVITE_ACCEPT_PREFIX) {
        return false;
    }
    RESTRICTED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

#[derive(Debug, Clone)]
pub struct SettingsGate {
    allowed_emails: Vec<String>,
    users: SqlUserRepository,
}

impl SettingsGate {
    pub fn new(allowed_emails: &[String], users: SqlUserRepository) -> Self {
        let allowed_emails = allowed_emails
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { allowed_emails, users }
    }

    pub fn allows(&self, user: &AdminUser) -> bool {
        let by_email = self.allowed_emails.contains(&user.email.to_lowercase());
        let by_metadata = matches!(user.metadata.get(ACCESS_FLAG), Some(Value::Bool(true)));
        by_email || by_metadata
    }

    /// `false` for unknown users.
    pub async fn can_access(&self, user_id: &str) -> Result<bool, DbError> {
        Ok(self
            .users
            .read(user_id)
            .await?
            .is_some_and(|user| self.allows(&user)))
    }
}
