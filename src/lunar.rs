use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{NeoError, NeoResult};

/// Default environment variables holding the astronomy API credential pair.
pub const DEFAULT_APP_ID_VAR: &str = "ASTRONOMY_APP_ID";
pub const DEFAULT_APP_SECRET_VAR: &str = "ASTRONOMY_APP_SECRET";

// ---------------------------------------------------------------------------
// Credentials – application id / secret pair
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
}

// Keep the secret out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Credentials {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }

    /// Read both halves from the named environment variables.
    pub fn from_env(id_var: &str, secret_var: &str) -> NeoResult<Self> {
        Self::from_lookup(id_var, secret_var, |name| std::env::var(name).ok())
    }

    fn from_lookup(
        id_var: &str,
        secret_var: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> NeoResult<Self> {
        let read = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| NeoError::MissingCredential(name.to_string()))
        };
        Ok(Credentials::new(read(id_var)?, read(secret_var)?))
    }

    /// Base64 of `"{app_id}:{app_secret}"`.
    pub fn basic_auth_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.app_id, self.app_secret))
    }
}

/// First few characters of a token, the rest hidden.
pub fn mask_token(token: &str) -> String {
    let shown: String = token.chars().take(4).collect();
    format!("{shown}… ({} chars)", token.chars().count())
}

// ---------------------------------------------------------------------------
// Page state
// ---------------------------------------------------------------------------

/// What the lunar page shows: a ready token or the reason there is none.
#[derive(Debug, Clone)]
pub struct LunarPage {
    pub token: Result<String, String>,
}

impl LunarPage {
    pub fn load(id_var: &str, secret_var: &str) -> Self {
        let token = match Credentials::from_env(id_var, secret_var) {
            Ok(creds) => {
                log::info!("Lunar credentials loaded for {}", creds.app_id);
                Ok(creds.basic_auth_token())
            }
            Err(e) => {
                log::warn!("Lunar page unavailable: {e}");
                Err(e.to_string())
            }
        };
        LunarPage { token }
    }
}
