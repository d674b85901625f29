use onboard_core::config::{ConfigError, Env, process_env};

use crate::usecase::pricing::ModulePrices;

pub const DEFAULT_RESEND_FROM: &str = "SmartCore Technology <support@smartcoretechnology.co.uk>";
pub const DEFAULT_RESEND_URL: &str = "https://api.resend.com";
pub const DEFAULT_SIGNUP_PORT: u16 = 3120;

/// Signup service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct SignupConfig {
    /// Supabase project URL; REST tables live under `/rest/v1`, the admin API under `/auth/v1`.
    pub supabase_url: String,
    /// Service-role key sent as `apikey` and bearer token.
    pub service_role_key: String,
    /// Appended to every code before hashing.
    pub code_salt: String,
    pub resend_api_key: String,
    /// Sender address for verification emails. Env var: `RESEND_FROM`.
    pub resend_from: String,
    pub resend_url: String,
    /// Monthly price per module in minor units. Env var: `MODULE_PRICES` (`id=amount,...`).
    pub module_prices: ModulePrices,
    /// TCP port to listen on (default 3120). Env var: `SIGNUP_PORT`.
    pub signup_port: u16,
}

impl SignupConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env())
    }

    pub fn from_lookup<F>(env: Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            supabase_url: trim_base(env.required("SUPABASE_URL")?),
            service_role_key: env.required("SUPABASE_SERVICE_ROLE_KEY")?,
            code_salt: env.required("CODE_SALT")?,
            resend_api_key: env.required("RESEND_API_KEY")?,
            resend_from: env
                .optional("RESEND_FROM")
                .unwrap_or_else(|| DEFAULT_RESEND_FROM.to_owned()),
            resend_url: trim_base(
                env.optional("RESEND_URL")
                    .unwrap_or_else(|| DEFAULT_RESEND_URL.to_owned()),
            ),
            module_prices: env.parse_or("MODULE_PRICES", ModulePrices::default())?,
            signup_port: env.parse_or("SIGNUP_PORT", DEFAULT_SIGNUP_PORT)?,
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_owned()
}
