use reqwest::Client;

use crate::config::SignupConfig;
use crate::infra::email::ResendEmailSender;
use crate::infra::identity::GoTrueIdentityPort;
use crate::infra::rest::{
    RestCompanyRepository, RestEmployeeRepository, RestProfileRepository,
    RestSignupCodeRepository, RestSubscriptionRepository,
};
use crate::infra::supabase::SupabaseClient;
use crate::usecase::pricing::ModulePrices;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub supabase: SupabaseClient,
    pub mailer: ResendEmailSender,
    pub code_salt: String,
    pub module_prices: ModulePrices,
}

impl AppState {
    pub fn new(config: SignupConfig, http: Client) -> Self {
        Self {
            supabase: SupabaseClient::new(
                http.clone(),
                config.supabase_url,
                config.service_role_key,
            ),
            mailer: ResendEmailSender {
                http,
                base_url: config.resend_url,
                api_key: config.resend_api_key,
                from: config.resend_from,
            },
            code_salt: config.code_salt,
            module_prices: config.module_prices,
        }
    }

    pub fn signup_code_repo(&self) -> RestSignupCodeRepository {
        RestSignupCodeRepository {
            client: self.supabase.clone(),
        }
    }

    pub fn company_repo(&self) -> RestCompanyRepository {
        RestCompanyRepository {
            client: self.supabase.clone(),
        }
    }

    pub fn employee_repo(&self) -> RestEmployeeRepository {
        RestEmployeeRepository {
            client: self.supabase.clone(),
        }
    }

    pub fn profile_repo(&self) -> RestProfileRepository {
        RestProfileRepository {
            client: self.supabase.clone(),
        }
    }

    pub fn subscription_repo(&self) -> RestSubscriptionRepository {
        RestSubscriptionRepository {
            client: self.supabase.clone(),
        }
    }

    pub fn identity_port(&self) -> GoTrueIdentityPort {
        GoTrueIdentityPort {
            client: self.supabase.clone(),
        }
    }

    pub fn email_sender(&self) -> ResendEmailSender {
        self.mailer.clone()
    }
}
