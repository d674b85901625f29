use chrono::{Duration, Utc};
use tracing::info;

use onboard_domain::purpose::SignupPurpose;

use crate::domain::repository::{EmailSender, SignupCodeRepository};
use crate::domain::types::{CodeScope, EmailMessage, NewSignupCode, SIGNUP_CODE_TTL_SECS};
use crate::error::SignupError;
use crate::usecase::code::{generate_code, hash_code};

/// Normalised issue request. Empty strings mean "not supplied".
#[derive(Debug, Clone)]
pub struct IssueCodeInput {
    pub email: String,
    pub purpose: SignupPurpose,
    pub company_code: Option<String>,
    pub full_name: Option<String>,
}

pub struct IssueCodeUseCase<C, M>
where
    C: SignupCodeRepository,
    M: EmailSender,
{
    pub codes: C,
    pub mailer: M,
    pub salt: String,
}

impl<C, M> IssueCodeUseCase<C, M>
where
    C: SignupCodeRepository,
    M: EmailSender,
{
    pub async fn execute(&self, input: IssueCodeInput) -> Result<(), SignupError> {
        if input.email.is_empty() {
            return Err(SignupError::invalid("Missing email"));
        }
        let company_code = match input.purpose {
            SignupPurpose::OwnerSignup => None,
            SignupPurpose::EmployeeSignup => Some(
                input
                    .company_code
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| SignupError::invalid("Missing company_code"))?,
            ),
        };

        let scope = CodeScope {
            email: input.email.clone(),
            purpose: input.purpose,
            company_code: company_code.clone(),
        };
        self.codes.discard_unused(&scope).await?;

        let code = generate_code();
        let row = self
            .codes
            .create(&NewSignupCode {
                email: input.email.clone(),
                code_hash: hash_code(&code, &self.salt),
                purpose: input.purpose,
                company_code,
                full_name: input.full_name.filter(|n| !n.is_empty()),
                expires_at: Utc::now() + Duration::seconds(SIGNUP_CODE_TTL_SECS),
            })
            .await?;
        info!(code_id = %row.id, purpose = %input.purpose, "signup code issued");

        self.mailer
            .send(&verification_email(&input.email, &code, input.purpose))
            .await
    }
}

/// Verification email carrying the plaintext code.
pub fn verification_email(to: &str, code: &str, purpose: SignupPurpose) -> EmailMessage {
    let subject = match purpose {
        SignupPurpose::EmployeeSignup => "Your SmartCore employee verification code",
        SignupPurpose::OwnerSignup => "Your SmartCore verification code",
    };
    let minutes = SIGNUP_CODE_TTL_SECS / 60;
    let html = format!(
        r#"<div style="font-family:Inter,system-ui,Segoe UI,Arial;line-height:1.6">
  <h2 style="margin:0 0 12px 0">SmartCore Technology</h2>
  <p style="margin:0 0 12px 0">Your verification code is:</p>
  <div style="font-size:28px;font-weight:700;letter-spacing:6px;background:#0b1020;color:#fff;padding:14px 16px;border-radius:12px;display:inline-block">{code}</div>
  <p style="margin:12px 0 0 0;color:#666">This code expires in {minutes} minutes.</p>
</div>"#
    );
    EmailMessage {
        to: to.to_owned(),
        subject: subject.to_owned(),
        html,
    }
}
