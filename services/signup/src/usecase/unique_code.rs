use rand::RngExt;

use onboard_domain::naming::{CODE_PREFIX_LEN, FALLBACK_COMPANY_PREFIX, code_prefix};

use crate::domain::repository::{CompanyRepository, EmployeeRepository};
use crate::domain::types::{
    COMPANY_CODE_ATTEMPTS, COMPANY_CODE_DIGITS, EMPLOYEE_CODE_ATTEMPTS, EMPLOYEE_CODE_DIGITS,
};
use crate::error::SignupError;

/// `prefix` followed by `digits` random decimal digits, zero-padded.
fn with_random_suffix(prefix: &str, digits: u32) -> String {
    let n = rand::rng().random_range(0..10u64.pow(digits));
    format!("{prefix}{n:0width$}", width = digits as usize)
}

/// Company codes use a suffix without a leading zero.
fn company_code_candidate(prefix: &str) -> String {
    let low = 10u64.pow(COMPANY_CODE_DIGITS - 1);
    let n = rand::rng().random_range(low..10 * low);
    format!("{prefix}{n}")
}

/// Company code derived from the company name, probed against existing companies.
///
/// Probing is best-effort: after `COMPANY_CODE_ATTEMPTS` collisions the last candidate is
/// returned and the unique index on `companies.company_code` has the final word.
pub async fn unique_company_code<C>(
    companies: &C,
    company_name: &str,
) -> Result<String, SignupError>
where
    C: CompanyRepository,
{
    let prefix = code_prefix(company_name, FALLBACK_COMPANY_PREFIX);
    let mut candidate = company_code_candidate(&prefix);
    for _ in 0..COMPANY_CODE_ATTEMPTS {
        if !companies.code_exists(&candidate).await? {
            return Ok(candidate);
        }
        candidate = company_code_candidate(&prefix);
    }
    tracing::warn!(prefix = %prefix, "company code probe exhausted");
    Ok(candidate)
}

/// Employee code: the first three characters of the company code plus nine digits.
pub async fn unique_employee_code<E>(
    employees: &E,
    company_code: &str,
) -> Result<String, SignupError>
where
    E: EmployeeRepository,
{
    let prefix: String = company_code.chars().take(CODE_PREFIX_LEN).collect();
    let mut candidate = with_random_suffix(&prefix, EMPLOYEE_CODE_DIGITS);
    for _ in 0..EMPLOYEE_CODE_ATTEMPTS {
        if !employees.code_exists(&candidate).await? {
            return Ok(candidate);
        }
        candidate = with_random_suffix(&prefix, EMPLOYEE_CODE_DIGITS);
    }
    tracing::warn!(prefix = %prefix, "employee code probe exhausted");
    Ok(candidate)
}
