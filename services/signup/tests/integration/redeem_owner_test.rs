use chrono::Duration;
use uuid::Uuid;

use onboard_domain::id::{SignupCodeId, UserId};
use onboard_domain::purpose::{ProfileRole, SignupPurpose};
use onboard_signup::domain::types::IdentityUser;
use onboard_signup::error::SignupError;
use onboard_signup::usecase::redeem::{OwnerSignup, Provisioning, RedeemInput};

use crate::helpers::{
    GOOD_CODE, MockProfileRepo, MockSignupCodeRepo, OWNER_EMAIL, PASSWORD, World,
};

fn owner_input(code: &str, module_ids: &[&str]) -> RedeemInput {
    RedeemInput {
        email: OWNER_EMAIL.to_owned(),
        code: code.to_owned(),
        provisioning: Provisioning::Owner(OwnerSignup {
            password: PASSWORD.to_owned(),
            full_name: "Jane Doe".to_owned(),
            company_name: "Acme".to_owned(),
            company_size: "10-49".to_owned(),
            max_employees: Some(25),
            module_ids: module_ids.iter().map(|m| (*m).to_owned()).collect(),
        }),
    }
}

fn fresh_owner_code(world: &World) -> SignupCodeId {
    world.seed_code(
        OWNER_EMAIL,
        SignupPurpose::OwnerSignup,
        GOOD_CODE,
        None,
        Duration::minutes(1),
    )
}

#[tokio::test]
async fn should_provision_owner_company_and_profile() {
    let world = World::new();
    let code_id = fresh_owner_code(&world);

    let out = world
        .redeemer()
        .execute(owner_input(GOOD_CODE, &[]))
        .await
        .unwrap();

    assert_eq!(out.purpose, SignupPurpose::OwnerSignup);
    assert!(out.company_code.starts_with("ACM"), "got {}", out.company_code);
    assert_eq!(out.company_code.len(), 9);
    assert!(out.company_code[3..].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(out.employee_id, None);
    assert_eq!(out.subscription_id, None);

    let companies = world.companies.companies.lock().unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].id, out.company_id);
    assert_eq!(companies[0].owner_user_id, out.user_id);
    assert_eq!(companies[0].max_employees, Some(25));

    let profiles = world.profiles.profiles.lock().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].user_id, out.user_id);
    assert_eq!(profiles[0].role, ProfileRole::Owner);
    assert!(profiles[0].is_admin);
    assert_eq!(profiles[0].company_name, "Acme");

    assert!(world.code(code_id).used_at.is_some(), "code should be consumed");
    assert!(world.subscriptions.subscriptions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_create_subscription_priced_from_modules() {
    let world = World::new();
    fresh_owner_code(&world);

    let out = world
        .redeemer()
        .execute(owner_input(GOOD_CODE, &["rota", "payroll", "rota"]))
        .await
        .unwrap();

    assert!(out.subscription_id.is_some());
    let subscriptions = world.subscriptions.subscriptions.lock().unwrap();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].company_id, out.company_id);
    assert_eq!(subscriptions[0].module_ids, vec!["rota", "payroll"]);
    assert_eq!(subscriptions[0].monthly_price, 4000);
    assert_eq!(subscriptions[0].currency, "GBP");
    assert_eq!(subscriptions[0].status, "active");
}

#[tokio::test]
async fn should_reject_unknown_module_before_consuming_code() {
    let world = World::new();
    let code_id = fresh_owner_code(&world);

    let result = world
        .redeemer()
        .execute(owner_input(GOOD_CODE, &["teleport"]))
        .await;

    assert!(
        matches!(result, Err(SignupError::InvalidInput(ref m)) if m == "Unknown module: teleport"),
        "expected Unknown module, got {result:?}"
    );
    assert!(world.code(code_id).used_at.is_none());
    assert_eq!(world.identity_users(), 0);
}

#[tokio::test]
async fn should_reject_incorrect_code_without_side_effects() {
    let world = World::new();
    let code_id = fresh_owner_code(&world);

    let result = world.redeemer().execute(owner_input("654321", &[])).await;

    assert!(
        matches!(result, Err(SignupError::IncorrectCode)),
        "expected IncorrectCode, got {result:?}"
    );
    assert!(world.code(code_id).used_at.is_none());
    assert_eq!(world.identity_users(), 0);
    assert!(world.companies.companies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_expired_code() {
    let world = World::new();
    world.seed_code(
        OWNER_EMAIL,
        SignupPurpose::OwnerSignup,
        GOOD_CODE,
        None,
        Duration::minutes(11),
    );

    let result = world.redeemer().execute(owner_input(GOOD_CODE, &[])).await;

    assert!(
        matches!(result, Err(SignupError::CodeExpired)),
        "expected CodeExpired, got {result:?}"
    );
    assert_eq!(world.identity_users(), 0);
}

#[tokio::test]
async fn should_report_missing_code() {
    let world = World::new();

    let result = world.redeemer().execute(owner_input(GOOD_CODE, &[])).await;

    assert!(
        matches!(result, Err(SignupError::CodeNotFound)),
        "expected CodeNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_only_redeem_latest_code() {
    let world = World::new();
    world.seed_code(
        OWNER_EMAIL,
        SignupPurpose::OwnerSignup,
        GOOD_CODE,
        None,
        Duration::minutes(5),
    );
    world.seed_code(
        OWNER_EMAIL,
        SignupPurpose::OwnerSignup,
        "999999",
        None,
        Duration::minutes(1),
    );

    let result = world.redeemer().execute(owner_input(GOOD_CODE, &[])).await;

    assert!(
        matches!(result, Err(SignupError::IncorrectCode)),
        "expected IncorrectCode, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_second_redemption() {
    let world = World::new();
    fresh_owner_code(&world);
    world
        .redeemer()
        .execute(owner_input(GOOD_CODE, &[]))
        .await
        .unwrap();

    let result = world.redeemer().execute(owner_input(GOOD_CODE, &[])).await;

    assert!(
        matches!(result, Err(SignupError::CodeAlreadyUsed)),
        "expected CodeAlreadyUsed, got {result:?}"
    );
    assert_eq!(world.identity_users(), 1);
}

#[tokio::test]
async fn should_refuse_registered_email_before_consuming_code() {
    let world = World::new();
    let code_id = fresh_owner_code(&world);
    world.identity.users.lock().unwrap().push(IdentityUser {
        id: UserId(Uuid::new_v4()),
        email: OWNER_EMAIL.to_owned(),
    });

    let result = world.redeemer().execute(owner_input(GOOD_CODE, &[])).await;

    assert!(
        matches!(result, Err(SignupError::EmailAlreadyRegistered)),
        "expected EmailAlreadyRegistered, got {result:?}"
    );
    assert!(world.code(code_id).used_at.is_none());
    assert!(world.companies.companies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_lose_concurrent_consume_without_provisioning() {
    let world = World {
        codes: MockSignupCodeRepo {
            lose_consume_race: true,
            ..MockSignupCodeRepo::default()
        },
        ..World::new()
    };
    fresh_owner_code(&world);

    let result = world.redeemer().execute(owner_input(GOOD_CODE, &[])).await;

    assert!(
        matches!(result, Err(SignupError::CodeAlreadyUsed)),
        "expected CodeAlreadyUsed, got {result:?}"
    );
    assert_eq!(world.identity_users(), 0);
}

#[tokio::test]
async fn should_compensate_and_release_code_when_profile_fails() {
    let world = World {
        profiles: MockProfileRepo {
            fail_create: true,
            ..MockProfileRepo::default()
        },
        ..World::new()
    };
    let code_id = fresh_owner_code(&world);

    let result = world.redeemer().execute(owner_input(GOOD_CODE, &[])).await;

    assert!(
        matches!(result, Err(SignupError::Upstream { context: "Create profile", .. })),
        "expected Upstream, got {result:?}"
    );
    assert_eq!(world.identity.created.lock().unwrap().len(), 1);
    assert_eq!(world.identity_users(), 0, "identity user should be deleted");
    assert!(world.companies.companies.lock().unwrap().is_empty());
    assert!(
        world.code(code_id).used_at.is_none(),
        "code should be released for retry"
    );
}

#[tokio::test]
async fn should_allow_retry_after_compensation() {
    let failing = World {
        profiles: MockProfileRepo {
            fail_create: true,
            ..MockProfileRepo::default()
        },
        ..World::new()
    };
    fresh_owner_code(&failing);
    assert!(failing.redeemer().execute(owner_input(GOOD_CODE, &[])).await.is_err());

    let recovered = World {
        profiles: MockProfileRepo::default(),
        ..failing.clone()
    };
    let out = recovered
        .redeemer()
        .execute(owner_input(GOOD_CODE, &[]))
        .await
        .unwrap();

    assert_eq!(out.purpose, SignupPurpose::OwnerSignup);
    assert_eq!(recovered.identity_users(), 1);
}
