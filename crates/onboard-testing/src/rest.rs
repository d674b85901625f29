//! `httpmock` stand-ins for the upstream collaborators.
//!
//! One mock server plays the Supabase project (PostgREST tables under `/rest/v1` and the
//! GoTrue admin API under `/auth/v1`), a second plays the Resend email API.

use httpmock::prelude::*;
use httpmock::{Method, Mock, MockServer};
use serde_json::{Value, json};

/// Service-role key the mocks expect in `apikey`.
pub const TEST_SERVICE_KEY: &str = "test-service-role-key";

/// Email API key the mocks expect as bearer token.
pub const TEST_EMAIL_KEY: &str = "test-resend-key";

/// Salt used by test configs.
pub const TEST_CODE_SALT: &str = "test-salt";

pub const ADMIN_USERS_PATH: &str = "/auth/v1/admin/users";
pub const EMAILS_PATH: &str = "/emails";

pub fn table_path(table: &str) -> String {
    format!("/rest/v1/{table}")
}

/// Mocked upstream servers for one test.
pub struct Upstreams {
    pub supabase: MockServer,
    pub email: MockServer,
}

impl Default for Upstreams {
    fn default() -> Self {
        Self::start()
    }
}

impl Upstreams {
    pub fn start() -> Self {
        Self {
            supabase: MockServer::start(),
            email: MockServer::start(),
        }
    }

    pub fn supabase_url(&self) -> String {
        self.supabase.base_url()
    }

    pub fn email_url(&self) -> String {
        self.email.base_url()
    }

    /// `GET /rest/v1/{table}` matching every `(param, value)` filter, answering `rows`.
    pub fn select(&self, table: &str, filters: &[(&str, &str)], rows: Value) -> Mock<'_> {
        self.supabase.mock(|when, then| {
            filters.iter().fold(
                when.method(GET)
                    .path(table_path(table))
                    .header("apikey", TEST_SERVICE_KEY),
                |when, (name, value)| when.query_param(*name, *value),
            );
            then.status(200).json_body(rows);
        })
    }

    /// `POST /rest/v1/{table}` answering the created `rows`.
    pub fn insert(&self, table: &str, rows: Value) -> Mock<'_> {
        self.supabase.mock(|when, then| {
            when.method(POST)
                .path(table_path(table))
                .header("apikey", TEST_SERVICE_KEY)
                .header("prefer", "return=representation");
            then.status(201).json_body(rows);
        })
    }

    /// `PATCH /rest/v1/{table}` matching `filters`, answering the updated `rows`.
    pub fn update(&self, table: &str, filters: &[(&str, &str)], rows: Value) -> Mock<'_> {
        self.supabase.mock(|when, then| {
            filters.iter().fold(
                when.method(PATCH)
                    .path(table_path(table))
                    .header("apikey", TEST_SERVICE_KEY),
                |when, (name, value)| when.query_param(*name, *value),
            );
            then.status(200).json_body(rows);
        })
    }

    /// `DELETE /rest/v1/{table}` matching `filters`.
    pub fn delete(&self, table: &str, filters: &[(&str, &str)]) -> Mock<'_> {
        self.supabase.mock(|when, then| {
            filters.iter().fold(
                when.method(DELETE)
                    .path(table_path(table))
                    .header("apikey", TEST_SERVICE_KEY),
                |when, (name, value)| when.query_param(*name, *value),
            );
            then.status(204);
        })
    }

    /// Any `method` on `/rest/v1/{table}` fails with `status` and a text body.
    pub fn fail(&self, method: Method, table: &str, status: u16, body: &str) -> Mock<'_> {
        self.supabase.mock(|when, then| {
            when.method(method).path(table_path(table));
            then.status(status).body(body);
        })
    }

    /// GoTrue admin create-user answering a user with `user_id`.
    pub fn create_user(&self, user_id: &str, email: &str) -> Mock<'_> {
        self.supabase.mock(|when, then| {
            when.method(POST)
                .path(ADMIN_USERS_PATH)
                .header("apikey", TEST_SERVICE_KEY);
            then.status(200)
                .json_body(json!({ "id": user_id, "email": email }));
        })
    }

    /// GoTrue admin create-user rejecting with `status` and `body`.
    pub fn reject_user(&self, status: u16, body: &str) -> Mock<'_> {
        self.supabase.mock(|when, then| {
            when.method(POST).path(ADMIN_USERS_PATH);
            then.status(status).body(body);
        })
    }

    /// GoTrue admin user listing for `email`, answering `users`.
    pub fn find_users(&self, email: &str, users: Value) -> Mock<'_> {
        self.supabase.mock(|when, then| {
            when.method(GET)
                .path(ADMIN_USERS_PATH)
                .query_param("email", email);
            then.status(200).json_body(json!({ "users": users }));
        })
    }

    /// GoTrue admin delete-user for `user_id`.
    pub fn delete_user(&self, user_id: &str) -> Mock<'_> {
        self.supabase.mock(|when, then| {
            when.method(DELETE)
                .path(format!("{ADMIN_USERS_PATH}/{user_id}"));
            then.status(200).json_body(json!({}));
        })
    }

    /// Resend send-email accepting any message.
    pub fn send_email(&self) -> Mock<'_> {
        self.email.mock(|when, then| {
            when.method(POST)
                .path(EMAILS_PATH)
                .header("authorization", format!("Bearer {TEST_EMAIL_KEY}"));
            then.status(200).json_body(json!({ "id": "email-1" }));
        })
    }

    /// Resend send-email failing with `status` and `body`.
    pub fn reject_email(&self, status: u16, body: &str) -> Mock<'_> {
        self.email.mock(|when, then| {
            when.method(POST).path(EMAILS_PATH);
            then.status(status).body(body);
        })
    }
}
