//! Table definitions of the onboarding data store.
//!
//! The service reaches these tables over the PostgREST interface, so the `Model` types
//! double as the JSON row shapes returned by `GET`/`POST`/`PATCH` on `/rest/v1/<table>`.

pub mod companies;
pub mod employees;
pub mod profiles;
pub mod signup_codes;
pub mod subscriptions;
