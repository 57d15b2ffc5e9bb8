//! HTTP backend for a Supabase project
//!
//! Auth goes through GoTrue (`/auth/v1`), rows through PostgREST (`/rest/v1`)
//! and receipt images through Storage (`/storage/v1`). Every call is a
//! blocking round trip; there are no retries.

use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::events::{AuthChangeEvent, SessionSlot};
use super::{Backend, SignUpOutcome};
use crate::config::BackendConfig;
use crate::error::{FinwiseError, FinwiseResult};
use crate::models::{Expense, Money, NewExpense, Profile, Session, User, UserId};

/// PostgREST returns a single object instead of an array with this media type
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Backend client for a hosted Supabase project
pub struct SupabaseBackend {
    client: Client,
    config: BackendConfig,
    slot: SessionSlot,
}

impl SupabaseBackend {
    pub fn new(config: BackendConfig) -> FinwiseResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FinwiseError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            slot: SessionSlot::new(),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str, bearer: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.url, path);
        tracing::debug!(%method, %url, "backend request");

        self.client
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", bearer))
    }

    /// Request authorized with the anon key (sign-in, sign-up, refresh)
    fn anon_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path, &self.config.anon_key)
    }

    /// Request authorized as the signed-in user
    fn user_request(&self, method: Method, path: &str) -> FinwiseResult<RequestBuilder> {
        let session = self.slot.get().ok_or(FinwiseError::NotAuthenticated)?;
        Ok(self.request(method, path, &session.access_token))
    }

    fn send_auth(&self, request: RequestBuilder) -> FinwiseResult<Value> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "auth request rejected");
            return Err(FinwiseError::Auth(
                parse_error_message(&body).unwrap_or_else(|| fallback_message(status)),
            ));
        }

        parse_body(&body)
    }

    fn establish(&self, session: Session, event: AuthChangeEvent) -> Session {
        self.slot.establish(session.clone(), event);
        session
    }
}

impl Backend for SupabaseBackend {
    fn session_slot(&self) -> &SessionSlot {
        &self.slot
    }

    fn sign_up(&self, email: &str, password: &str, username: &str) -> FinwiseResult<SignUpOutcome> {
        let request = self.anon_request(Method::POST, "/auth/v1/signup").json(&json!({
            "email": email,
            "password": password,
            "data": { "username": username },
        }));

        let outcome = parse_sign_up_response(self.send_auth(request)?, Utc::now().timestamp())?;

        if let Some(session) = &outcome.session {
            self.slot.establish(session.clone(), AuthChangeEvent::SignedIn);
        }

        Ok(outcome)
    }

    fn sign_in_with_password(&self, email: &str, password: &str) -> FinwiseResult<Session> {
        let request = self
            .anon_request(Method::POST, "/auth/v1/token?grant_type=password")
            .json(&json!({ "email": email, "password": password }));

        let session = parse_token_response(self.send_auth(request)?, Utc::now().timestamp())?;
        Ok(self.establish(session, AuthChangeEvent::SignedIn))
    }

    fn refresh_session(&self) -> FinwiseResult<Session> {
        let current = self.slot.get().ok_or(FinwiseError::NotAuthenticated)?;

        let request = self
            .anon_request(Method::POST, "/auth/v1/token?grant_type=refresh_token")
            .json(&json!({ "refresh_token": current.refresh_token }));

        match self.send_auth(request) {
            Ok(body) => {
                let session = parse_token_response(body, Utc::now().timestamp())?;
                Ok(self.establish(session, AuthChangeEvent::TokenRefreshed))
            }
            Err(err @ FinwiseError::Auth(_)) => {
                // A rejected refresh token cannot be used again
                tracing::warn!(error = %err, "session refresh rejected, signing out");
                self.slot.clear();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn sign_out(&self) -> FinwiseResult<()> {
        let Some(session) = self.slot.get() else {
            self.slot.clear();
            return Ok(());
        };

        let result = self
            .request(Method::POST, "/auth/v1/logout", &session.access_token)
            .send()
            .map_err(FinwiseError::from)
            .and_then(|response| {
                let status = response.status();
                // An already-invalid token means the session is gone anyway
                if status.is_success()
                    || status == StatusCode::UNAUTHORIZED
                    || status == StatusCode::NOT_FOUND
                {
                    Ok(())
                } else {
                    Err(backend_error(status, &response.text().unwrap_or_default()))
                }
            });

        self.slot.clear();
        result
    }

    fn insert_profile(&self, profile: &Profile) -> FinwiseResult<()> {
        let response = self
            .user_request(Method::POST, "/rest/v1/profiles")?
            .header("Prefer", "return=minimal")
            .json(profile)
            .send()?;

        check(response).map(|_| ())
    }

    fn fetch_profile(&self, user_id: UserId) -> FinwiseResult<Profile> {
        let response = self
            .user_request(
                Method::GET,
                &format!("/rest/v1/profiles?id=eq.{}&select=*", user_id),
            )?
            .header(ACCEPT, SINGLE_OBJECT)
            .send()?;

        // PostgREST answers 406 when a single-object request matches no rows
        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(FinwiseError::profile_not_found(user_id.to_string()));
        }

        Ok(check(response)?.json()?)
    }

    fn update_savings_goal(&self, user_id: UserId, goal: Money) -> FinwiseResult<()> {
        let response = self
            .user_request(Method::PATCH, &format!("/rest/v1/profiles?id=eq.{}", user_id))?
            .header("Prefer", "return=minimal")
            .json(&json!({ "savings_goal": goal }))
            .send()?;

        check(response).map(|_| ())
    }

    fn list_expenses(&self, user_id: UserId) -> FinwiseResult<Vec<Expense>> {
        let response = self
            .user_request(
                Method::GET,
                &format!(
                    "/rest/v1/expenses?user_id=eq.{}&select=*&order=created_at.desc",
                    user_id
                ),
            )?
            .send()?;

        Ok(check(response)?.json()?)
    }

    fn insert_expense(&self, expense: &NewExpense) -> FinwiseResult<Expense> {
        let response = self
            .user_request(Method::POST, "/rest/v1/expenses")?
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(expense)
            .send()?;

        Ok(check(response)?.json()?)
    }

    fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> FinwiseResult<String> {
        let response = self
            .user_request(
                Method::POST,
                &format!("/storage/v1/object/{}/{}", bucket, path),
            )?
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes.to_vec())
            .send()?;

        let body = check(response)?.text()?;
        Ok(parse_upload_response(&body, bucket, path))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.config.url, bucket, path)
    }
}

/// `{base}/storage/v1/object/public/{bucket}/{path}`
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}/{}",
        base_url.trim_end_matches('/'),
        bucket,
        path
    )
}

fn check(response: Response) -> FinwiseResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(backend_error(status, &body))
}

fn backend_error(status: StatusCode, body: &str) -> FinwiseError {
    let message = parse_error_message(body).unwrap_or_else(|| fallback_message(status));
    tracing::debug!(status = status.as_u16(), %message, "backend request failed");
    FinwiseError::Backend {
        status: status.as_u16(),
        message,
    }
}

fn fallback_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn parse_body(body: &str) -> FinwiseResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// Pull a human-readable message out of an error body
///
/// GoTrue uses `error_description` or `msg`, PostgREST and Storage use
/// `message`, and older endpoints only set `error`.
pub fn parse_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    ["error_description", "msg", "message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

/// Build a session from a token grant response
pub fn parse_token_response(body: Value, now: i64) -> FinwiseResult<Session> {
    let token: TokenResponse = serde_json::from_value(body)
        .map_err(|e| FinwiseError::Auth(format!("Unexpected auth response: {}", e)))?;

    let expires_at = token
        .expires_at
        .unwrap_or_else(|| now + token.expires_in.unwrap_or(3600));

    Ok(Session {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at,
        user: token.user,
    })
}

/// Interpret a sign-up response
///
/// With email confirmation disabled the provider answers with a full session;
/// otherwise it answers with the bare user record.
pub fn parse_sign_up_response(body: Value, now: i64) -> FinwiseResult<SignUpOutcome> {
    if body.get("access_token").is_some() {
        let session = parse_token_response(body, now)?;
        return Ok(SignUpOutcome {
            user: Some(session.user.clone()),
            session: Some(session),
        });
    }

    if body.get("id").is_some() {
        let user: User = serde_json::from_value(body)
            .map_err(|e| FinwiseError::Auth(format!("Unexpected auth response: {}", e)))?;
        return Ok(SignUpOutcome {
            user: Some(user),
            session: None,
        });
    }

    Ok(SignUpOutcome::default())
}

/// Object path relative to the bucket
///
/// Storage reports `{"Key": "<bucket>/<path>"}`; fall back to the requested
/// path when the body is missing or unexpected.
pub fn parse_upload_response(body: &str, bucket: &str, requested: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("Key").and_then(Value::as_str).map(str::to_string))
        .map(|key| {
            key.strip_prefix(bucket)
                .and_then(|rest| rest.strip_prefix('/'))
                .map(str::to_string)
                .unwrap_or(key)
        })
        .unwrap_or_else(|| requested.to_string())
}
