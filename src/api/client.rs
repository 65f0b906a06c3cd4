//! HTTP API Client
//!
//! Functions for communicating with the portal REST API. Every request goes
//! through the same small core: the path is normalized under `/api`, the
//! bearer token is attached when present, cookies ride along, and non-2xx
//! responses are turned into the server-supplied error message.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::RequestCredentials;

use crate::api::session;
use crate::state::global::{AdminStats, AdminUser, Event, FaqItem, Registration, UserProfile};

/// Default API base: same-origin, paths prefixed with `/api` below.
pub const DEFAULT_API_BASE: &str = "";

const API_BASE_KEY: &str = "regatta_api_base";

/// API base URL: the same-origin default, or a local-storage override
/// (set by hand when pointing a dev build at another backend).
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(API_BASE_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Normalize an endpoint to an absolute API path: leading slash enforced,
/// `/api` prefixed when absent.
pub fn api_path(endpoint: &str) -> String {
    let path = if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{}", endpoint)
    };
    if path.starts_with("/api/") {
        path
    } else {
        format!("/api{}", path)
    }
}

fn api_url(endpoint: &str) -> String {
    format!("{}{}", get_api_base(), api_path(endpoint))
}

// ============ Request Core ============

fn authorize(builder: RequestBuilder) -> RequestBuilder {
    let builder = builder
        .credentials(RequestCredentials::Include)
        .header("Content-Type", "application/json");
    match session::token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

/// Extract a display message from an error response.
///
/// JSON bodies contribute their `error` (or `message`) field; everything
/// else falls back to a generic message carrying the status code.
pub fn error_message(status: u16, content_type: &str, body: &str) -> String {
    if content_type.contains("application/json") {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            let msg = value
                .get("error")
                .and_then(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    value
                        .get("message")
                        .and_then(|m| m.as_str())
                        .filter(|s| !s.is_empty())
                });
            if let Some(msg) = msg {
                return msg.to_string();
            }
        }
    }
    format!("HTTP error! status: {}", status)
}

/// Whether an error message indicates a missing/expired session.
pub fn is_auth_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("401") || lower.contains("unauthorized")
}

async fn check(response: Response) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let content_type = response.headers().get("content-type").unwrap_or_default();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &content_type, &body);
    // Logged before raising so callers can still react (e.g. redirect)
    web_sys::console::error_1(&format!("API request error: {}", message).into());
    Err(message)
}

async fn get_json<T: DeserializeOwned>(endpoint: &str) -> Result<T, String> {
    let response = authorize(Request::get(&api_url(endpoint)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    let response = check(response).await?;
    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

async fn post_json<T: DeserializeOwned, B: Serialize>(
    endpoint: &str,
    body: &B,
) -> Result<T, String> {
    let response = authorize(Request::post(&api_url(endpoint)))
        .json(body)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    let response = check(response).await?;
    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

async fn post_empty(endpoint: &str) -> Result<(), String> {
    let response = authorize(Request::post(&api_url(endpoint)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    check(response).await?;
    Ok(())
}

async fn get_text(endpoint: &str) -> Result<String, String> {
    let response = authorize(Request::get(&api_url(endpoint)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    let response = check(response).await?;
    response
        .text()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Fetch a bundled static asset (no `/api` prefix, no auth header).
async fn get_static_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = Request::get(path)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    let response = check(response).await?;
    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

// ============ Response Types ============

/// The upstream's common `{status, data, error}` wrapper
#[derive(Debug, serde::Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, String> {
        let succeeded = self.status.as_deref() == Some("success");
        match (succeeded, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self
                .error
                .or(self.message)
                .unwrap_or_else(|| "Unexpected server response".to_string())),
        }
    }
}

/// `{status, error}` acknowledgement with no payload
#[derive(Debug, serde::Deserialize)]
struct Ack {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl Ack {
    fn into_result(self) -> Result<(), String> {
        if self.status.as_deref() == Some("success") {
            Ok(())
        } else {
            Err(self
                .error
                .or(self.message)
                .unwrap_or_else(|| "Unexpected server response".to_string()))
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Outcome of OTP verification
#[derive(Debug, Clone)]
pub struct OtpOutcome {
    /// The email is new: signup must be completed before a session exists
    pub needs_signup: bool,
    /// Session token, present when the user already has an account
    pub token: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct SummaryData {
    #[serde(default)]
    events: Vec<Registration>,
}

#[derive(Debug, serde::Deserialize)]
struct AdminConfig {
    #[serde(default, alias = "adminEmails")]
    admin_emails: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
struct UsersResponse {
    #[serde(default)]
    users: Vec<AdminUser>,
}

#[derive(Debug, serde::Deserialize)]
struct RegistrationsResponse {
    #[serde(default)]
    registrations: Vec<Registration>,
}

#[derive(Debug, serde::Deserialize)]
struct QueryAnswer {
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct FaqFile {
    #[serde(default)]
    faq: Vec<FaqItem>,
}

/// Event fields for the admin create form
#[derive(Debug, serde::Serialize)]
pub struct NewEvent {
    pub name: String,
    pub mode: String,
    pub participants: u32,
    pub description: String,
    pub eligibility: [u32; 2],
    pub open_to_all: bool,
}

/// Shape of the bundled `/data/events.json` fallback: parallel maps keyed
/// by event name.
#[derive(Debug, Default, serde::Deserialize)]
pub struct FallbackCatalog {
    #[serde(default)]
    events: std::collections::HashMap<String, String>,
    #[serde(default)]
    descriptions: std::collections::HashMap<String, FallbackDescription>,
    #[serde(default)]
    participants: std::collections::HashMap<String, u32>,
    #[serde(default)]
    mode: std::collections::HashMap<String, String>,
    #[serde(default)]
    points: std::collections::HashMap<String, i64>,
    #[serde(default)]
    individual: std::collections::HashMap<String, bool>,
    #[serde(default)]
    eligibility: std::collections::HashMap<String, Vec<u32>>,
    #[serde(default)]
    open_to_all: std::collections::HashMap<String, bool>,
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
struct FallbackDescription {
    #[serde(default)]
    short: Option<String>,
    #[serde(default)]
    long: Option<String>,
}

impl FallbackCatalog {
    /// Flatten the parallel maps into the same `Event` shape the API serves.
    pub fn into_events(mut self) -> Vec<Event> {
        let mut names: Vec<String> = self.events.keys().cloned().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| {
                let description = self.descriptions.remove(&name).unwrap_or_default();
                Event {
                    // No server id: `Event::key` falls back to the name slug
                    id: None,
                    image: self.events.remove(&name).filter(|i| !i.is_empty()),
                    subtitle: None,
                    mode: self.mode.remove(&name).unwrap_or_else(|| "Online".to_string()),
                    participants: self.participants.remove(&name).unwrap_or(1),
                    points: self.points.remove(&name).unwrap_or(0),
                    individual: self.individual.remove(&name).unwrap_or(false),
                    eligibility: Some(
                        self.eligibility.remove(&name).unwrap_or_else(|| vec![6, 12]),
                    ),
                    open_to_all: self.open_to_all.remove(&name).unwrap_or(false),
                    description_short: description.short,
                    description_long: description.long,
                    category: None,
                    dates: None,
                    registrations: None,
                    name,
                }
            })
            .collect()
    }
}

// ============ API Functions ============

/// Fetch the event catalog
pub async fn fetch_events() -> Result<Vec<Event>, String> {
    get_json::<Envelope<Vec<Event>>>("/events")
        .await?
        .into_result()
}

/// Fetch a single event by id or slug
pub async fn fetch_event(id: &str) -> Result<Event, String> {
    let encoded: String = js_sys::encode_uri_component(id).into();
    get_json::<Envelope<Event>>(&format!("/events/?id={}", encoded))
        .await?
        .into_result()
}

/// Bundled catalog used when the live event API is unreachable
pub async fn fetch_fallback_events() -> Result<Vec<Event>, String> {
    let catalog: FallbackCatalog = get_static_json("/data/events.json").await?;
    Ok(catalog.into_events())
}

/// Password login; returns the session token
pub async fn login(email: &str, password: &str) -> Result<String, String> {
    #[derive(serde::Serialize)]
    struct LoginRequest<'a> {
        email: &'a str,
        password: &'a str,
    }

    let response: TokenResponse =
        post_json("/users/login", &LoginRequest { email, password }).await?;
    if response.status.as_deref() == Some("success") {
        response.token.ok_or_else(|| "Login failed".to_string())
    } else {
        Err(response.error.unwrap_or_else(|| "Login failed".to_string()))
    }
}

/// Request an OTP email for registration or passwordless login
pub async fn send_otp(email: &str) -> Result<(), String> {
    #[derive(serde::Serialize)]
    struct OtpRequest<'a> {
        email: &'a str,
    }

    post_json::<Ack, _>("/auth/send-otp", &OtpRequest { email })
        .await?
        .into_result()
}

/// Verify a six-digit OTP
pub async fn verify_otp(email: &str, otp: &str) -> Result<OtpOutcome, String> {
    #[derive(serde::Serialize)]
    struct VerifyRequest<'a> {
        email: &'a str,
        otp: &'a str,
    }

    #[derive(serde::Deserialize)]
    struct VerifyResponse {
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        needs_signup: bool,
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        error: Option<String>,
    }

    let response: VerifyResponse =
        post_json("/auth/verify-otp", &VerifyRequest { email, otp }).await?;
    if response.status.as_deref() == Some("success") {
        Ok(OtpOutcome {
            needs_signup: response.needs_signup,
            token: response.token,
        })
    } else {
        Err(response.error.unwrap_or_else(|| "Invalid OTP".to_string()))
    }
}

/// Finish signup for an OTP-verified email
pub async fn complete_signup(username: &str, password: &str) -> Result<(), String> {
    #[derive(serde::Serialize)]
    struct CompleteRequest<'a> {
        username: &'a str,
        password: &'a str,
    }

    post_json::<Ack, _>("/auth/complete", &CompleteRequest { username, password })
        .await?
        .into_result()
}

/// End the server-side session
pub async fn logout() -> Result<(), String> {
    post_empty("/auth/logout").await
}

/// Profile as seen by the auth layer (used for nav gating)
pub async fn fetch_auth_profile() -> Result<UserProfile, String> {
    get_json::<Envelope<UserProfile>>("/auth/profile")
        .await?
        .into_result()
}

/// Full profile for the summary page
pub async fn fetch_user_profile() -> Result<UserProfile, String> {
    get_json::<Envelope<UserProfile>>("/user/profile")
        .await?
        .into_result()
}

/// The signed-in user's registrations
pub async fn fetch_summary() -> Result<Vec<Registration>, String> {
    get_json::<Envelope<SummaryData>>("/summary")
        .await?
        .into_result()
        .map(|data| data.events)
}

/// Submit (or overwrite) the member list for one event registration.
///
/// The endpoint acknowledges with either a bare `true` or the usual
/// status envelope.
pub async fn submit_registration(
    event_key: &str,
    members: Vec<serde_json::Value>,
) -> Result<(), String> {
    #[derive(serde::Serialize)]
    struct SubmitRequest<'a> {
        id: &'a str,
        data: Vec<serde_json::Value>,
    }

    let response: serde_json::Value = post_json(
        "/submit_registrations",
        &SubmitRequest {
            id: event_key,
            data: members,
        },
    )
    .await?;

    let accepted = response == serde_json::Value::Bool(true)
        || response.get("status").and_then(|s| s.as_str()) == Some("success");
    if accepted {
        Ok(())
    } else {
        let msg = response
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("Save failed");
        Err(msg.to_string())
    }
}

/// Aggregate counters for the admin overview
pub async fn fetch_admin_stats() -> Result<AdminStats, String> {
    get_json::<Envelope<AdminStats>>("/admin/stats")
        .await?
        .into_result()
}

/// Server-supplied admin allow-list
pub async fn fetch_admin_config() -> Result<Vec<String>, String> {
    get_json::<Envelope<AdminConfig>>("/admin/config")
        .await?
        .into_result()
        .map(|config| config.admin_emails)
}

/// User listing for the admin users tab
pub async fn fetch_admin_users(search: &str) -> Result<Vec<AdminUser>, String> {
    let endpoint = if search.is_empty() {
        "/admin/users".to_string()
    } else {
        let encoded: String = js_sys::encode_uri_component(search).into();
        format!("/admin/users?search={}", encoded)
    };
    let response: UsersResponse = get_json(&endpoint).await?;
    Ok(response.users)
}

/// Registrations listing, optionally scoped to one event
pub async fn fetch_event_registrations(
    event_id: Option<&str>,
) -> Result<Vec<Registration>, String> {
    let endpoint = match event_id {
        Some(id) => {
            let encoded: String = js_sys::encode_uri_component(id).into();
            format!("/admin/event-registrations?event_id={}", encoded)
        }
        None => "/admin/event-registrations".to_string(),
    };
    let response: RegistrationsResponse = get_json(&endpoint).await?;
    Ok(response.registrations)
}

/// CSV export of all users
pub async fn export_users_csv() -> Result<String, String> {
    get_text("/admin/export?type=users").await
}

/// Create a single event
pub async fn create_event(event: &NewEvent) -> Result<(), String> {
    post_json::<Ack, _>("/admin/events", event)
        .await?
        .into_result()
}

/// Bulk import events from a JSON document
pub async fn import_events(events: &serde_json::Value) -> Result<(), String> {
    post_json::<Ack, _>("/admin/import_events", events)
        .await?
        .into_result()
}

/// Ask the FAQ backend a free-text question
pub async fn send_query(query: &str) -> Result<String, String> {
    #[derive(serde::Serialize)]
    struct QueryRequest<'a> {
        query: &'a str,
    }

    let response: QueryAnswer = post_json("/query", &QueryRequest { query }).await?;
    response
        .answer
        .ok_or_else(|| "No answer returned.".to_string())
}

/// Bundled FAQ entries for the chat widget
pub async fn fetch_faq() -> Result<Vec<FaqItem>, String> {
    let file: FaqFile = get_static_json("/data/faq.json").await?;
    Ok(file.faq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_path_prefixes_and_normalizes() {
        assert_eq!(api_path("/events"), "/api/events");
        assert_eq!(api_path("events"), "/api/events");
        assert_eq!(api_path("/api/events"), "/api/events");
        assert_eq!(api_path("/auth/send-otp"), "/api/auth/send-otp");
    }

    #[test]
    fn error_message_prefers_server_string() {
        assert_eq!(
            error_message(401, "application/json", r#"{"error":"unauthorized"}"#),
            "unauthorized"
        );
        assert_eq!(
            error_message(400, "application/json; charset=utf-8", r#"{"message":"bad input"}"#),
            "bad input"
        );
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(error_message(502, "text/html", "<h1>Bad Gateway</h1>"), "HTTP error! status: 502");
        assert_eq!(error_message(500, "application/json", "not json"), "HTTP error! status: 500");
        assert_eq!(error_message(404, "application/json", r#"{"error":""}"#), "HTTP error! status: 404");
    }

    #[test]
    fn auth_errors_recognized() {
        assert!(is_auth_error("unauthorized"));
        assert!(is_auth_error("HTTP error! status: 401"));
        assert!(is_auth_error("Unauthorized access"));
        assert!(!is_auth_error("HTTP error! status: 500"));
    }

    #[test]
    fn envelope_unwraps_success_and_errors() {
        let ok: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":"success","data":[1,2]}"#).unwrap();
        assert_eq!(ok.into_result().unwrap(), vec![1, 2]);

        let err: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":"error","error":"nope"}"#).unwrap();
        assert_eq!(err.into_result().unwrap_err(), "nope");

        let odd: Envelope<Vec<u32>> = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert_eq!(odd.into_result().unwrap_err(), "Unexpected server response");
    }

    #[test]
    fn fallback_catalog_flattens_to_events() {
        let catalog: FallbackCatalog = serde_json::from_value(serde_json::json!({
            "events": {"Build: Robots": "robots.webp", "Crossword": ""},
            "descriptions": {"Build: Robots": {"short": "Make a bot", "long": "Longer text"}},
            "participants": {"Build: Robots": 4},
            "mode": {"Build: Robots": "offline"},
            "points": {"Build: Robots": 100},
            "eligibility": {"Build: Robots": [9, 12]},
            "open_to_all": {"Crossword": true}
        }))
        .unwrap();

        let events = catalog.into_events();
        assert_eq!(events.len(), 2);
        let robots = events.iter().find(|e| e.name == "Build: Robots").unwrap();
        assert_eq!(robots.participants, 4);
        assert_eq!(robots.mode, "offline");
        assert_eq!(robots.points, 100);
        assert_eq!(robots.eligibility.as_deref(), Some(&[9, 12][..]));
        assert_eq!(robots.description_short.as_deref(), Some("Make a bot"));
        assert_eq!(robots.image.as_deref(), Some("robots.webp"));

        let crossword = events.iter().find(|e| e.name == "Crossword").unwrap();
        assert!(crossword.open_to_all);
        assert_eq!(crossword.image, None);
        assert_eq!(crossword.participants, 1);
    }
}
