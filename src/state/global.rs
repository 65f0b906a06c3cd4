//! Global Application State
//!
//! Reactive state shared across pages, plus the normalized domain types.
//! The upstream API is inconsistent about field names (`name`/`Name`,
//! `eventId`/`event_id`, numeric or string `class`), so every payload is
//! normalized into one typed shape here via serde aliases instead of
//! fallback chains in render code.

use leptos::*;
use serde::{Deserialize, Deserializer};

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Profile of the signed-in user, once loaded
    pub profile: RwSignal<Option<UserProfile>>,
    /// Set after the initial profile load attempt finished (either way)
    pub profile_loaded: RwSignal<bool>,
    /// Server-supplied admin allow-list, fetched lazily and cached here
    pub admin_emails: RwSignal<Option<Vec<String>>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        profile: create_rw_signal(None),
        profile_loaded: create_rw_signal(false),
        admin_emails: create_rw_signal(None),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }

    /// Clear error message
    pub fn clear_error(&self) {
        self.error.set(None);
    }

    /// Email of the signed-in user, from the profile or the token payload.
    pub fn current_email(&self) -> Option<String> {
        if let Some(profile) = self.profile.get() {
            return Some(profile.email);
        }
        crate::api::session::current_user().map(|claims| claims.email)
    }

    /// Whether the signed-in user is on the admin allow-list.
    ///
    /// Display gating only; the server enforces admin access on every
    /// `/admin` route regardless of what we conclude here.
    pub fn is_admin(&self) -> bool {
        let Some(email) = self.current_email() else {
            return false;
        };
        self.admin_emails
            .get()
            .map(|list| list.iter().any(|a| a.eq_ignore_ascii_case(&email)))
            .unwrap_or(false)
    }

    /// Fetch the admin allow-list if it has not been loaded yet.
    pub async fn ensure_admin_config(&self) {
        if self.admin_emails.get_untracked().is_some() {
            return;
        }
        self.refresh_admin_config().await;
    }

    /// Unconditionally re-fetch the admin allow-list.
    pub async fn refresh_admin_config(&self) {
        match crate::api::client::fetch_admin_config().await {
            Ok(emails) => self.admin_emails.set(Some(emails)),
            Err(e) => {
                // Not an error worth a toast: non-admins routinely 401 here
                web_sys::console::warn_1(&format!("admin config unavailable: {}", e).into());
            }
        }
    }
}

// ============ Domain Types ============

/// Profile of a registered user
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserProfile {
    #[serde(default, alias = "Name", alias = "fullname")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, alias = "School", alias = "institution")]
    pub school: Option<String>,
    #[serde(default, alias = "Phone")]
    pub phone: Option<String>,
    #[serde(default, alias = "Class", deserialize_with = "de_opt_string_or_number")]
    pub class: Option<String>,
    #[serde(default, alias = "City")]
    pub city: Option<String>,
    #[serde(default, alias = "Principal", alias = "principal_contact")]
    pub principal: Option<String>,
    #[serde(default, alias = "Individual")]
    pub individual: bool,
}

/// An event as served by the catalog and detail endpoints
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Event {
    #[serde(default, alias = "ID", deserialize_with = "de_opt_string_or_number")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub mode: String,
    /// Team capacity: maximum member rows per registration
    #[serde(default = "default_capacity", alias = "capacity")]
    pub participants: u32,
    #[serde(default)]
    pub eligibility: Option<Vec<u32>>,
    #[serde(default)]
    pub open_to_all: bool,
    #[serde(default)]
    pub individual: bool,
    #[serde(default)]
    pub description_short: Option<String>,
    #[serde(default)]
    pub description_long: Option<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub dates: Option<String>,
    /// Registration count, present on admin listings
    #[serde(default)]
    pub registrations: Option<u32>,
}

fn default_capacity() -> u32 {
    1
}

impl Event {
    /// Stable identifier: the server id when present, else the name slug.
    pub fn key(&self) -> String {
        self.id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| crate::utils::slugify(&self.name))
    }

    /// Category for filter buttons: the explicit field when present, else
    /// a `"Prefix: Name"` naming convention.
    pub fn category_key(&self) -> Option<String> {
        if let Some(cat) = &self.category {
            if !cat.is_empty() {
                return Some(cat.to_lowercase());
            }
        }
        let prefix = self.name.split(':').next()?;
        if prefix.len() < self.name.len() {
            let key = crate::utils::slugify(prefix);
            if !key.is_empty() {
                return Some(key);
            }
        }
        None
    }
}

/// Registration lifecycle as reported by the server
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum RegistrationStatus {
    #[default]
    #[serde(rename = "pending", alias = "Pending")]
    Pending,
    #[serde(rename = "confirmed", alias = "Confirmed")]
    Confirmed,
    #[serde(rename = "cancelled", alias = "Cancelled", alias = "canceled")]
    Cancelled,
}

impl RegistrationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Pending => "bg-yellow-600",
            Self::Confirmed => "bg-green-600",
            Self::Cancelled => "bg-red-600",
        }
    }
}

/// A user's (or team's) registration for one event
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Registration {
    #[serde(
        default,
        alias = "eventId",
        alias = "eventID",
        deserialize_with = "de_opt_string_or_number"
    )]
    pub event_id: Option<String>,
    #[serde(default, alias = "eventName", alias = "EventName", alias = "event")]
    pub event_name: String,
    #[serde(default)]
    pub status: RegistrationStatus,
    #[serde(default, alias = "teamName")]
    pub team_name: Option<String>,
    #[serde(default, alias = "teamMembers", alias = "participants")]
    pub team_members: Vec<TeamMember>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(
        default,
        alias = "registrationId",
        deserialize_with = "de_opt_string_or_number"
    )]
    pub registration_id: Option<String>,
    #[serde(default, alias = "Capacity")]
    pub capacity: Option<u32>,
    #[serde(default, alias = "eventMode", alias = "mode")]
    pub event_mode: Option<String>,
    /// Owner email, present on admin listings
    #[serde(default, alias = "userEmail")]
    pub user_email: Option<String>,
    #[serde(default, alias = "memberCount")]
    pub member_count: Option<u32>,
}

impl Registration {
    /// Match against an event by id or by name slug.
    pub fn is_for_event(&self, event: &Event) -> bool {
        let key = event.key();
        if let Some(id) = &self.event_id {
            if *id == key {
                return true;
            }
        }
        let slug = crate::utils::slugify(&self.event_name);
        slug == crate::utils::slugify(&event.name) || slug == key
    }
}

/// One member row inside a team registration
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TeamMember {
    #[serde(default, alias = "Name", alias = "fullname")]
    pub name: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "Class", deserialize_with = "de_string_or_number")]
    pub class: String,
    #[serde(default, alias = "Phone")]
    pub phone: String,
}

/// Aggregate counters for the admin overview
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default, alias = "total_events")]
    pub total_events: u64,
    #[serde(default, alias = "total_users")]
    pub total_users: u64,
    #[serde(default, alias = "total_registrations")]
    pub total_registrations: u64,
    #[serde(default, alias = "active_events")]
    pub active_events: u64,
    #[serde(default, alias = "today_registrations")]
    pub today_registrations: u64,
    #[serde(default, alias = "active_sessions")]
    pub active_sessions: u64,
}

/// A user row in the admin users table
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AdminUser {
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default, alias = "registrationCount")]
    pub registration_count: u32,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// One entry of the bundled FAQ
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

// ============ Deserialize Helpers ============

/// Accept a string or a number, normalizing to `String`.
fn de_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_string_or_number(deserializer)?.unwrap_or_default())
}

/// Accept a string, a number, or null, normalizing to `Option<String>`.
fn de_opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_normalizes_duck_typed_fields() {
        let reg: Registration = serde_json::from_value(serde_json::json!({
            "eventID": 42,
            "EventName": "Build: Robots",
            "status": "Confirmed",
            "teamName": "The Builders",
            "participants": [
                {"Name": "Ada", "Email": "ada@school.edu", "Class": 11, "Phone": "123"}
            ],
            "createdAt": "2025-10-01T09:00:00Z",
            "registrationId": 7
        }))
        .unwrap();

        assert_eq!(reg.event_id.as_deref(), Some("42"));
        assert_eq!(reg.event_name, "Build: Robots");
        assert_eq!(reg.status, RegistrationStatus::Confirmed);
        assert_eq!(reg.team_members.len(), 1);
        assert_eq!(reg.team_members[0].name, "Ada");
        assert_eq!(reg.team_members[0].class, "11");
        assert_eq!(reg.registration_id.as_deref(), Some("7"));
    }

    #[test]
    fn profile_accepts_numeric_class() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "fullname": "Ada L.",
            "email": "ada@school.edu",
            "class": 12
        }))
        .unwrap();
        assert_eq!(profile.name.as_deref(), Some("Ada L."));
        assert_eq!(profile.class.as_deref(), Some("12"));
    }

    #[test]
    fn event_key_falls_back_to_slug() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "name": "Build: Robots!"
        }))
        .unwrap();
        assert_eq!(event.key(), "build-robots");
        assert_eq!(event.participants, 1);
    }

    #[test]
    fn event_category_from_prefix_convention() {
        let explicit: Event =
            serde_json::from_value(serde_json::json!({"name": "Sudoku", "category": "Quiz"}))
                .unwrap();
        assert_eq!(explicit.category_key().as_deref(), Some("quiz"));

        let prefixed: Event =
            serde_json::from_value(serde_json::json!({"name": "Build: Robots"})).unwrap();
        assert_eq!(prefixed.category_key().as_deref(), Some("build"));

        let plain: Event =
            serde_json::from_value(serde_json::json!({"name": "Crossword"})).unwrap();
        assert_eq!(plain.category_key(), None);
    }

    #[test]
    fn registration_matches_event_by_slug() {
        let event: Event =
            serde_json::from_value(serde_json::json!({"name": "Build: Robots"})).unwrap();
        let reg: Registration =
            serde_json::from_value(serde_json::json!({"eventName": "Build: Robots"})).unwrap();
        assert!(reg.is_for_event(&event));

        let other: Registration =
            serde_json::from_value(serde_json::json!({"eventName": "Crossword"})).unwrap();
        assert!(!other.is_for_event(&event));
    }
}
