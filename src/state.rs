use crate::db::DbPool;
use crate::deliverable::deliverable_repository::DeliverableRepository;
use crate::email::email_service::EmailService;
use crate::notification::notification_repository::NotificationRepository;
use crate::notification::notifier::Notifier;
use crate::phase::phase_repository::PhaseRepository;
use crate::profile::profile_repository::ProfileRepository;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub profile_repository: ProfileRepository,
    pub deliverable_repository: DeliverableRepository,
    pub notification_repository: NotificationRepository,
    pub phase_repository: PhaseRepository,
    pub notifier: Notifier,
    pub email_service: EmailService,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub resend_api_key: String,
    pub email_from: String,
    pub ops_email: String,
    pub app_url: String,
    pub team_directory: HashMap<String, String>,
    /// When a mutation fires both the completion and the status-change rule,
    /// drop the status-change notification. Defaults to off, which keeps the
    /// historical double-signal behaviour.
    pub suppress_status_change_on_completion: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            resend_api_key: std::env::var("RESEND_API_KEY")
                .expect("RESEND_API_KEY must be set"),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Project CR <onboarding@resend.dev>".to_string()),
            ops_email: std::env::var("OPS_EMAIL").expect("OPS_EMAIL must be set"),
            app_url: std::env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            team_directory: parse_team_directory(
                &std::env::var("TEAM_EMAIL_DIRECTORY").unwrap_or_default(),
            ),
            suppress_status_change_on_completion: std::env::var(
                "SUPPRESS_STATUS_CHANGE_ON_COMPLETION",
            )
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false),
        }
    }
}

/// Parses the static name-to-address directory from its env form:
/// `Full Name=addr@example.com,Other Name=other@example.com`.
pub fn parse_team_directory(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (name, email) = pair.split_once('=')?;
            let name = name.trim();
            let email = email.trim();
            if name.is_empty() || email.is_empty() {
                return None;
            }
            Some((name.to_string(), email.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_team_directory() {
        let dir = parse_team_directory(
            "Chawana Masaka=chawana.maseka@gmail.com, Delphine Mwape=delphinemwape2@gmail.com",
        );
        assert_eq!(dir.len(), 2);
        assert_eq!(
            dir.get("Chawana Masaka").map(String::as_str),
            Some("chawana.maseka@gmail.com")
        );
        assert_eq!(
            dir.get("Delphine Mwape").map(String::as_str),
            Some("delphinemwape2@gmail.com")
        );
    }

    #[test]
    fn test_parse_team_directory_skips_malformed_entries() {
        let dir = parse_team_directory("no-separator,=missing-name,Valid Name=ok@example.com,");
        assert_eq!(dir.len(), 1);
        assert!(dir.contains_key("Valid Name"));
    }

    #[test]
    fn test_parse_team_directory_empty() {
        assert!(parse_team_directory("").is_empty());
    }
}
