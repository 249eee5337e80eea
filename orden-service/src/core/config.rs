//! Service configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | ENVIRONMENT | development | development / staging / production |
//! | BUSINESS_TIMEZONE | America/Mexico_City | timezone for daily counters and export dates |
//! | HOUSE_SUPPLIER_UNIT_ID | nil | house unit that draft ordenes are assigned to |
//! | SYSTEM_CORE_USER_ID | nil | core user acting for the system principal |
//! | WEBHOOK_TIMEOUT_MS | 500 | outbound webhook POST timeout |
//! | OPS_EMAIL | ops@alima.la | operations inbox for background failures |
//! | STRIPE_API_BASE | https://api.stripe.com/v1 | Stripe REST base URL |
//! | STRIPE_SECRET_KEY | | required outside development |
//! | NOTIFICATION_MAX_ATTEMPTS | 2 | attempts per notification |
//! | OUTBOX_CAPACITY | 1024 | bounded outbox capacity |
//! | LOG_LEVEL | info | tracing level |
//! | LOG_DIR | | optional rolling log directory |

use chrono_tz::Tz;
use std::time::Duration;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Identity the core acts as when no human requester exists
/// (ecommerce checkout, automation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemPrincipal {
    pub core_user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    pub business_timezone: Tz,
    /// House ("Alima") supplier unit for draft ordenes
    pub house_supplier_unit_id: Uuid,
    pub system_core_user_id: Uuid,
    pub webhook_timeout_ms: u64,
    pub ops_email: String,
    pub stripe_api_base: String,
    pub stripe_secret_key: String,
    pub notification_max_attempts: u32,
    pub outbox_capacity: usize,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    pub fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                String::new()
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self, BoxError> {
        dotenv::dotenv().ok();
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let tz_name =
            std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "America/Mexico_City".into());
        let business_timezone: Tz = tz_name
            .parse()
            .map_err(|_| format!("BUSINESS_TIMEZONE is not a valid timezone: {tz_name}"))?;

        Ok(Self {
            business_timezone,
            house_supplier_unit_id: parse_uuid_var("HOUSE_SUPPLIER_UNIT_ID")?,
            system_core_user_id: parse_uuid_var("SYSTEM_CORE_USER_ID")?,
            webhook_timeout_ms: std::env::var("WEBHOOK_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            ops_email: std::env::var("OPS_EMAIL").unwrap_or_else(|_| "ops@alima.la".into()),
            stripe_api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com/v1".into()),
            stripe_secret_key: Self::require_secret("STRIPE_SECRET_KEY", &environment)?,
            notification_max_attempts: std::env::var("NOTIFICATION_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(2),
            outbox_capacity: std::env::var("OUTBOX_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1024),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    pub fn system_principal(&self) -> SystemPrincipal {
        SystemPrincipal {
            core_user_id: self.system_core_user_id,
        }
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_millis(self.webhook_timeout_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    /// Development defaults, no environment lookup
    fn default() -> Self {
        Self {
            environment: "development".into(),
            business_timezone: chrono_tz::America::Mexico_City,
            house_supplier_unit_id: Uuid::nil(),
            system_core_user_id: Uuid::nil(),
            webhook_timeout_ms: 500,
            ops_email: "ops@alima.la".into(),
            stripe_api_base: "https://api.stripe.com/v1".into(),
            stripe_secret_key: String::new(),
            notification_max_attempts: 2,
            outbox_capacity: 1024,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

fn parse_uuid_var(name: &str) -> Result<Uuid, BoxError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|_| format!("{name} is not a valid UUID: {v}").into()),
        _ => Ok(Uuid::nil()),
    }
}
