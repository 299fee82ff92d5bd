//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and replacement for tests and command line tools.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

/// Which backend stores uploaded thumbnails, avatars and lecture videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaProvider {
    /// Files are written under `storage_root` and served from `/media`.
    Local,
    /// Files are pushed to Cloudinary's upload API.
    Cloudinary,
}

impl FromStr for MediaProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "cloudinary" => Ok(Self::Cloudinary),
            other => Err(format!("unknown media provider '{other}'")),
        }
    }
}

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub storage_root: String,
    pub public_media_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub otp_expiry_minutes: u64,
    pub reset_token_expiry_minutes: u64,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from_name: String,
    pub support_email: String,
    pub frontend_url: String,
    pub media_provider: MediaProvider,
    pub media_folder: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub payment_key_id: String,
    pub payment_key_secret: String,
    pub payment_currency: String,
    pub max_upload_mb: usize,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl Default for AppConfig {
    /// Development defaults. Every value can be overridden through the environment.
    fn default() -> Self {
        Self {
            env: "development".into(),
            project_name: "notewrite".into(),
            log_level: "api=info".into(),
            log_file: "api.log".into(),
            log_to_stdout: true,
            database_path: "data/notewrite.db".into(),
            storage_root: "data/media".into(),
            public_media_url: "http://127.0.0.1:4000/media".into(),
            host: "127.0.0.1".into(),
            port: 4000,
            jwt_secret: "development-only-secret".into(),
            jwt_duration_minutes: 60 * 24,
            otp_expiry_minutes: 5,
            reset_token_expiry_minutes: 15,
            smtp_host: "smtp.gmail.com".into(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            email_from_name: "Notewrite".into(),
            support_email: "support@notewrite.local".into(),
            frontend_url: "http://localhost:3000".into(),
            media_provider: MediaProvider::Local,
            media_folder: "notewrite".into(),
            cloudinary_cloud_name: String::new(),
            cloudinary_api_key: String::new(),
            cloudinary_api_secret: String::new(),
            payment_key_id: String::new(),
            payment_key_secret: String::new(),
            payment_currency: "INR".into(),
            max_upload_mb: 200,
        }
    }
}

fn var_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn parsed_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, "Ignoring unparsable configuration value");
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables,
    /// falling back to the development defaults.
    ///
    /// # Panics
    /// Panics when `APP_ENV=production` and `JWT_SECRET` is not provided.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let d = Self::default();

        let env = var_or("APP_ENV", d.env);
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if env.eq_ignore_ascii_case("production") => {
                panic!("JWT_SECRET is required in production")
            }
            _ => d.jwt_secret,
        };

        Self {
            env,
            project_name: var_or("PROJECT_NAME", d.project_name),
            log_level: var_or("LOG_LEVEL", d.log_level),
            log_file: var_or("LOG_FILE", d.log_file),
            log_to_stdout: parsed_or("LOG_TO_STDOUT", d.log_to_stdout),
            database_path: var_or("DATABASE_PATH", d.database_path),
            storage_root: var_or("STORAGE_ROOT", d.storage_root),
            public_media_url: var_or("PUBLIC_MEDIA_URL", d.public_media_url),
            host: var_or("HOST", d.host),
            port: parsed_or("PORT", d.port),
            jwt_secret,
            jwt_duration_minutes: parsed_or("JWT_DURATION_MINUTES", d.jwt_duration_minutes),
            otp_expiry_minutes: parsed_or("OTP_EXPIRY_MINUTES", d.otp_expiry_minutes),
            reset_token_expiry_minutes: parsed_or(
                "RESET_TOKEN_EXPIRY_MINUTES",
                d.reset_token_expiry_minutes,
            ),
            smtp_host: var_or("SMTP_HOST", d.smtp_host),
            smtp_username: var_or("SMTP_USERNAME", d.smtp_username),
            smtp_password: var_or("SMTP_PASSWORD", d.smtp_password),
            email_from_name: var_or("EMAIL_FROM_NAME", d.email_from_name),
            support_email: var_or("SUPPORT_EMAIL", d.support_email),
            frontend_url: var_or("FRONTEND_URL", d.frontend_url),
            media_provider: parsed_or("MEDIA_PROVIDER", d.media_provider),
            media_folder: var_or("MEDIA_FOLDER", d.media_folder),
            cloudinary_cloud_name: var_or("CLOUDINARY_CLOUD_NAME", d.cloudinary_cloud_name),
            cloudinary_api_key: var_or("CLOUDINARY_API_KEY", d.cloudinary_api_key),
            cloudinary_api_secret: var_or("CLOUDINARY_API_SECRET", d.cloudinary_api_secret),
            payment_key_id: var_or("PAYMENT_KEY_ID", d.payment_key_id),
            payment_key_secret: var_or("PAYMENT_KEY_SECRET", d.payment_key_secret),
            payment_currency: var_or("PAYMENT_CURRENCY", d.payment_currency),
            max_upload_mb: parsed_or("MAX_UPLOAD_MB", d.max_upload_mb),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Replaces the global configuration.
    ///
    /// Used by tests and tools that need values other than the environment's.
    pub fn init(config: AppConfig) {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(config.clone()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        *guard = config;
    }

    /// Resets the configuration by reloading from environment variables.
    pub fn reset() {
        AppConfig::init(AppConfig::from_env());
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    /// SMTP delivery is only attempted when credentials are present.
    pub fn smtp_enabled(&self) -> bool {
        !self.smtp_username.is_empty() && !self.smtp_password.is_empty()
    }

    /// The hosted gateway is only called when both keys are present.
    pub fn payments_enabled(&self) -> bool {
        !self.payment_key_id.is_empty() && !self.payment_key_secret.is_empty()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
