use sea_orm::DatabaseConnection;
use std::sync::Arc;
use util::config::{AppConfig, MediaProvider};

use crate::services::email::{LogMailer, Mailer, SmtpMailer};
use crate::services::media::{CloudinaryStore, LocalMediaStore, MediaStore};
use crate::services::payment::{OfflineGateway, PaymentGateway, RazorpayGateway};

/// Shared handles passed to every handler and guard.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    mailer: Arc<dyn Mailer>,
    media: Arc<dyn MediaStore>,
    payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        mailer: Arc<dyn Mailer>,
        media: Arc<dyn MediaStore>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            db,
            mailer,
            media,
            payments,
        }
    }

    /// Picks the mail, media and payment backends the configuration enables.
    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Self {
        let mailer: Arc<dyn Mailer> = if config.smtp_enabled() {
            match SmtpMailer::from_config(config) {
                Ok(smtp) => Arc::new(smtp),
                Err(e) => {
                    tracing::error!(error = %e, "Invalid SMTP configuration, logging emails instead");
                    Arc::new(LogMailer::new())
                }
            }
        } else {
            tracing::warn!("SMTP credentials not set, emails will only be logged");
            Arc::new(LogMailer::new())
        };

        let media: Arc<dyn MediaStore> = match config.media_provider {
            MediaProvider::Local => Arc::new(LocalMediaStore::from_config(config)),
            MediaProvider::Cloudinary => Arc::new(CloudinaryStore::from_config(config)),
        };

        let payments: Arc<dyn PaymentGateway> = if config.payments_enabled() {
            Arc::new(RazorpayGateway::from_config(config))
        } else if config.is_production() {
            tracing::error!("Payment keys not set in production, checkout is disabled");
            Arc::new(OfflineGateway::new(""))
        } else {
            if config.payment_key_secret.is_empty() {
                tracing::warn!("PAYMENT_KEY_SECRET not set, checkout is disabled");
            } else {
                tracing::warn!("Payment keys not set, using the offline gateway");
            }
            Arc::new(OfflineGateway::new(config.payment_key_secret.clone()))
        };

        Self::new(db, mailer, media, payments)
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    pub fn media(&self) -> &dyn MediaStore {
        self.media.as_ref()
    }

    pub fn payments(&self) -> &dyn PaymentGateway {
        self.payments.as_ref()
    }
}
