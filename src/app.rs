use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_auth::prelude::*;
use catalog_blob::prelude::*;
use catalog_interceptors::prelude::*;
use catalog_service::prelude::*;
use catalog_storage::prelude::*;
use tracing::info;

use crate::config::{CatalogConfig, LaptopBackend};
use crate::metrics::{track_image_stats, PrometheusObserver};

/// A fully wired catalog: stores, auth, gate and dispatcher.
#[derive(Clone)]
pub struct CatalogApp {
    pub server: Arc<CatalogServer>,
    pub policy: Arc<AccessPolicy>,
    pub config: Arc<CatalogConfig>,
}

impl CatalogApp {
    /// Builds the catalog with images written under `storage.image_dir`.
    pub async fn build(config: CatalogConfig) -> Result<Self> {
        let stats = BlobStats::new();
        track_image_stats(&stats);
        let images = DiskImageStore::new(config.storage.image_dir.clone()).with_metrics(stats);
        info!(dir = %images.root().display(), "image store ready");
        Self::build_with_images(config, Arc::new(images)).await
    }

    pub async fn build_with_images(
        config: CatalogConfig,
        images: Arc<dyn BlobSink>,
    ) -> Result<Self> {
        let hasher = PasswordHasher::new(config.auth.password_hash);
        let users = Arc::new(InMemoryUserStore::new());
        seed_users(users.as_ref(), &config.auth.users, &hasher)
            .await
            .context("failed to seed users")?;
        info!(count = users.len(), "seeded users");

        let authority = Arc::new(TokenAuthority::new(
            config.auth.secret.as_bytes(),
            config.auth.token_ttl,
        ));
        let policy = Arc::new(config.auth.access_policy());

        let store: Arc<dyn LaptopStore> = match &config.storage.laptops {
            LaptopBackend::Memory => Arc::new(InMemoryLaptopStore::new()),
            LaptopBackend::Persistent { dsn } => Arc::new(PersistentLaptopStore::new(dsn.clone())),
        };

        let observer = Arc::new(PrometheusObserver::new());
        let gate = ServerAuthGate::new(authority.clone(), policy.clone())
            .with_observer(observer.clone());
        let laptops = LaptopServer::new(store, images, Arc::new(InMemoryRatingStore::new()))
            .with_max_image_bytes(config.storage.max_image_bytes);
        let server = CatalogServer::new(gate, AuthServer::new(users, authority), laptops)
            .with_observer(observer);

        Ok(Self {
            server: Arc::new(server),
            policy,
            config: Arc::new(config),
        })
    }

    /// An in-process channel straight to the dispatcher.
    pub fn channel(&self) -> LocalChannel {
        LocalChannel::new(self.server.clone())
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        RefreshPolicy {
            interval: self.config.auth.refresh_interval,
            retry_delay: self.config.auth.retry_delay,
        }
    }
}
