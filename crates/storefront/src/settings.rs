//! Cached store configuration.
//!
//! The backend holds a single settings record (currency, contact links,
//! payment instructions). It is read-only from the client, fetched once and
//! reused by every price-displaying view and the checkout hand-off.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use clementine_core::{StoreSettings, format_amount};
use moka::sync::Cache;
use rust_decimal::Decimal;
use tracing::{instrument, warn};

use crate::data::{DataService, DataServiceError};

/// How long a fetched settings record stays fresh.
pub const SETTINGS_FRESHNESS: Duration = Duration::from_secs(300);

/// Caches the store settings singleton.
pub struct SettingsCache<S> {
    inner: Arc<SettingsCacheInner<S>>,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for SettingsCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SettingsCacheInner<S> {
    data: Arc<S>,
    cache: Cache<(), StoreSettings>,
    /// Last successfully fetched record, kept past cache expiry so views
    /// degrade to stale settings rather than defaults when the backend is
    /// unreachable.
    last_known: Mutex<Option<StoreSettings>>,
}

impl<S: DataService> SettingsCache<S> {
    /// Create an empty cache over the backend.
    #[must_use]
    pub fn new(data: Arc<S>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(SETTINGS_FRESHNESS)
            .build();
        Self {
            inner: Arc::new(SettingsCacheInner {
                data,
                cache,
                last_known: Mutex::new(None),
            }),
        }
    }

    /// The store settings, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the record has expired and the
    /// re-fetch fails.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<StoreSettings, DataServiceError> {
        if let Some(settings) = self.inner.cache.get(&()) {
            return Ok(settings);
        }
        let settings = self.inner.data.store_settings().await?;
        self.inner.cache.insert((), settings.clone());
        *self
            .inner
            .last_known
            .lock()
            .expect("settings lock poisoned") = Some(settings.clone());
        Ok(settings)
    }

    /// The store settings, degrading to the last known record (or defaults)
    /// when the backend is unreachable.
    pub async fn get_or_default(&self) -> StoreSettings {
        match self.get().await {
            Ok(settings) => settings,
            Err(error) => {
                warn!(%error, "settings fetch failed, using last known");
                self.inner
                    .last_known
                    .lock()
                    .expect("settings lock poisoned")
                    .clone()
                    .unwrap_or_default()
            }
        }
    }

    /// Drop the cached record so the next read re-fetches.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate(&());
    }

    /// Render an amount with the store's configured currency symbol.
    pub async fn display_price(&self, amount: Decimal) -> String {
        let settings = self.get_or_default().await;
        format_amount(amount, &settings.currency_symbol)
    }
}
