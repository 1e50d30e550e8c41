//! Unified error type at the crate boundary.
//!
//! Each module defines its own error; embedding applications that want one
//! catch-all for rendering retryable notices can use [`StorefrontError`].
//! Persistence corruption is deliberately absent here: unreadable local
//! blobs degrade to defaults instead of erroring.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::data::DataServiceError;
use crate::likes::LikeError;

/// Any storefront operation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorefrontError {
    /// Catalog page fetch failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Like toggle or hydration failed.
    #[error(transparent)]
    Like(#[from] LikeError),

    /// Checkout validation or submission failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Direct backend call failed.
    #[error(transparent)]
    Data(#[from] DataServiceError),
}

impl StorefrontError {
    /// Whether retrying the same operation can succeed.
    ///
    /// Checkout validation failures need the user to change something
    /// first; everything else is a transient I/O failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::Checkout(
                CheckoutError::EmptyCart
                    | CheckoutError::InsufficientStock { .. }
                    | CheckoutError::Unavailable { .. }
            )
        )
    }
}

/// Result type alias for [`StorefrontError`].
pub type Result<T> = std::result::Result<T, StorefrontError>;
