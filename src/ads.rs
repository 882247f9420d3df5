//! Advertisement gate consulted before unlocking template actions
//!
//! The ad integration itself is external. This module only models it as an
//! asynchronous yes/no decision and implements the flows that depend on it.

use futures::future::{self, BoxFuture};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::TemplateLinks;
use crate::data::Template;

/// Errors reported by an ad gate
#[derive(Debug, Error)]
pub enum AdError {
    /// The ad could not be loaded or shown
    #[error("Ad failed to load: {0}")]
    LoadFailed(String),
}

/// An external source of interstitial and rewarded ads
pub trait AdGate {
    /// Shows an interstitial ad. Fire-and-forget; failures are ignored by callers.
    fn show_interstitial(&self) -> BoxFuture<'_, ()>;

    /// Shows a rewarded interstitial, resolving to `true` only if the reward was earned
    fn show_rewarded_interstitial(&self) -> BoxFuture<'_, Result<bool, AdError>>;
}

/// Gate used when no ad integration is available; every reward is granted
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoGrantGate;

impl AdGate for AutoGrantGate {
    fn show_interstitial(&self) -> BoxFuture<'_, ()> {
        Box::pin(future::ready(()))
    }

    fn show_rewarded_interstitial(&self) -> BoxFuture<'_, Result<bool, AdError>> {
        Box::pin(future::ready(Ok(true)))
    }
}

/// Returns the editor links for `template` if the rewarded view was completed
///
/// A failed ad counts as not granted; the caller may offer a retry.
pub async fn unlock_links<G: AdGate + ?Sized>(gate: &G, template: &Template) -> Option<TemplateLinks> {
    match gate.show_rewarded_interstitial().await {
        Ok(true) => Some(TemplateLinks::for_template(template)),
        Ok(false) => {
            debug!(web_id = %template.web_id, "Reward not granted");
            None
        }
        Err(e) => {
            warn!(web_id = %template.web_id, error = %e, "Could not show rewarded ad");
            None
        }
    }
}

/// Decides whether a search may proceed
///
/// A declined reward blocks the search. A gate that fails to show an ad does
/// not.
pub async fn gated_search<G: AdGate + ?Sized>(gate: &G) -> bool {
    match gate.show_rewarded_interstitial().await {
        Ok(granted) => granted,
        Err(e) => {
            warn!(error = %e, "Error showing rewarded ad; allowing search");
            true
        }
    }
}
