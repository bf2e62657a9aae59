//! Recently viewed products: a bounded, newest-first list.
//!
//! Viewing a product moves it to the front. Entries past the bound fall off
//! the back. Entries tracked without an image get one from the product JSON
//! when the storefront has it.

use tracing::{debug, warn};

use super::{Outcome, WidgetContext, WidgetError};
use crate::api::handle_from_url;
use crate::collection::{CollectionEntry, PersistedCollectionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecentlyViewedAction {
    /// A product page was viewed.
    Track(CollectionEntry),
    /// The recently viewed modal was opened.
    Open,
    RemoveAt(usize),
    Clear,
    /// Fill in missing images from product JSON.
    EnrichImages,
    AddToCart { handle: String },
}

#[derive(Debug, Clone)]
pub struct RecentlyViewedWidget {
    store: PersistedCollectionStore<CollectionEntry>,
    ctx: WidgetContext,
}

impl RecentlyViewedWidget {
    #[must_use]
    pub fn new(store: PersistedCollectionStore<CollectionEntry>, ctx: WidgetContext) -> Self {
        Self { store, ctx }
    }

    #[must_use]
    pub fn store(&self) -> &PersistedCollectionStore<CollectionEntry> {
        &self.store
    }

    #[must_use]
    pub fn items(&self) -> Vec<CollectionEntry> {
        self.store.list()
    }

    /// # Errors
    ///
    /// Only `AddToCart` can fail, when the product lookup or add fails.
    pub async fn handle(&self, action: RecentlyViewedAction) -> Result<Outcome, WidgetError> {
        match action {
            RecentlyViewedAction::Track(entry) => {
                self.track(entry).await;
            }
            RecentlyViewedAction::Open => {
                if self.store.is_empty() {
                    self.ctx.notifier.info("No recently viewed products");
                }
            }
            RecentlyViewedAction::RemoveAt(index) => {
                if self.store.remove_at(index).is_some() && self.store.is_empty() {
                    self.ctx.notifier.info("Recently viewed is now empty");
                }
            }
            RecentlyViewedAction::Clear => {
                self.store.clear();
                self.ctx.notifier.info("Recently viewed cleared");
            }
            RecentlyViewedAction::EnrichImages => {
                self.enrich_images().await;
            }
            RecentlyViewedAction::AddToCart { handle } => {
                self.ctx.add_first_variant(&handle).await?;
                self.ctx.notifier.success("Added to cart");
                return Ok(Outcome::CartChanged);
            }
        }
        Ok(Outcome::Done)
    }

    /// Record a view. An entry without an image is enriched right away.
    pub async fn track(&self, entry: CollectionEntry) {
        let needs_image = entry.image.is_none();
        let id = entry.id.clone();
        if self.store.add(entry) == crate::collection::AddOutcome::Ignored {
            return;
        }
        if needs_image {
            if let Some(entry) = self.store.get(&id) {
                self.enrich(&entry).await;
            }
        }
    }

    /// Fetch images for every entry that lacks one. Returns how many were
    /// filled in. Lookup failures are logged and skipped.
    pub async fn enrich_images(&self) -> usize {
        let missing: Vec<CollectionEntry> = self
            .store
            .list()
            .into_iter()
            .filter(|e| e.image.is_none())
            .collect();

        let mut enriched = 0;
        for entry in &missing {
            if self.enrich(entry).await {
                enriched += 1;
            }
        }
        debug!(candidates = missing.len(), enriched, "recently viewed image enrichment done");
        enriched
    }

    async fn enrich(&self, entry: &CollectionEntry) -> bool {
        let Some(handle) = entry.url.as_deref().and_then(handle_from_url) else {
            return false;
        };
        let image = match self.ctx.api.product(&handle).await {
            Ok(product) => product.primary_image(),
            Err(e) => {
                warn!(id = %entry.id, handle, error = %e, "product lookup for image failed");
                return false;
            }
        };
        let Some(image) = image else {
            return false;
        };
        self.store.update(&entry.id, |stored| {
            if stored.image.is_none() {
                stored.image = Some(image);
            }
        })
    }
}

#[cfg(test)]
#[path = "recently_viewed_test.rs"]
mod tests;
