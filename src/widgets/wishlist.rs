//! Wishlist: a set-like saved-products list.
//!
//! Entries append at the back and keep their place when re-added. The list
//! is unbounded unless a maximum is configured.

use tracing::warn;

use super::{Outcome, WidgetContext, WidgetError};
use crate::collection::{AddOutcome, CollectionEntry, EntryId, PersistedCollectionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistAction {
    /// Heart button: add when absent, remove when present.
    Toggle(CollectionEntry),
    Add(CollectionEntry),
    Remove(EntryId),
    Clear,
    /// Add the product's first available variant to the cart.
    AddToCart { handle: String },
}

#[derive(Debug, Clone)]
pub struct WishlistWidget {
    store: PersistedCollectionStore<CollectionEntry>,
    ctx: WidgetContext,
}

impl WishlistWidget {
    #[must_use]
    pub fn new(store: PersistedCollectionStore<CollectionEntry>, ctx: WidgetContext) -> Self {
        Self { store, ctx }
    }

    #[must_use]
    pub fn store(&self) -> &PersistedCollectionStore<CollectionEntry> {
        &self.store
    }

    /// # Errors
    ///
    /// Only `AddToCart` can fail, when the product lookup or add fails.
    pub async fn handle(&self, action: WishlistAction) -> Result<Outcome, WidgetError> {
        match action {
            WishlistAction::Toggle(entry) => {
                self.toggle(entry);
                Ok(Outcome::Done)
            }
            WishlistAction::Add(entry) => {
                if self.store.add(entry) == AddOutcome::Inserted {
                    self.ctx.notifier.success("Added to wishlist");
                }
                Ok(Outcome::Done)
            }
            WishlistAction::Remove(id) => {
                if self.store.remove(id) {
                    self.ctx.notifier.info("Removed from wishlist");
                }
                Ok(Outcome::Done)
            }
            WishlistAction::Clear => {
                self.store.clear();
                self.ctx.notifier.info("Wishlist cleared");
                Ok(Outcome::Done)
            }
            WishlistAction::AddToCart { handle } => {
                self.ctx.add_first_variant(&handle).await?;
                self.ctx.notifier.success("Added to cart");
                Ok(Outcome::CartChanged)
            }
        }
    }

    /// Returns whether the entry is in the wishlist afterwards.
    pub fn toggle(&self, entry: CollectionEntry) -> bool {
        if entry.id.is_empty() {
            warn!("wishlist toggle without a product id");
            return false;
        }
        let added = self.store.toggle(entry);
        if added {
            self.ctx.notifier.success("Added to wishlist");
        } else {
            self.ctx.notifier.info("Removed from wishlist");
        }
        added
    }

    #[must_use]
    pub fn contains(&self, id: impl Into<EntryId>) -> bool {
        self.store.has(id)
    }

    #[must_use]
    pub fn items(&self) -> Vec<CollectionEntry> {
        self.store.list()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
#[path = "wishlist_test.rs"]
mod tests;
