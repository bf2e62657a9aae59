//! Quick order list: variants staged for a single bulk add.
//!
//! Lines are keyed by variant. Adding a variant that is already staged
//! bumps its quantity. Persisted records use camelCase field names.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Outcome, WidgetContext, WidgetError};
use crate::api::AddLine;
use crate::collection::{AddOutcome, EntryId, Keyed, PersistedCollectionStore};
use crate::validation::{DEFAULT_MAX_QUANTITY, ValidationError};

// =============================================================================
// LINE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickOrderLine {
    #[serde(alias = "product_id")]
    pub product_id: EntryId,
    #[serde(alias = "variant_id")]
    pub variant_id: EntryId,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

impl QuickOrderLine {
    /// One unit of `variant_id`, or of the product itself when no variant is given.
    #[must_use]
    pub fn new(product_id: impl Into<EntryId>, variant_id: Option<EntryId>) -> Self {
        let product_id = product_id.into();
        let variant_id = variant_id
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| product_id.clone());
        Self { product_id, variant_id, quantity: 1 }
    }
}

impl Keyed for QuickOrderLine {
    fn key(&self) -> &EntryId {
        &self.variant_id
    }

    fn merge(&mut self, incoming: Self) {
        self.quantity = self
            .quantity
            .saturating_add(incoming.quantity)
            .min(DEFAULT_MAX_QUANTITY);
    }

    fn normalize(mut self) -> Option<Self> {
        if self.quantity == 0 {
            return None;
        }
        self.quantity = self.quantity.min(DEFAULT_MAX_QUANTITY);
        Some(self)
    }
}

// =============================================================================
// WIDGET
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickOrderAction {
    Add { product_id: EntryId, variant_id: Option<EntryId> },
    Remove(EntryId),
    Clear,
    /// Zero or less removes the line.
    SetQuantity { variant_id: EntryId, quantity: i64 },
    /// Add every line to the cart in one request, then clear the list.
    Submit,
}

#[derive(Debug, Clone)]
pub struct QuickOrderWidget {
    store: PersistedCollectionStore<QuickOrderLine>,
    ctx: WidgetContext,
}

impl QuickOrderWidget {
    #[must_use]
    pub fn new(store: PersistedCollectionStore<QuickOrderLine>, ctx: WidgetContext) -> Self {
        Self { store, ctx }
    }

    #[must_use]
    pub fn store(&self) -> &PersistedCollectionStore<QuickOrderLine> {
        &self.store
    }

    #[must_use]
    pub fn lines(&self) -> Vec<QuickOrderLine> {
        self.store.list()
    }

    /// Sum of line quantities, shown on the quick order badge.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        total_quantity(&self.store.list())
    }

    /// # Errors
    ///
    /// `Submit` fails on an empty list or when the storefront rejects the add.
    pub async fn handle(&self, action: QuickOrderAction) -> Result<Outcome, WidgetError> {
        match action {
            QuickOrderAction::Add { product_id, variant_id } => {
                if self.store.add(QuickOrderLine::new(product_id, variant_id)) == AddOutcome::Ignored {
                    warn!("quick order add without a product id");
                }
            }
            QuickOrderAction::Remove(variant_id) => {
                self.store.remove(variant_id);
            }
            QuickOrderAction::Clear => self.store.clear(),
            QuickOrderAction::SetQuantity { variant_id, quantity } => {
                self.set_quantity(variant_id, quantity);
            }
            QuickOrderAction::Submit => return self.submit().await,
        }
        Ok(Outcome::Done)
    }

    fn set_quantity(&self, variant_id: EntryId, quantity: i64) {
        if quantity <= 0 {
            self.store.remove(variant_id);
            return;
        }
        let quantity = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(DEFAULT_MAX_QUANTITY);
        self.store.update(variant_id, |line| line.quantity = quantity);
    }

    async fn submit(&self) -> Result<Outcome, WidgetError> {
        let lines: Vec<AddLine> = self
            .store
            .list()
            .iter()
            .filter_map(|line| match line.variant_id.as_str().parse::<u64>() {
                Ok(id) => Some(AddLine::new(id, line.quantity)),
                Err(_) => {
                    warn!(variant_id = %line.variant_id, "skipping quick order line with non-numeric variant");
                    None
                }
            })
            .collect();
        if lines.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }

        self.ctx
            .api
            .add_items(&lines)
            .await
            .map_err(|source| WidgetError::Action { message: "Error adding items to cart", source })?;

        let units = lines.iter().fold(0u32, |sum, l| sum.saturating_add(l.quantity));
        self.store.clear();
        self.ctx
            .notifier
            .success(format!("{units} items added to cart!"));
        Ok(Outcome::CartChanged)
    }
}

#[must_use]
pub fn total_quantity(lines: &[QuickOrderLine]) -> u32 {
    lines.iter().fold(0u32, |sum, l| sum.saturating_add(l.quantity))
}

#[cfg(test)]
#[path = "quick_order_test.rs"]
mod tests;
