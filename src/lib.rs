//! # storefront
//!
//! Client-side behavior layer for an e-commerce storefront: persisted
//! collections (wishlist, recently viewed, quick order list), a typed client
//! for the storefront JSON cart/product/search endpoints, and the widget
//! controllers that tie the two together.
//!
//! ARCHITECTURE
//! ============
//! - `storage`   : injected key/value backend (memory, JSON file, browser).
//! - `collection`: `PersistedCollectionStore` plus the change event bus.
//! - `api`       : `StorefrontApi` trait and its `reqwest` implementation.
//! - `widgets`   : one controller per widget, driven by typed actions.
//! - `views`     : observer view models (badges, list projections).
//! - `app`       : `Storefront`, which boots every widget and dispatches.
//!
//! Nothing here touches a DOM. Hosts render from the view models and feed
//! user input back as [`widgets::Action`] values.

pub mod api;
pub mod app;
pub mod collection;
pub mod config;
pub mod error;
pub mod money;
pub mod notice;
pub mod storage;
pub mod validation;
pub mod views;
pub mod widgets;

pub use app::Storefront;
pub use collection::{AddOptions, CollectionEntry, EntryId, PersistedCollectionStore, Position};
pub use config::StorefrontConfig;
