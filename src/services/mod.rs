//! Business logic
//!
//! Services validate raw payloads at the boundary, apply the domain rules and
//! delegate persistence to the repository traits.

pub mod catalog;
pub mod newsletter;
pub mod quote;
pub mod translation;

pub use catalog::CatalogService;
pub use newsletter::NewsletterService;
pub use quote::{QuoteAdminService, QuoteService};
pub use translation::TranslationService;
