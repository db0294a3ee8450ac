//! Type-ahead suggestion subsystem.
//!
//! # Data Flow
//! ```text
//! keystroke(field, text)
//!     → len < 3: close list, no network
//!     → else: cancel pending timer, arm new one (generation n)
//!     → timer fires after quiet period → geocoder lookup
//!     → response: apply only if field generation is still n
//! ```
//!
//! # Design Decisions
//! - One engine per widget instance, one slot per field
//! - Validity is keyed to the latest issued input, not the latest response

pub mod engine;
pub mod state;

pub use engine::SuggestionEngine;
pub use state::SuggestionList;
