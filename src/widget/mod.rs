//! Widget orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! keystroke → instance.rs set_input → SuggestionEngine
//! submit    → instance.rs search → RouteResolver → RouteOverlayController
//! share     → instance.rs share → ShareLinkCodec::encode
//! open link → ShareLinkCodec::decode → coordinates (or text search) → overlay
//!
//! registry.rs: session id → widget instance (one per browser tab)
//! ```

pub mod instance;
pub mod registry;

pub use instance::{Resolution, Widget, WidgetError};
pub use registry::{SessionError, SessionRegistry, SessionWidget};
