//! Share link subsystem.
//!
//! # Data Flow
//! ```text
//! Route → codec.rs encode → "<base>?start=<lat>,<lon>&end=<lat>,<lon>"
//! inbound URL → codec.rs decode → (start raw, end raw) → widget load path
//! ```

pub mod codec;

pub use codec::{decode, DecodedLink, ShareError, ShareLinkCodec};
