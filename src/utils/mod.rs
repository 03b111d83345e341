//! # Utility Modules
//!
//! Supporting utilities around the codec core.
//!
//! ## Components
//! - **Packing**: the identity pack/unpack stream hooks reserved for an
//!   external compression stage

pub mod packing;

pub use packing::{pack, unpack};
