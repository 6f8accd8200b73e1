//! meal-wheel: a prize wheel for deciding what to eat.
//!
//! Users put up to twelve recipes on a wheel, picked from a shared popular
//! catalog or typed in as custom recipes, then spin it. The spin picks one
//! item uniformly at random and computes the rotation that lands that item
//! under the pointer at 12 o'clock. The result is revealed once the
//! animation finishes.
//!
//! Surfaces:
//! - a native window rendered with vello (`viewer`);
//! - an axum HTTP API with an SVG endpoint (`server`);
//! - terminal commands in the `meal-wheel` binary.

pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod palette;
pub mod paths;
pub mod render;
pub mod selection;
pub mod server;
pub mod spinner;
pub mod state_machine;
pub mod store;
pub mod viewer;
pub mod wheel;

pub use error::WheelError;
pub use spinner::Spinner;
pub use store::Store;
pub use wheel::{SourceType, Wheel, WheelItem};
