//! # cardflip
//!
//! Flip-able credit card input core for Rust.
//!
//! The hard part of a card-input widget is not drawing it: it is keeping
//! raw keystrokes, masked display text, provider recognition and a
//! two-faced card visual consistent across two independently-editable
//! surfaces (the card itself and a plain form). cardflip is that core,
//! with rendering, animation playback and keyboard presentation left to
//! the host.
//!
//! ## Architecture
//!
//! One widget, one source of truth:
//! ```text
//! raw edit → FieldSpec mask (+ date rules) → CreditCardModel → fan-out
//!                                  FocusFlow → flip / indicator events
//! ```
//! Both surfaces subscribe to the same model and focus flow; neither
//! owns field state. Everything is synchronous and single-threaded -
//! animations are fire-and-forget, reported back via `flip_finished`.
//!
//! ## Modules
//!
//! - [`types`] - Core types (FieldType, CardFace, DisplaySlot, SlotFlags)
//! - [`provider`] - Prefix-pattern card-network recognition
//! - [`format`] - Masked field formatting and date validation
//! - [`state`] - Focus flow FSM and the canonical data model
//! - [`widget`] - The coordinator a host embeds
//! - [`input`] - crossterm key-event adapter for terminal hosts

pub mod format;
pub mod input;
pub mod provider;
pub mod state;
pub mod types;
pub mod widget;

// Re-export commonly used items
pub use types::*;

pub use format::{date, FieldSpec};

pub use provider::{ProviderId, ProviderRegistry, ProviderRule};

pub use state::{
    // Focus
    FocusFlow, FocusHooks,
    // Model
    ChangeCallback, CreditCardData, CreditCardModel, FieldLimits, ModelChange,
};

pub use widget::{CardWidget, WidgetProps};

pub use input::{convert_key_event, route_event, route_key, WidgetKey};
