//! Core types for the screensaver backgrounds.
//!
//! This crate holds everything below the widgets themselves:
//! - Parameter schema: [`ParamDescriptor`], [`Bounds`], [`ParamValue`]
//! - Persistence: [`ParameterStore`] and its storage key scheme
//! - Palettes: [`ColorSequence`] and [`Color`] validation
//! - Animation bookkeeping: [`FrameLoop`], [`StepTimer`], [`wrap`]
//! - Configuration: [`Defaults`] loaded from YAML

pub mod animation;
mod color;
pub mod config;
mod error;
mod geometry;
mod kind;
mod param;
mod sequence;
pub mod store;

pub use animation::{wrap, FrameLoop, LoopToken, StepTimer};
pub use color::{is_valid_css_color, Color, ColorParseError};
pub use config::Defaults;
pub use error::{ConfigError, StoreError};
pub use geometry::{cover_box, rotated_bounds, Rect, Size};
pub use kind::{UnknownKind, WidgetKind};
pub use param::{Bounds, ChoiceOption, ParamDescriptor, ParamKind, ParamValue};
pub use sequence::{random_hsl, ColorSequence, EmptySequence};
pub use store::{MemoryBackend, ParameterStore, StorageBackend, UnavailableBackend};
