//! Activist Block Rendering
//!
//! Turns a tenant's ordered block list into HTML fragments:
//! - `BlockRenderer`: closed dispatch over the known block kinds
//! - `RenderedPage`: the empty-state placeholder or the rendered blocks
//! - `RenderAnomaly`: non-fatal problems met while rendering
//! - `Icon`: the fixed icon table used by mission cards

pub mod anomaly;
pub mod icons;
pub mod renderer;

pub use anomaly::{RenderAnomaly, theme_anomalies};
pub use icons::Icon;
pub use renderer::{BlockRenderer, EMPTY_PLACEHOLDER, RenderedBlock, RenderedPage};
