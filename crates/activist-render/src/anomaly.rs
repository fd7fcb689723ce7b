//! Non-fatal rendering anomalies

use activist_core::TenantTheme;
use std::fmt;

/// Something that rendered degraded instead of failing the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderAnomaly {
    /// Block with a `type` outside the known set; skipped.
    UnknownBlockType { index: usize, type_tag: String },
    /// Known `type` whose props did not decode; skipped.
    InvalidBlockProps {
        index: usize,
        type_tag: String,
        reason: String,
    },
    /// Link with a scheme other than http(s), mailto or tel; replaced by `#`.
    UnsafeLink { key: String, href: String },
    /// Template failed to produce output; block skipped.
    TemplateFailed { key: String, reason: String },
    /// Palette value that is not a hex color; passed through as is.
    MalformedThemeColor { field: &'static str, value: String },
}

impl RenderAnomaly {
    /// Metric label for this anomaly.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderAnomaly::UnknownBlockType { .. } => "unknown_type",
            RenderAnomaly::InvalidBlockProps { .. } => "invalid_props",
            RenderAnomaly::UnsafeLink { .. } => "unsafe_link",
            RenderAnomaly::TemplateFailed { .. } => "template",
            RenderAnomaly::MalformedThemeColor { .. } => "malformed_color",
        }
    }
}

impl fmt::Display for RenderAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderAnomaly::UnknownBlockType { index, type_tag } => {
                write!(f, "block {} has unknown type '{}'", index, type_tag)
            }
            RenderAnomaly::InvalidBlockProps {
                index,
                type_tag,
                reason,
            } => write!(f, "block {} ({}) has invalid props: {}", index, type_tag, reason),
            RenderAnomaly::UnsafeLink { key, href } => {
                write!(f, "block {} links to disallowed target '{}'", key, href)
            }
            RenderAnomaly::TemplateFailed { key, reason } => {
                write!(f, "block {} failed to render: {}", key, reason)
            }
            RenderAnomaly::MalformedThemeColor { field, value } => {
                write!(f, "theme {} is not a hex color: '{}'", field, value)
            }
        }
    }
}

/// Palette diagnostics. The style context still uses the values unchanged.
pub fn theme_anomalies(theme: &TenantTheme) -> Vec<RenderAnomaly> {
    theme
        .malformed_fields()
        .into_iter()
        .map(|field| {
            let value = match field {
                "primary" => &theme.primary,
                "secondary" => &theme.secondary,
                _ => &theme.accent,
            };
            RenderAnomaly::MalformedThemeColor {
                field,
                value: value.clone(),
            }
        })
        .collect()
}
