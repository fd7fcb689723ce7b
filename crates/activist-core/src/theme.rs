//! Tenant palette and the derived style context

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("color pattern is valid")
});

pub const DEFAULT_PRIMARY: &str = "#0f172a";
pub const DEFAULT_SECONDARY: &str = "#f1f5f9";
pub const DEFAULT_ACCENT: &str = "#3b82f6";

/// Three-color tenant palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantTheme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for TenantTheme {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            secondary: DEFAULT_SECONDARY.to_string(),
            accent: DEFAULT_ACCENT.to_string(),
        }
    }
}

impl TenantTheme {
    /// Palette for a freshly created tenant: random primary, fixed secondary and accent.
    pub fn with_random_primary() -> Self {
        let rgb = rand::random::<u32>() & 0x00ff_ffff;
        Self {
            primary: format!("#{:06x}", rgb),
            ..Self::default()
        }
    }

    /// Names of the palette fields that are not `#rgb`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// Used only for diagnostics; [`derive_style`] never rejects a value.
    pub fn malformed_fields(&self) -> Vec<&'static str> {
        [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("accent", &self.accent),
        ]
        .into_iter()
        .filter(|(_, value)| !HEX_COLOR.is_match(value))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Named style variable handed to presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleVar {
    pub name: &'static str,
    pub value: String,
}

/// Render-time styling derived from a tenant palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleContext {
    vars: [StyleVar; 3],
}

impl StyleContext {
    pub fn vars(&self) -> &[StyleVar] {
        &self.vars
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|var| var.name == name)
            .map(|var| var.value.as_str())
    }

    /// CSS custom property declarations, e.g. for a `style` attribute.
    pub fn to_inline_css(&self) -> String {
        self.vars
            .iter()
            .map(|var| format!("--{}: {};", var.name, var.value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Project a palette onto the `color-primary`, `color-secondary` and
/// `color-accent` style variables. Values pass through unchanged.
pub fn derive_style(theme: &TenantTheme) -> StyleContext {
    StyleContext {
        vars: [
            StyleVar {
                name: "color-primary",
                value: theme.primary.clone(),
            },
            StyleVar {
                name: "color-secondary",
                value: theme.secondary.clone(),
            },
            StyleVar {
                name: "color-accent",
                value: theme.accent.clone(),
            },
        ],
    }
}
