//! Fixed icon table for mission cards

/// Icons a card may name. Anything else renders as [`Icon::Circle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Calendar,
    Heart,
    Globe,
    Users,
    Shield,
    Leaf,
    Sun,
    Circle,
}

impl Icon {
    /// Look up an icon by name, falling back to the circle glyph.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some("calendar") => Icon::Calendar,
            Some("heart") => Icon::Heart,
            Some("globe") => Icon::Globe,
            Some("users") => Icon::Users,
            Some("shield") => Icon::Shield,
            Some("leaf") => Icon::Leaf,
            Some("sun") => Icon::Sun,
            _ => Icon::Circle,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Icon::Calendar => "calendar",
            Icon::Heart => "heart",
            Icon::Globe => "globe",
            Icon::Users => "users",
            Icon::Shield => "shield",
            Icon::Leaf => "leaf",
            Icon::Sun => "sun",
            Icon::Circle => "circle",
        }
    }

    /// Inner SVG markup for a 24x24 stroked icon.
    pub fn svg(&self) -> &'static str {
        match self {
            Icon::Calendar => {
                r#"<rect x="3" y="4" width="18" height="18" rx="2"/><line x1="16" y1="2" x2="16" y2="6"/><line x1="8" y1="2" x2="8" y2="6"/><line x1="3" y1="10" x2="21" y2="10"/>"#
            }
            Icon::Heart => {
                r#"<path d="M20.84 4.61a5.5 5.5 0 0 0-7.78 0L12 5.67l-1.06-1.06a5.5 5.5 0 0 0-7.78 7.78l1.06 1.06L12 21.23l7.78-7.78 1.06-1.06a5.5 5.5 0 0 0 0-7.78z"/>"#
            }
            Icon::Globe => {
                r#"<circle cx="12" cy="12" r="10"/><line x1="2" y1="12" x2="22" y2="12"/><path d="M12 2a15.3 15.3 0 0 1 4 10 15.3 15.3 0 0 1-4 10 15.3 15.3 0 0 1-4-10 15.3 15.3 0 0 1 4-10z"/>"#
            }
            Icon::Users => {
                r#"<path d="M17 21v-2a4 4 0 0 0-4-4H5a4 4 0 0 0-4 4v2"/><circle cx="9" cy="7" r="4"/><path d="M23 21v-2a4 4 0 0 0-3-3.87"/><path d="M16 3.13a4 4 0 0 1 0 7.75"/>"#
            }
            Icon::Shield => r#"<path d="M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z"/>"#,
            Icon::Leaf => {
                r#"<path d="M11 20A7 7 0 0 1 9.8 6.1C15.5 5 17 4.48 19 2c1 2 2 4.18 2 8 0 5.5-4.78 10-10 10Z"/><path d="M2 21c0-3 1.85-5.36 5.08-6C9.5 14.52 12 13 13 12"/>"#
            }
            Icon::Sun => {
                r#"<circle cx="12" cy="12" r="4"/><path d="M12 2v2"/><path d="M12 20v2"/><path d="m4.93 4.93 1.41 1.41"/><path d="m17.66 17.66 1.41 1.41"/><path d="M2 12h2"/><path d="M20 12h2"/><path d="m6.34 17.66-1.41 1.41"/><path d="m19.07 4.93-1.41 1.41"/>"#
            }
            Icon::Circle => r#"<circle cx="12" cy="12" r="10"/>"#,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        for name in ["calendar", "heart", "globe", "users", "shield", "leaf", "sun"] {
            assert_eq!(Icon::from_name(Some(name)).name(), name);
        }
    }

    #[test]
    fn test_unknown_and_missing_fall_back_to_circle() {
        assert_eq!(Icon::from_name(Some("rocket")), Icon::Circle);
        assert_eq!(Icon::from_name(Some("Calendar")), Icon::Circle);
        assert_eq!(Icon::from_name(Some("")), Icon::Circle);
        assert_eq!(Icon::from_name(None), Icon::Circle);
    }
}
