//! Block renderer
//!
//! Dispatches every block of a page to its template in list order. Nothing
//! in here fails the page: unrecognized blocks, bad links and template errors
//! become [`RenderAnomaly`] values, are logged and counted, and rendering goes
//! on with the next block.

use activist_core::{
    BlockCta, BlockDefect, BlockKind, BlockStat, CtaVariant, HeroProps, ImpactProps,
    MissionProps, PageBlock,
};
use activist_observability::Metrics;
use askama::Template;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::anomaly::RenderAnomaly;
use crate::icons::Icon;

/// Text shown for a page without blocks.
pub const EMPTY_PLACEHOLDER: &str = "No content blocks configured for this page.";

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

#[derive(Template)]
#[template(path = "blocks/hero.html")]
struct HeroTemplate<'a> {
    key: &'a str,
    heading: &'a str,
    subheading: &'a str,
    ctas: Vec<CtaView<'a>>,
}

struct CtaView<'a> {
    label: &'a str,
    href: String,
    variant: &'static str,
}

#[derive(Template)]
#[template(path = "blocks/mission.html")]
struct MissionTemplate<'a> {
    key: &'a str,
    title: &'a str,
    description: &'a str,
    grid_class: &'static str,
    cards: Vec<CardView<'a>>,
}

struct CardView<'a> {
    title: &'a str,
    description: &'a str,
    icon_name: &'static str,
    icon_svg: &'static str,
    /// Empty when the card has no action.
    cta_label: &'a str,
    href: String,
}

#[derive(Template)]
#[template(path = "blocks/impact.html")]
struct ImpactTemplate<'a> {
    key: &'a str,
    title: &'a str,
    description: &'a str,
    stats: &'a [BlockStat],
}

#[derive(Template)]
#[template(path = "blocks/empty.html")]
struct EmptyTemplate<'a> {
    message: &'a str,
}

/// One block rendered to HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    /// Block id, or `block-<index>` when the block has none.
    pub key: String,
    pub kind: BlockKind,
    pub html: String,
}

/// Result of rendering a page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedPage {
    /// The block list was empty; `html` is the placeholder.
    Empty { html: String },
    /// Known blocks in list order, plus whatever was skipped or degraded.
    Blocks {
        blocks: Vec<RenderedBlock>,
        anomalies: Vec<RenderAnomaly>,
    },
}

impl RenderedPage {
    pub fn is_empty(&self) -> bool {
        matches!(self, RenderedPage::Empty { .. })
    }

    pub fn blocks(&self) -> &[RenderedBlock] {
        match self {
            RenderedPage::Empty { .. } => &[],
            RenderedPage::Blocks { blocks, .. } => blocks,
        }
    }

    pub fn anomalies(&self) -> &[RenderAnomaly] {
        match self {
            RenderedPage::Empty { .. } => &[],
            RenderedPage::Blocks { anomalies, .. } => anomalies,
        }
    }

    /// Page body as one HTML string.
    pub fn to_html(&self) -> String {
        match self {
            RenderedPage::Empty { html } => html.clone(),
            RenderedPage::Blocks { blocks, .. } => blocks
                .iter()
                .map(|block| block.html.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Renders page blocks through the per-kind templates.
#[derive(Clone, Default)]
pub struct BlockRenderer {
    metrics: Option<Arc<Metrics>>,
}

impl BlockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer that counts anomalies in `activist_render_anomalies_total`.
    pub fn with_metrics(metrics: Arc<Metrics>) -> Self {
        Self {
            metrics: Some(metrics),
        }
    }

    /// Render `blocks` top to bottom.
    ///
    /// An empty list yields the placeholder. Unrecognized blocks are dropped
    /// without affecting the blocks after them.
    pub fn render(&self, blocks: &[PageBlock]) -> RenderedPage {
        if blocks.is_empty() {
            debug!("Rendering empty page placeholder");
            return RenderedPage::Empty {
                html: render_placeholder(),
            };
        }

        let mut rendered = Vec::with_capacity(blocks.len());
        let mut anomalies = Vec::new();

        for (index, block) in blocks.iter().enumerate() {
            let key = match block.id() {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => format!("block-{}", index),
            };

            let (kind, html) = match block {
                PageBlock::Hero(hero) => (
                    BlockKind::Hero,
                    render_hero(&key, &hero.props, &mut anomalies),
                ),
                PageBlock::Mission(mission) => (
                    BlockKind::Mission,
                    render_mission(&key, &mission.props, &mut anomalies),
                ),
                PageBlock::Impact(impact) => (BlockKind::Impact, render_impact(&key, &impact.props)),
                PageBlock::Unrecognized(unrecognized) => {
                    let type_tag = unrecognized.raw.kind.clone();
                    anomalies.push(match &unrecognized.defect {
                        BlockDefect::UnknownType => {
                            RenderAnomaly::UnknownBlockType { index, type_tag }
                        }
                        BlockDefect::InvalidProps(reason) => RenderAnomaly::InvalidBlockProps {
                            index,
                            type_tag,
                            reason: reason.clone(),
                        },
                    });
                    continue;
                }
            };

            match html {
                Ok(html) => rendered.push(RenderedBlock { key, kind, html }),
                Err(e) => anomalies.push(RenderAnomaly::TemplateFailed {
                    key,
                    reason: e.to_string(),
                }),
            }
        }

        self.report(&anomalies);

        RenderedPage::Blocks {
            blocks: rendered,
            anomalies,
        }
    }

    /// Log and count anomalies found outside [`render`](Self::render), e.g.
    /// palette diagnostics.
    pub fn report(&self, anomalies: &[RenderAnomaly]) {
        for anomaly in anomalies {
            warn!("Render anomaly ({}): {}", anomaly.kind(), anomaly);
            if let Some(metrics) = &self.metrics {
                metrics.record_render_anomaly(anomaly.kind());
            }
        }
    }
}

fn render_placeholder() -> String {
    EmptyTemplate {
        message: EMPTY_PLACEHOLDER,
    }
    .render()
    .unwrap_or_else(|e| {
        warn!("Empty placeholder template failed: {}", e);
        format!("<div class=\"empty-state\"><p>{}</p></div>", EMPTY_PLACEHOLDER)
    })
}

fn render_hero(
    key: &str,
    props: &HeroProps,
    anomalies: &mut Vec<RenderAnomaly>,
) -> askama::Result<String> {
    let mut ctas = Vec::with_capacity(2);
    let slots = [
        (&props.primary_cta, CtaVariant::Primary),
        (&props.secondary_cta, CtaVariant::Outline),
    ];
    for (cta, default_variant) in slots {
        if let Some(cta) = cta {
            ctas.push(cta_view(key, cta, default_variant, anomalies));
        }
    }

    HeroTemplate {
        key,
        heading: &props.heading,
        subheading: &props.subheading,
        ctas,
    }
    .render()
}

fn cta_view<'a>(
    key: &str,
    cta: &'a BlockCta,
    default_variant: CtaVariant,
    anomalies: &mut Vec<RenderAnomaly>,
) -> CtaView<'a> {
    CtaView {
        label: &cta.label,
        href: safe_href(key, &cta.href, anomalies),
        variant: cta.variant.unwrap_or(default_variant).as_str(),
    }
}

fn render_mission(
    key: &str,
    props: &MissionProps,
    anomalies: &mut Vec<RenderAnomaly>,
) -> askama::Result<String> {
    let grid_class = match props.column_count() {
        2 => "grid-cols-2",
        _ => "grid-cols-3",
    };

    let cards = props
        .cards
        .iter()
        .map(|card| {
            let icon = Icon::from_name(card.icon.as_deref());
            let cta_label = card.cta_label.as_deref().unwrap_or_default();
            let href = match (&card.href, cta_label.is_empty()) {
                (Some(href), false) => safe_href(key, href, anomalies),
                _ => "#".to_string(),
            };
            CardView {
                title: &card.title,
                description: &card.description,
                icon_name: icon.name(),
                icon_svg: icon.svg(),
                cta_label,
                href,
            }
        })
        .collect();

    MissionTemplate {
        key,
        title: props.title.as_deref().unwrap_or_default(),
        description: props.description.as_deref().unwrap_or_default(),
        grid_class,
        cards,
    }
    .render()
}

fn render_impact(key: &str, props: &ImpactProps) -> askama::Result<String> {
    ImpactTemplate {
        key,
        title: &props.title,
        description: props.description.as_deref().unwrap_or_default(),
        stats: &props.stats,
    }
    .render()
}

/// Keep relative links and the allowed schemes; anything else becomes `#`.
fn safe_href(key: &str, href: &str, anomalies: &mut Vec<RenderAnomaly>) -> String {
    let href = href.trim();
    if href.is_empty() {
        return "#".to_string();
    }

    match scheme(href) {
        Some(scheme) if !ALLOWED_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) => {
            anomalies.push(RenderAnomaly::UnsafeLink {
                key: key.to_string(),
                href: href.to_string(),
            });
            "#".to_string()
        }
        _ => href.to_string(),
    }
}

/// URI scheme of `href`, if it has one.
fn scheme(href: &str) -> Option<&str> {
    let (candidate, _) = href.split_once(':')?;
    // A colon after a path, query or fragment delimiter is not a scheme separator
    if candidate.is_empty() || candidate.contains(['/', '?', '#']) {
        return None;
    }
    Some(candidate)
}
