//! Page block schema
//!
//! Blocks are the unit of tenant page content. On the wire every block is
//! `{ "type": "...", "id": "...", "props": { ... } }`. Decoding never fails on
//! an unknown `type` or malformed `props`: those entries become
//! [`PageBlock::Unrecognized`], keep their raw JSON so they are written back
//! untouched, and are skipped by the renderer.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Call-to-action button style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaVariant {
    Primary,
    Secondary,
    Outline,
    Ghost,
}

impl CtaVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            CtaVariant::Primary => "primary",
            CtaVariant::Secondary => "secondary",
            CtaVariant::Outline => "outline",
            CtaVariant::Ghost => "ghost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockCta {
    pub label: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<CtaVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockCard {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroProps {
    pub heading: String,
    pub subheading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_cta: Option<BlockCta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_cta: Option<BlockCta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cards: Vec<BlockCard>,
    /// Kept as raw JSON: editors send `2`, `2.0` or strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Value>,
}

impl MissionProps {
    /// Grid width: two columns when `columns` is numerically 2, otherwise three.
    pub fn column_count(&self) -> u8 {
        match self.columns.as_ref().and_then(Value::as_f64) {
            Some(n) if n == 2.0 => 2,
            _ => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactProps {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stats: Vec<BlockStat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroBlock {
    pub id: Option<String>,
    pub props: HeroProps,
}

impl HeroBlock {
    /// Hero synthesized for tenants that have no landing page content.
    pub fn default_for(name: &str, description: &str) -> Self {
        let heading = if description.trim().is_empty() {
            name.to_string()
        } else {
            description.to_string()
        };
        Self {
            id: None,
            props: HeroProps {
                heading,
                subheading: format!(
                    "Join {} today and help us create lasting change in our community.",
                    name
                ),
                primary_cta: Some(BlockCta {
                    label: "Join the Movement".to_string(),
                    href: "/events".to_string(),
                    variant: None,
                }),
                secondary_cta: Some(BlockCta {
                    label: "Donate".to_string(),
                    href: "/donate".to_string(),
                    variant: None,
                }),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionBlock {
    pub id: Option<String>,
    pub props: MissionProps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactBlock {
    pub id: Option<String>,
    pub props: ImpactProps,
}

/// Block exactly as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub props: Value,
    /// Fields outside the contract (`enabled`, `variant`, ...) from older editors.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Why a block could not be decoded into a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockDefect {
    UnknownType,
    InvalidProps(String),
}

impl fmt::Display for BlockDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockDefect::UnknownType => f.write_str("unknown block type"),
            BlockDefect::InvalidProps(msg) => write!(f, "invalid props: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnrecognizedBlock {
    pub raw: RawBlock,
    pub defect: BlockDefect,
}

/// Discriminator of the known block variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Hero,
    Mission,
    Impact,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Hero => "hero",
            BlockKind::Mission => "mission",
            BlockKind::Impact => "impact",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hero" => Some(BlockKind::Hero),
            "mission" => Some(BlockKind::Mission),
            "impact" => Some(BlockKind::Impact),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of page content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub enum PageBlock {
    Hero(HeroBlock),
    Mission(MissionBlock),
    Impact(ImpactBlock),
    Unrecognized(UnrecognizedBlock),
}

impl PageBlock {
    /// Known variant of this block, `None` for unrecognized entries.
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            PageBlock::Hero(_) => Some(BlockKind::Hero),
            PageBlock::Mission(_) => Some(BlockKind::Mission),
            PageBlock::Impact(_) => Some(BlockKind::Impact),
            PageBlock::Unrecognized(_) => None,
        }
    }

    /// The `type` tag as written on the wire.
    pub fn type_tag(&self) -> &str {
        match self {
            PageBlock::Unrecognized(block) => &block.raw.kind,
            known => known.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            PageBlock::Hero(b) => b.id.as_deref(),
            PageBlock::Mission(b) => b.id.as_deref(),
            PageBlock::Impact(b) => b.id.as_deref(),
            PageBlock::Unrecognized(b) => b.raw.id.as_deref(),
        }
    }

    pub fn set_id(&mut self, id: String) {
        match self {
            PageBlock::Hero(b) => b.id = Some(id),
            PageBlock::Mission(b) => b.id = Some(id),
            PageBlock::Impact(b) => b.id = Some(id),
            PageBlock::Unrecognized(b) => b.raw.id = Some(id),
        }
    }
}

impl From<RawBlock> for PageBlock {
    fn from(raw: RawBlock) -> Self {
        let Some(kind) = BlockKind::from_tag(&raw.kind) else {
            return PageBlock::Unrecognized(UnrecognizedBlock {
                raw,
                defect: BlockDefect::UnknownType,
            });
        };

        let decoded = match kind {
            BlockKind::Hero => serde_json::from_value(raw.props.clone()).map(|props| {
                PageBlock::Hero(HeroBlock {
                    id: raw.id.clone(),
                    props,
                })
            }),
            BlockKind::Mission => serde_json::from_value(raw.props.clone()).map(|props| {
                PageBlock::Mission(MissionBlock {
                    id: raw.id.clone(),
                    props,
                })
            }),
            BlockKind::Impact => serde_json::from_value(raw.props.clone()).map(|props| {
                PageBlock::Impact(ImpactBlock {
                    id: raw.id.clone(),
                    props,
                })
            }),
        };

        decoded.unwrap_or_else(|e| {
            PageBlock::Unrecognized(UnrecognizedBlock {
                raw,
                defect: BlockDefect::InvalidProps(e.to_string()),
            })
        })
    }
}

impl From<HeroBlock> for PageBlock {
    fn from(block: HeroBlock) -> Self {
        PageBlock::Hero(block)
    }
}

impl From<MissionBlock> for PageBlock {
    fn from(block: MissionBlock) -> Self {
        PageBlock::Mission(block)
    }
}

impl From<ImpactBlock> for PageBlock {
    fn from(block: ImpactBlock) -> Self {
        PageBlock::Impact(block)
    }
}

#[derive(Serialize)]
struct TaggedBlock<'a, P> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    props: &'a P,
}

impl Serialize for PageBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageBlock::Hero(b) => TaggedBlock {
                kind: BlockKind::Hero.as_str(),
                id: b.id.as_deref(),
                props: &b.props,
            }
            .serialize(serializer),
            PageBlock::Mission(b) => TaggedBlock {
                kind: BlockKind::Mission.as_str(),
                id: b.id.as_deref(),
                props: &b.props,
            }
            .serialize(serializer),
            PageBlock::Impact(b) => TaggedBlock {
                kind: BlockKind::Impact.as_str(),
                id: b.id.as_deref(),
                props: &b.props,
            }
            .serialize(serializer),
            PageBlock::Unrecognized(b) => b.raw.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_known_variants() {
        let blocks: Vec<PageBlock> = serde_json::from_value(json!([
            {"type": "hero", "id": "h1", "props": {"heading": "Hi", "subheading": "There",
                "primaryCta": {"label": "Go", "href": "/go", "variant": "ghost"}}},
            {"type": "mission", "id": "m1", "props": {"cards": [
                {"title": "A", "description": "B", "icon": "heart", "ctaLabel": "More"}], "columns": 2}},
            {"type": "impact", "props": {"title": "Impact", "stats": [{"value": "10", "label": "Trees"}]}}
        ]))
        .unwrap();

        assert_eq!(blocks[0].kind(), Some(BlockKind::Hero));
        assert_eq!(blocks[1].kind(), Some(BlockKind::Mission));
        assert_eq!(blocks[2].kind(), Some(BlockKind::Impact));
        assert_eq!(blocks[2].id(), None);

        let PageBlock::Hero(hero) = &blocks[0] else {
            panic!("expected hero");
        };
        let cta = hero.props.primary_cta.as_ref().unwrap();
        assert_eq!(cta.variant, Some(CtaVariant::Ghost));
        assert!(hero.props.secondary_cta.is_none());

        let PageBlock::Mission(mission) = &blocks[1] else {
            panic!("expected mission");
        };
        assert_eq!(mission.props.columns, Some(json!(2)));
        assert_eq!(mission.props.column_count(), 2);
        assert_eq!(mission.props.cards[0].cta_label.as_deref(), Some("More"));
    }

    #[test]
    fn test_mission_columns_decode_leniently() {
        let columns = |value: Value| {
            let block: PageBlock = serde_json::from_value(
                json!({"type": "mission", "props": {"cards": [], "columns": value}}),
            )
            .unwrap();
            let PageBlock::Mission(mission) = block else {
                panic!("expected mission");
            };
            mission.props.column_count()
        };

        assert_eq!(columns(json!(2)), 2);
        assert_eq!(columns(json!(2.0)), 2);
        assert_eq!(columns(json!(2.5)), 3);
        assert_eq!(columns(json!("4")), 3);
        assert_eq!(columns(json!("2")), 3);
        assert_eq!(columns(json!(null)), 3);
    }

    #[test]
    fn test_mission_columns_written_back_unchanged() {
        let raw = json!({"type": "mission", "id": "m", "props": {"cards": [], "columns": 2.0}});
        let block: PageBlock = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn test_unknown_type_is_kept_not_fatal() {
        let block: PageBlock = serde_json::from_value(json!({
            "type": "carousel", "id": "c1", "props": {"slides": []}, "enabled": false
        }))
        .unwrap();

        let PageBlock::Unrecognized(unrecognized) = &block else {
            panic!("expected unrecognized block");
        };
        assert_eq!(unrecognized.defect, BlockDefect::UnknownType);
        assert_eq!(block.type_tag(), "carousel");
        assert_eq!(block.id(), Some("c1"));

        // Written back exactly as read
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "carousel");
        assert_eq!(value["enabled"], false);
        assert_eq!(value["props"]["slides"], json!([]));
    }

    #[test]
    fn test_invalid_props_become_unrecognized() {
        let block: PageBlock = serde_json::from_value(json!({
            "type": "impact", "props": {"title": "Missing stats"}
        }))
        .unwrap();

        assert!(block.kind().is_none());
        assert_eq!(block.type_tag(), "impact");
        assert!(matches!(
            block,
            PageBlock::Unrecognized(UnrecognizedBlock {
                defect: BlockDefect::InvalidProps(_),
                ..
            })
        ));
    }

    #[test]
    fn test_missing_type_is_unrecognized() {
        let block: PageBlock = serde_json::from_value(json!({"props": {}})).unwrap();
        assert_eq!(block.type_tag(), "");
        assert!(block.kind().is_none());
    }

    #[test]
    fn test_serialize_uses_wire_contract() {
        let block = PageBlock::from(HeroBlock::default_for("City Bikes", "Safer streets."));
        let value = serde_json::to_value(&block).unwrap();

        assert_eq!(value["type"], "hero");
        assert!(value.get("id").is_none());
        assert_eq!(value["props"]["heading"], "Safer streets.");
        assert_eq!(value["props"]["primaryCta"]["href"], "/events");
        assert!(value["props"]["primaryCta"].get("variant").is_none());
    }

    #[test]
    fn test_default_hero_falls_back_to_name() {
        let hero = HeroBlock::default_for("City Bikes", "   ");
        assert_eq!(hero.props.heading, "City Bikes");
        assert!(hero.props.subheading.contains("City Bikes"));
    }

    #[test]
    fn test_set_id() {
        let mut block = PageBlock::from(HeroBlock::default_for("A", "B"));
        block.set_id("hero-1".to_string());
        assert_eq!(block.id(), Some("hero-1"));
    }
}
