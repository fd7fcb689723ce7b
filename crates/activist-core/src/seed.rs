//! Built-in sample tenants used when no stored map exists

use serde_json::Value;

use crate::block::{
    BlockCard, BlockCta, BlockStat, HeroBlock, HeroProps, ImpactBlock, ImpactProps, MissionBlock,
    MissionProps,
};
use crate::slug::Slug;
use crate::tenant::{TenantConfig, TenantId, TenantMap};
use crate::theme::TenantTheme;

fn tenant(
    id: &str,
    name: &str,
    slug: &str,
    description: &str,
    theme: [&str; 3],
    features: &[&str],
) -> TenantConfig {
    TenantConfig {
        id: TenantId(id.to_string()),
        name: name.to_string(),
        slug: Slug(slug.to_string()),
        custom_domain: None,
        description: description.to_string(),
        theme: TenantTheme {
            primary: theme[0].to_string(),
            secondary: theme[1].to_string(),
            accent: theme[2].to_string(),
        },
        features: features.iter().map(|f| f.to_string()).collect(),
        landing_page_blocks: Vec::new(),
    }
}

fn card(title: &str, description: &str, icon: &str, href: &str, cta_label: &str) -> BlockCard {
    BlockCard {
        title: title.to_string(),
        description: description.to_string(),
        icon: Some(icon.to_string()),
        href: Some(href.to_string()),
        cta_label: Some(cta_label.to_string()),
    }
}

fn stat(value: &str, label: &str) -> BlockStat {
    BlockStat {
        value: value.to_string(),
        label: label.to_string(),
    }
}

fn climate_action() -> TenantConfig {
    let mut climate = tenant(
        "t_01",
        "Climate Action Now",
        "climate-action",
        "Mobilizing communities for a sustainable future.",
        ["#15803d", "#dcfce7", "#22c55e"],
        &["events", "donations"],
    );
    climate.landing_page_blocks = vec![
        HeroBlock {
            id: Some("hero-main".to_string()),
            props: HeroProps {
                heading: "Mobilizing communities for a sustainable future.".to_string(),
                subheading: "We are building a movement. Join Climate Action Now today and help us create lasting change in our community.".to_string(),
                primary_cta: Some(BlockCta {
                    label: "Join the Movement".to_string(),
                    href: "/events".to_string(),
                    variant: None,
                }),
                secondary_cta: Some(BlockCta {
                    label: "Learn More".to_string(),
                    href: "#mission".to_string(),
                    variant: None,
                }),
            },
        }
        .into(),
        MissionBlock {
            id: Some("mission".to_string()),
            props: MissionProps {
                title: Some("Get Involved".to_string()),
                description: Some("Every action counts. Pick the one that fits you.".to_string()),
                cards: vec![
                    card(
                        "Upcoming Events",
                        "From town halls to street rallies, find out where we'll be next.",
                        "calendar",
                        "/events",
                        "View Calendar",
                    ),
                    card(
                        "Donate to the Cause",
                        "Your contribution fuels our operations. We rely on people like you.",
                        "heart",
                        "/donate",
                        "Donate Now",
                    ),
                ],
                columns: Some(Value::from(2)),
            },
        }
        .into(),
        ImpactBlock {
            id: Some("impact".to_string()),
            props: ImpactProps {
                title: "Our Impact".to_string(),
                description: None,
                stats: vec![
                    stat("12,450", "Supporters"),
                    stat("320", "Events Organized"),
                    stat("48", "Local Chapters"),
                ],
            },
        }
        .into(),
    ];
    climate
}

fn city_bikes() -> TenantConfig {
    let mut bikes = tenant(
        "t_02",
        "City Bike Initiative",
        "city-bikes",
        "Reclaiming our streets for safer cycling.",
        ["#1d4ed8", "#dbeafe", "#3b82f6"],
        &["events", "volunteers"],
    );
    bikes.ensure_landing_page();
    bikes.assign_block_ids();
    bikes
}

/// The two sample tenants the store starts from.
pub fn default_tenants() -> TenantMap {
    [climate_action(), city_bikes()]
        .into_iter()
        .map(|t| (t.slug.clone(), t))
        .collect()
}
