//! Tenant records
//!
//! `TenantConfig` is the aggregate root of a campaign site. The persisted
//! tenant map is a JSON object keyed by slug; [`decode_tenant_map`] reads it
//! tolerantly so a single bad record never takes the whole map down.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::warn;
use uuid::Uuid;

use crate::block::{HeroBlock, PageBlock};
use crate::slug::Slug;
use crate::theme::TenantTheme;
use crate::{Error, Result};

/// All tenants, keyed by slug.
pub type TenantMap = BTreeMap<Slug, TenantConfig>;

/// Stable tenant identity, independent of the slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub(crate) String);

impl TenantId {
    /// Generate a fresh id of the form `t_<32 hex>`
    pub fn generate() -> Self {
        Self(format!("t_{}", Uuid::new_v4().simple()))
    }

    pub fn from_string(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(Error::InvalidData("tenant id must not be empty".to_string()));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One independently branded campaign site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    pub id: TenantId,
    pub name: String,
    pub slug: Slug,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub theme: TenantTheme,
    #[serde(default)]
    pub features: Vec<String>,
    /// Missing in the first storage format; decodes as empty.
    #[serde(default)]
    pub landing_page_blocks: Vec<PageBlock>,
}

impl TenantConfig {
    /// Synthesize the default hero when the tenant has no blocks.
    ///
    /// Returns `true` if a block was added.
    pub fn ensure_landing_page(&mut self) -> bool {
        if !self.landing_page_blocks.is_empty() {
            return false;
        }
        self.landing_page_blocks
            .push(HeroBlock::default_for(&self.name, &self.description).into());
        true
    }

    /// Give every block without an id a `<type>-<8 hex>` id.
    ///
    /// The suffix is derived from the slug and the block position, so a
    /// record loaded again before it is saved gets the same ids.
    pub fn assign_block_ids(&mut self) {
        for (index, block) in self.landing_page_blocks.iter_mut().enumerate() {
            if block.id().is_none_or(|id| id.is_empty()) {
                let tag = match block.type_tag() {
                    "" => "block",
                    tag => tag,
                };
                let name = format!("{}/{}/{}", self.slug, index, tag);
                let suffix = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
                    .simple()
                    .to_string();
                block.set_id(format!("{}-{}", tag, &suffix[..8]));
            }
        }
    }

    /// Bring a record into the shape every consumer expects.
    pub fn normalize(&mut self) {
        self.ensure_landing_page();
        self.assign_block_ids();
    }
}

/// Admin create payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantDraft {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TenantDraft {
    /// Build a full tenant record from the draft.
    ///
    /// The slug is normalized, the palette gets a random primary color and
    /// features default to `["events"]`. Blocks are left empty; the store
    /// synthesizes the default hero on create.
    pub fn into_tenant(self) -> Result<TenantConfig> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidData("tenant name must not be empty".to_string()));
        }
        let slug = Slug::normalize(&self.slug)?;

        Ok(TenantConfig {
            id: TenantId::generate(),
            name,
            slug,
            custom_domain: None,
            description: self.description.unwrap_or_default().trim().to_string(),
            theme: TenantTheme::with_random_primary(),
            features: vec!["events".to_string()],
            landing_page_blocks: Vec::new(),
        })
    }
}

/// A stored tenant map split into loadable tenants and everything else.
#[derive(Debug, Default)]
pub struct DecodedTenants {
    pub tenants: TenantMap,
    /// Records that were not loaded, by the key they are stored under
    pub skipped: Map<String, Value>,
}

/// Decode a persisted tenant map.
///
/// The top level must be a JSON object; anything else is an error. Records
/// that fail to decode, or repeat the slug or id of an earlier record, are
/// skipped with a warning and kept raw in [`DecodedTenants::skipped`].
/// Records are keyed by their own slug regardless of the key they were
/// stored under, and every record is normalized.
pub fn decode_tenants(value: Value) -> Result<DecodedTenants> {
    split_entries(value, true)
}

/// [`decode_tenants`] without the skipped records.
pub fn decode_tenant_map(value: Value) -> Result<TenantMap> {
    decode_tenants(value).map(|decoded| decoded.tenants)
}

/// Encode `tenants` as the stored map.
///
/// Records in `previous` that could not be loaded are carried over under
/// their stored key, so a save never erases data this process could not
/// read. A loaded tenant that now owns the same key wins.
pub fn encode_tenant_map(tenants: &TenantMap, previous: Option<Value>) -> Result<Value> {
    let mut entries = Map::new();
    for (slug, tenant) in tenants {
        entries.insert(slug.to_string(), serde_json::to_value(tenant)?);
    }

    if let Some(previous) = previous {
        match split_entries(previous, false) {
            Ok(decoded) => {
                for (key, raw) in decoded.skipped {
                    if entries.contains_key(&key) {
                        warn!("Unreadable tenant record '{}' replaced by a new tenant", key);
                        continue;
                    }
                    entries.insert(key, raw);
                }
            }
            Err(e) => warn!("Replacing unreadable tenant map: {}", e),
        }
    }

    Ok(Value::Object(entries))
}

fn split_entries(value: Value, report: bool) -> Result<DecodedTenants> {
    let Value::Object(entries) = value else {
        return Err(Error::InvalidData(
            "tenant map must be a JSON object".to_string(),
        ));
    };

    let mut decoded = DecodedTenants::default();
    let mut ids = HashSet::new();
    for (key, entry) in entries {
        let mut tenant: TenantConfig = match serde_json::from_value(entry.clone()) {
            Ok(tenant) => tenant,
            Err(e) => {
                if report {
                    warn!("Skipping unreadable tenant record '{}': {}", key, e);
                }
                decoded.skipped.insert(key, entry);
                continue;
            }
        };

        if decoded.tenants.contains_key(&tenant.slug) {
            if report {
                warn!("Duplicate tenant slug '{}' in stored map, keeping first", tenant.slug);
            }
            decoded.skipped.insert(key, entry);
            continue;
        }
        if !ids.insert(tenant.id.clone()) {
            if report {
                warn!(
                    "Duplicate tenant id '{}' under '{}' in stored map, keeping first",
                    tenant.id, key
                );
            }
            decoded.skipped.insert(key, entry);
            continue;
        }
        if report && tenant.slug.as_str() != key {
            warn!(
                "Tenant record stored under '{}' has slug '{}', re-keying",
                key, tenant.slug
            );
        }

        tenant.normalize();
        decoded.tenants.insert(tenant.slug.clone(), tenant);
    }

    Ok(decoded)
}
