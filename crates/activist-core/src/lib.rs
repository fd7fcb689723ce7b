//! Activist Core Types and Traits
//!
//! This crate provides the fundamental types shared by every other crate:
//! - Tenant records, slugs and tenant drafts
//! - The tagged page block schema
//! - Theme palette and the derived style context
//! - The tenant repository and lookup seams
//! - Core error types

pub mod block;
pub mod error;
pub mod repository;
pub mod seed;
pub mod slug;
pub mod tenant;
pub mod theme;

pub use block::{
    BlockCard, BlockCta, BlockDefect, BlockKind, BlockStat, CtaVariant, HeroBlock, HeroProps,
    ImpactBlock, ImpactProps, MissionBlock, MissionProps, PageBlock, RawBlock, UnrecognizedBlock,
};
pub use error::{Error, Result};
pub use repository::{TenantLookup, TenantRepository};
pub use slug::Slug;
pub use tenant::{
    DecodedTenants, TenantConfig, TenantDraft, TenantId, TenantMap, decode_tenant_map,
    decode_tenants, encode_tenant_map,
};
pub use theme::{StyleContext, TenantTheme, derive_style};
