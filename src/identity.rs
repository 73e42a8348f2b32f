//! Identity resolution for de-duplication.
//!
//! Every consumer that needs to decide whether two records are the same
//! logical item goes through [`IdentityKey::resolve`], so the fallback
//! order is defined in exactly one place. The enum variant records which
//! field produced the key; a `url`-derived key can therefore never
//! collide with an `id`-derived one even when the strings are equal.

use crate::item::NewsItem;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Stable key identifying one logical news item.
///
/// Resolution order, first present field wins: `id`, `guid`, `url` (or
/// `link`), and finally a content digest of the whole record. The order
/// is fixed; first-seen wins everywhere this key is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Id(String),
    Guid(String),
    Url(String),
    Fingerprint(String),
}

impl IdentityKey {
    pub fn resolve(item: &NewsItem) -> IdentityKey {
        if let Some(id) = &item.id {
            return IdentityKey::Id(id.clone());
        }
        if let Some(guid) = &item.guid {
            return IdentityKey::Guid(guid.clone());
        }
        if let Some(url) = &item.url {
            return IdentityKey::Url(url.clone());
        }
        if let Some(link) = &item.link {
            return IdentityKey::Url(link.clone());
        }
        IdentityKey::Fingerprint(fingerprint(item))
    }
}

/// Hash of the full normalized record, used only when no upstream
/// identifier exists at all.
fn fingerprint(item: &NewsItem) -> String {
    let value = serde_json::to_value(item).unwrap_or(Value::Null);
    let mut canonical = String::new();
    write_canonical(&value, &mut canonical);
    format!("{:x}", Sha256::digest(canonical.as_bytes()))
}

/// Serialize a JSON value with object keys sorted, so the digest does
/// not depend on field order in the source file.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(values) => {
            out.push('[');
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(v, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}
