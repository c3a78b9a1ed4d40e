use std::hash::Hasher;

use ecohk_game::{Catalog, ContentData, LocationId};
use serde_json::{Map, Value};
use twox_hash::XxHash64;

const CATALOG_SNAPSHOT_HASH: u64 = 0x2984_d85f_36e7_a98f;

#[test]
fn embedded_catalog_snapshot_stable() {
    let value = canonicalize_value(serde_json::to_value(Catalog::embedded()).unwrap());
    let canonical = serde_json::to_string_pretty(&value).unwrap();
    let digest = snapshot_hash(canonical.as_bytes());
    assert_eq!(
        digest, CATALOG_SNAPSHOT_HASH,
        "catalog snapshot changed\n{canonical}"
    );
}

#[test]
fn every_location_action_has_an_effect() {
    let catalog = Catalog::embedded();
    for id in LocationId::ALL {
        let actions = catalog.actions_at(id);
        assert!(!actions.is_empty(), "{id} has no actions");
        for action in actions {
            assert!(
                catalog.effect(action).is_some(),
                "{id} references unknown action {action}"
            );
        }
    }
}

#[test]
fn every_effect_is_offered_somewhere() {
    let catalog = Catalog::embedded();
    for action in catalog.actions.keys() {
        assert!(
            LocationId::ALL.iter().any(|id| catalog.offers(*id, action)),
            "{action} is not offered at any location"
        );
    }
}

#[test]
fn catalog_survives_serialization() {
    let catalog = Catalog::embedded();
    let json = serde_json::to_string(&catalog).unwrap();
    assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
}

#[test]
fn content_pools_have_no_duplicates() {
    let content = ContentData::embedded();
    let mut facts = content.facts.clone();
    facts.sort();
    facts.dedup();
    assert_eq!(facts.len(), content.facts.len());
    let mut tips = content.tips.clone();
    tips.sort();
    tips.dedup();
    assert_eq!(tips.len(), content.tips.len());
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(canonicalize_value)
                .collect::<Vec<_>>(),
        ),
        Value::Object(map) => {
            let mut result = Map::with_capacity(map.len());
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, value) in entries {
                result.insert(key, canonicalize_value(value));
            }
            Value::Object(result)
        }
        other => other,
    }
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}
