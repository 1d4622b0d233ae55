//! Property tests for the ranking index
//!
//! Random upsert/remove/initialize sequences are replayed against a plain
//! `BTreeMap` model; after every step the index must hold exactly the model's
//! entries, keep its two maps in agreement, and report the model's minimum.

use std::collections::BTreeMap;

use proptest::prelude::*;

use catalog_core::{BrandId, Price};
use catalog_engine::{RankingCache, RankingIndex};

#[derive(Debug, Clone)]
enum Op {
    Upsert(u64, Price),
    Remove(u64),
    Initialize(Vec<(u64, Price)>),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Small key and price spaces so ties and bucket sharing are common
    prop_oneof![
        6 => (0u64..16, 0u64..8).prop_map(|(b, p)| Op::Upsert(b, p * 100)),
        3 => (0u64..16).prop_map(Op::Remove),
        1 => prop::collection::vec((0u64..16, 0u64..8), 0..10)
            .prop_map(|v| Op::Initialize(v.into_iter().map(|(b, p)| (b, p * 100)).collect())),
        1 => Just(Op::Clear),
    ]
}

fn model_lowest(model: &BTreeMap<BrandId, Price>) -> Option<(BrandId, Price)> {
    model
        .iter()
        .map(|(b, p)| (*b, *p))
        .min_by_key(|(b, p)| (*p, *b))
}

fn apply(index: &mut RankingIndex, model: &mut BTreeMap<BrandId, Price>, op: &Op) {
    match op {
        Op::Upsert(b, p) => {
            index.upsert(BrandId::new(*b), *p);
            model.insert(BrandId::new(*b), *p);
        }
        Op::Remove(b) => {
            let removed = index.remove(BrandId::new(*b));
            assert_eq!(removed, model.remove(&BrandId::new(*b)));
        }
        Op::Initialize(entries) => {
            *index = entries.iter().map(|(b, p)| (BrandId::new(*b), *p)).collect();
            model.clear();
            for (b, p) in entries {
                model.insert(BrandId::new(*b), *p);
            }
        }
        Op::Clear => {
            index.clear();
            model.clear();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn index_matches_model(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let mut index = RankingIndex::new();
        let mut model = BTreeMap::new();

        for op in &ops {
            apply(&mut index, &mut model, op);

            prop_assert_eq!(index.check_consistency(), Ok(()));
            prop_assert_eq!(index.entries(), model.clone());
            prop_assert_eq!(index.len(), model.len());
            prop_assert_eq!(
                index.lowest().map(|t| (t.brand_id, t.total_price)),
                model_lowest(&model)
            );
        }
    }

    #[test]
    fn every_brand_sits_in_exactly_its_bucket(ops in prop::collection::vec(op_strategy(), 1..100)) {
        let mut index = RankingIndex::new();
        let mut model = BTreeMap::new();
        for op in &ops {
            apply(&mut index, &mut model, op);
        }

        for (brand, total) in &model {
            let bucket = index.brands_at(*total).unwrap_or_default();
            prop_assert!(bucket.contains(brand));
            prop_assert_eq!(index.total_of(*brand), Some(*total));
        }

        let mut distinct: Vec<Price> = model.values().copied().collect();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(index.bucket_count(), distinct.len());
    }

    #[test]
    fn repeated_upsert_is_idempotent(brand in 0u64..16, total in 0u64..10_000, times in 1usize..5) {
        let cache = RankingCache::new();
        for _ in 0..times {
            cache.upsert(BrandId::new(brand), total);
        }
        prop_assert_eq!(cache.len(), 1);
        prop_assert_eq!(cache.brands_at(total), Some(vec![BrandId::new(brand)]));
        prop_assert_eq!(cache.check_consistency(), Ok(()));
    }

    #[test]
    fn initialize_equals_sequential_upserts(entries in prop::collection::vec((0u64..32, 0u64..1_000), 0..40)) {
        let bulk = RankingCache::new();
        bulk.upsert(BrandId::new(999), 1);
        bulk.initialize(entries.iter().map(|(b, p)| (BrandId::new(*b), *p)));

        let sequential = RankingCache::new();
        for (b, p) in &entries {
            sequential.upsert(BrandId::new(*b), *p);
        }

        prop_assert_eq!(bulk.entries(), sequential.entries());
        prop_assert_eq!(bulk.lowest_total_priced_brand(), sequential.lowest_total_priced_brand());
        prop_assert_eq!(bulk.check_consistency(), Ok(()));
    }
}
