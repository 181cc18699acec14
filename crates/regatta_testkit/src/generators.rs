//! Property-based test generators using proptest.
//!
//! Provides strategies for generating records that the store accepts
//! as-is: non-empty names, distinct class ids, in-range timestamps.

use chrono::{DateTime, NaiveDateTime};
use proptest::prelude::*;
use regatta_codec::{BoatRecord, ClassRecord, RaceRecord, ScoringCode, YachtClass};

/// Allowances the boat strategy may fill in.
const SAMPLED_ALLOWANCES: [&str; 6] = [
    "GPH",
    "OSN",
    "TN_Inshore_Low",
    "TN_Offshore_High",
    "ILCWA",
    "APHD",
];

/// Strategy for class ids.
pub fn class_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Z0-9]{0,3}").expect("Invalid regex")
}

/// Strategy for a scoring family.
pub fn yacht_class_strategy() -> impl Strategy<Value = YachtClass> {
    prop_oneof![Just(YachtClass::Orc), Just(YachtClass::OneDesign)]
}

/// Strategy for one of the known scoring codes.
pub fn scoring_code_strategy() -> impl Strategy<Value = ScoringCode> {
    prop_oneof![
        Just(ScoringCode::TripleNumberLow),
        Just(ScoringCode::TripleNumberMedium),
        Just(ScoringCode::TripleNumberHigh),
        Just(ScoringCode::CustomTot),
        Just(ScoringCode::CoastalLongDistance),
        Just(ScoringCode::WindwardLeeward),
    ]
}

/// Strategy for whole-second timestamps between 2000 and 2099.
pub fn timestamp_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (946_684_800i64..4_102_444_800).prop_map(|secs| {
        DateTime::from_timestamp(secs, 0)
            .expect("in range")
            .naive_utc()
    })
}

/// Strategy for a class.
pub fn class_strategy() -> impl Strategy<Value = ClassRecord> {
    (
        class_id_strategy(),
        prop::string::string_regex("[A-Z][A-Za-z0-9]{0,11}").expect("Invalid regex"),
        yacht_class_strategy(),
    )
        .prop_map(|(id, name, family)| ClassRecord::new(id, name, family))
}

/// Strategy for 1 to `max` classes with distinct ids.
pub fn distinct_classes_strategy(max: usize) -> impl Strategy<Value = Vec<ClassRecord>> {
    prop::collection::btree_map(class_id_strategy(), class_strategy(), 1..=max.max(1)).prop_map(
        |by_id| {
            by_id
                .into_iter()
                .map(|(id, mut class)| {
                    class.class_id = id;
                    class
                })
                .collect()
        },
    )
}

/// Strategy for a race in class `O1`.
///
/// Some races carry a caller-chosen `RaceId`, which the store must ignore.
pub fn race_strategy() -> impl Strategy<Value = RaceRecord> {
    (
        prop::string::string_regex("R[0-9]{1,3}").expect("Invalid regex"),
        timestamp_strategy(),
        scoring_code_strategy(),
        proptest::option::of(-50i64..500),
    )
        .prop_map(|(name, start, scoring, caller_id)| {
            let mut race = RaceRecord::new(name, start, "O1", scoring);
            race.race_id = caller_id;
            race
        })
}

/// Strategy for allowance values with at most three decimals.
pub fn allowance_strategy() -> impl Strategy<Value = f64> {
    (1u32..2_000_000).prop_map(|v| f64::from(v) / 1000.0)
}

/// Strategy for a boat in class `O1`.
pub fn boat_strategy() -> impl Strategy<Value = BoatRecord> {
    (
        prop::string::string_regex("[A-Z][a-z]{1,10}( [A-Z][a-z]{1,8})?").expect("Invalid regex"),
        prop::string::string_regex("[A-Z]{3} [0-9]{1,5}").expect("Invalid regex"),
        prop::collection::vec(
            (prop::sample::select(SAMPLED_ALLOWANCES.to_vec()), allowance_strategy()),
            0..4,
        ),
    )
        .prop_map(|(name, sail_no, allowances)| {
            let mut boat = BoatRecord::new(name, sail_no, "O1");
            for (field, value) in allowances {
                boat.set_handicap(field, value);
            }
            boat
        })
}

/// Strategy for a sequence of non-empty append batches.
pub fn race_batches_strategy() -> impl Strategy<Value = Vec<Vec<RaceRecord>>> {
    prop::collection::vec(prop::collection::vec(race_strategy(), 1..5), 1..4)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 64,
            max_shrink_iters: 500,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for tests that touch the filesystem.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 16,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
