//! Property-based tests for search history recording.
//!
//! These tests verify the cap, newest-first ordering and consecutive
//! de-duplication for arbitrary sequences of recorded terms.

use phonebook::database::Database;
use phonebook::managers::search_history_manager::{SearchHistoryManager, SearchHistoryManagerTrait};
use proptest::prelude::*;

fn arb_terms() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop_oneof![Just("lab".to_string()), Just("icu".to_string()), "[a-z]{3,6}"], 0..80)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn never_exceeds_cap(terms in arb_terms(), cap in 1usize..60) {
        let mut mgr = SearchHistoryManager::new(Database::open_in_memory().unwrap(), cap).unwrap();
        for (i, term) in terms.iter().enumerate() {
            mgr.record_at(term, i, i as i64).unwrap();
        }
        prop_assert!(mgr.items().len() <= cap);
    }

    #[test]
    fn no_adjacent_duplicates(terms in arb_terms()) {
        let mut mgr = SearchHistoryManager::new(Database::open_in_memory().unwrap(), 50).unwrap();
        for (i, term) in terms.iter().enumerate() {
            mgr.record_at(term, 0, i as i64).unwrap();
        }
        for pair in mgr.items().windows(2) {
            prop_assert_ne!(&pair[0].term, &pair[1].term);
        }
    }

    #[test]
    fn newest_first(terms in arb_terms()) {
        let mut mgr = SearchHistoryManager::new(Database::open_in_memory().unwrap(), 50).unwrap();
        for (i, term) in terms.iter().enumerate() {
            mgr.record_at(term, 0, i as i64).unwrap();
        }
        for pair in mgr.items().windows(2) {
            prop_assert!(pair[0].timestamp > pair[1].timestamp);
        }
        if let Some(last) = terms.last() {
            prop_assert_eq!(&mgr.items()[0].term, last);
        }
    }

    #[test]
    fn matches_collapsed_reference(terms in arb_terms()) {
        let mut mgr = SearchHistoryManager::new(Database::open_in_memory().unwrap(), 50).unwrap();
        let mut expected: Vec<String> = Vec::new();
        for (i, term) in terms.iter().enumerate() {
            mgr.record_at(term, 0, i as i64).unwrap();
            if expected.first() != Some(term) {
                expected.insert(0, term.clone());
                expected.truncate(50);
            }
        }
        let actual: Vec<String> = mgr.items().iter().map(|i| i.term.clone()).collect();
        prop_assert_eq!(actual, expected);
    }
}
