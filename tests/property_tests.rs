//! Property-based tests for core routing types.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::Utc;
use proptest::prelude::*;
use waypoint::builder::{MachineBuilder, StateNodeBuilder};
use waypoint::core::{RouteTable, StatePath, UrlPattern};
use waypoint::machine::{routing_event, TransitionLog, TransitionRecord, ROUTING_EVENT_PREFIX};

prop_compose! {
    fn arbitrary_segment()(segment in "[a-z][a-z0-9]{0,6}") -> String {
        segment
    }
}

prop_compose! {
    fn arbitrary_segments()(segments in prop::collection::vec(arbitrary_segment(), 1..4)) -> Vec<String> {
        segments
    }
}

proptest! {
    #[test]
    fn path_round_trips_through_display(segments in arbitrary_segments()) {
        let path = StatePath::new(segments.clone());
        prop_assert_eq!(path.segments(), segments.as_slice());
        prop_assert_eq!(StatePath::parse(&path.to_string()), path);
    }

    #[test]
    fn path_starts_with_every_ancestor(segments in arbitrary_segments()) {
        let path = StatePath::new(segments);
        for ancestor in path.ancestors_and_self() {
            prop_assert!(path.starts_with(&ancestor));
        }
    }

    #[test]
    fn ancestor_chain_length_is_depth_plus_one(segments in arbitrary_segments()) {
        let path = StatePath::new(segments);
        prop_assert_eq!(path.ancestors_and_self().count(), path.depth() + 1);
    }

    #[test]
    fn routing_event_is_deterministic(segments in arbitrary_segments()) {
        let path = StatePath::new(segments);
        prop_assert_eq!(routing_event(&path), routing_event(&path));
    }

    #[test]
    fn routing_event_recovers_the_path(segments in arbitrary_segments()) {
        let path = StatePath::new(segments);
        let event = routing_event(&path);
        let stripped = event.strip_prefix(ROUTING_EVENT_PREFIX).unwrap();
        prop_assert_eq!(StatePath::parse(stripped), path);
    }

    #[test]
    fn literal_pattern_matches_its_own_path(segments in arbitrary_segments()) {
        let raw = format!("/{}", segments.join("/"));
        let pattern = UrlPattern::compile(&raw);

        let params = pattern.matches(&raw);
        prop_assert!(params.is_some());
        prop_assert!(params.unwrap().is_empty());
    }

    #[test]
    fn literal_pattern_rejects_longer_paths(segments in arbitrary_segments()) {
        let raw = format!("/{}", segments.join("/"));
        let pattern = UrlPattern::compile(&raw);

        let longer = format!("{raw}/extra");
        prop_assert!(pattern.matches(&longer).is_none());
    }

    #[test]
    fn param_pattern_captures_every_segment(values in arbitrary_segments()) {
        let raw: String = (0..values.len())
            .map(|i| format!("/:p{i}"))
            .collect();
        let pattern = UrlPattern::compile(&raw);

        let path = format!("/{}", values.join("/"));
        let params = pattern.matches(&path).expect("param pattern should match");
        for (i, value) in values.iter().enumerate() {
            prop_assert_eq!(&params[&format!("p{i}")], value);
        }
    }

    #[test]
    fn wildcard_matches_any_path(segments in arbitrary_segments()) {
        let pattern = UrlPattern::compile("*");
        let path = format!("/{}", segments.join("/"));
        prop_assert!(pattern.matches(&path).is_some());
    }

    #[test]
    fn table_preserves_declaration_order(names in prop::collection::btree_set("[a-z][a-z0-9]{0,6}", 1..6)) {
        let names: Vec<String> = names.into_iter().collect();
        let mut builder = MachineBuilder::new().initial(names[0].clone());
        for name in &names {
            builder = builder.state(StateNodeBuilder::new(name.clone()).route(format!("/{name}")));
        }
        let definition = builder.build().unwrap();

        let table = RouteTable::from_definition(&definition).unwrap();
        let declared: Vec<String> = names.iter().map(|name| format!("/{name}")).collect();
        let collected: Vec<&str> = table.entries().iter().map(|e| e.pattern().raw()).collect();
        prop_assert_eq!(collected, declared.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn log_preserves_order(paths in prop::collection::vec(arbitrary_segments(), 1..8)) {
        let paths: Vec<StatePath> = paths.into_iter().map(StatePath::new).collect();
        let mut log = TransitionLog::new();
        let mut expected = vec![StatePath::parse("initial")];

        for (i, to) in paths.iter().enumerate() {
            let from = if i == 0 {
                StatePath::parse("initial")
            } else {
                paths[i - 1].clone()
            };
            log = log.record(TransitionRecord {
                from,
                to: to.clone(),
                event: routing_event(to),
                timestamp: Utc::now(),
            });
            expected.push(to.clone());
        }

        let visited = log.visited();
        prop_assert_eq!(visited.len(), expected.len());
        for (seen, expected) in visited.iter().zip(&expected) {
            prop_assert_eq!(*seen, expected);
        }
    }

    #[test]
    fn log_record_is_pure(from in arbitrary_segments(), to in arbitrary_segments()) {
        let log = TransitionLog::new();
        let record = TransitionRecord {
            from: StatePath::new(from),
            to: StatePath::new(to),
            event: "Go".to_string(),
            timestamp: Utc::now(),
        };

        let extended = log.record(record);

        // Original log unchanged
        prop_assert_eq!(log.records().len(), 0);
        // New log has the record
        prop_assert_eq!(extended.records().len(), 1);
    }

    #[test]
    fn path_round_trips_through_serde(segments in arbitrary_segments()) {
        let path = StatePath::new(segments);
        let json = serde_json::to_string(&path).unwrap();
        let deserialized: StatePath = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(path, deserialized);
    }
}
