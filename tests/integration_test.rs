//! Integration tests for the screening pipeline.
//!
//! Tests cover:
//! - Range filter semantics over missing and non-numeric values
//! - Triple Score domain and all-up/all-down exclusivity
//! - Comparator ordering: nulls last, tie-breaks, all-down reversal
//! - Presets and clear-all
//! - Sector/industry aggregation and member ranking
//! - Full pipeline through a mock snapshot port

mod common;

use common::*;
use std::cmp::Ordering;

use udts_screener::adapters::json_snapshot_adapter::JsonSnapshotAdapter;
use udts_screener::domain::aggregation::{
    aggregate, group_members, rank_members, summarise_groups, GroupKey,
};
use udts_screener::domain::comparator::{compare_by, sort_records};
use udts_screener::domain::criteria::{DirectionFilter, FilterCriteria, RangeField};
use udts_screener::domain::error::ScreenerError;
use udts_screener::domain::membership::ReferenceIndex;
use udts_screener::domain::predicate::{is_all_down, is_all_up, matches};
use udts_screener::domain::presets::{apply, clear_all, Preset};
use udts_screener::domain::projection::{project, SummaryCounts};
use udts_screener::domain::range_filter::{passes, RangeFilter};
use udts_screener::domain::stock::{BiggestTrend, CmpLabel, Direction, InitialTrend, StockRecord};
use udts_screener::domain::trend_score::TripleScore;
use udts_screener::domain::view_state::{
    MembershipFilter, Quadrant, SortColumn, SortDirection, SortState, ViewState,
};
use udts_screener::ports::snapshot_port::SnapshotPort;

use approx::assert_relative_eq;
use proptest::prelude::*;

fn direction_strategy() -> impl Strategy<Value = Option<Direction>> {
    prop_oneof![Just(None), Just(UP), Just(DOWN)]
}

fn optional_value() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), (-1000.0f64..1000.0).prop_map(Some)]
}

mod range_filter {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(passes(Some(10.0), "10", "20"));
        assert!(passes(Some(20.0), "10", "20"));
        assert!(!passes(Some(20.5), "10", "20"));
        assert!(!passes(Some(9.99), "10", ""));
    }

    #[test]
    fn null_rejected_once_a_bound_is_active() {
        assert!(passes(None, "", ""));
        assert!(!passes(None, "0", ""));
        assert!(!passes(None, "", "100"));
    }

    #[test]
    fn non_numeric_bounds_are_inactive() {
        let f = RangeFilter::from_bounds("abc", " ");
        assert!(!f.is_active());
        assert!(f.passes(None));
    }

    #[test]
    fn raw_dash_value_is_missing() {
        let f = RangeFilter::from_bounds("0", "");
        assert!(!f.passes_raw(Some("-")));
        assert!(!f.passes_raw(Some("")));
        assert!(f.passes_raw(Some("3.5")));
    }

    proptest! {
        #[test]
        fn blank_bounds_pass_everything(value in optional_value()) {
            prop_assert!(passes(value, "", ""));
        }

        #[test]
        fn active_bound_excludes_missing(bound in -1000.0f64..1000.0, use_min in any::<bool>()) {
            let text = bound.to_string();
            let f = if use_min {
                RangeFilter::from_bounds(&text, "")
            } else {
                RangeFilter::from_bounds("", &text)
            };
            prop_assert!(!f.passes(None));
        }

        #[test]
        fn passing_value_lies_within_bounds(
            value in -1000.0f64..1000.0,
            lo in -1000.0f64..1000.0,
            hi in -1000.0f64..1000.0,
        ) {
            let f = RangeFilter::from_bounds(&lo.to_string(), &hi.to_string());
            if f.passes(Some(value)) {
                prop_assert!(value >= lo && value <= hi);
            }
        }
    }
}

mod trend_classification {
    use super::*;

    proptest! {
        #[test]
        fn triple_score_domain(m in direction_strategy(), w in direction_strategy(), d in direction_strategy()) {
            let record = stock("X").mwd(m, w, d).build();
            let t = TripleScore::of(&record);
            prop_assert!([-300, -200, -100, 0, 100, 200, 300].contains(&t.score));
            prop_assert_eq!(t.score == 300, t.fully_up);
            prop_assert_eq!(t.score == -300, t.fully_down);
            prop_assert!(!(t.fully_up && t.fully_down));
        }

        #[test]
        fn all_up_and_all_down_are_exclusive(
            m in direction_strategy(),
            w in direction_strategy(),
            d in direction_strategy(),
            h in direction_strategy(),
            q in direction_strategy(),
            big in direction_strategy(),
            init in direction_strategy(),
        ) {
            let record = stock("X")
                .mwd(m, w, d)
                .with(|r| {
                    let udts = r.udts.get_or_insert_with(Default::default);
                    udts.hourly = h;
                    udts.fifteen_min = q;
                    r.biggest_trend = Some(BiggestTrend {
                        direction: big,
                        ..Default::default()
                    });
                    r.initial_trend = Some(InitialTrend {
                        direction: init,
                        support: None,
                    });
                    r.cmp_label = Some(CmpLabel::Yes);
                })
                .build();
            prop_assert!(!(is_all_up(&record) && is_all_down(&record)));
        }
    }

    #[test]
    fn builder_flags_agree_with_directions() {
        let r = stock("X").mwd(UP, UP, UP).build();
        assert!(r.is_triple_up);
        assert!(r.triple_flags_consistent());
        let r = stock("Y").mwd(UP, None, UP).build();
        assert!(!r.is_triple_up);
        assert_eq!(TripleScore::of(&r).score, 200);
    }
}

mod ordering {
    use super::*;

    fn order(records: &[StockRecord], view: &ViewState) -> Vec<String> {
        let mut refs: Vec<&StockRecord> = records.iter().collect();
        sort_records(&mut refs, view);
        symbols(refs)
    }

    #[test]
    fn score_descending_breaks_ties_on_upside() {
        let records = vec![
            stock("A").score(80.0).upside(5.0).build(),
            stock("B").score(80.0).upside(12.0).build(),
            stock("C").score(60.0).upside(40.0).build(),
        ];
        let view = ViewState::default()
            .with_sort(SortState::by(SortColumn::Score, SortDirection::Descending));
        assert_eq!(order(&records, &view), vec!["B", "A", "C"]);
    }

    #[test]
    fn default_order_puts_missing_score_last() {
        let snapshot = sample_snapshot();
        assert_eq!(
            order(&snapshot.stocks, &ViewState::default()),
            vec!["TCS", "MINDTREE", "INFY", "SUZLON", "ONGC", "NEWLIST"]
        );
    }

    #[test]
    fn all_down_quadrant_reverses_default_order() {
        let records = vec![
            stock("A").score(10.0).upside(1.0).build(),
            stock("B").score(30.0).build(),
            stock("C").score(20.0).upside(-3.0).build(),
        ];
        let all = SortState::initial();
        for a in &records {
            for b in &records {
                assert_eq!(
                    compare_by(a, b, all, Quadrant::AllDown),
                    compare_by(a, b, all, Quadrant::All).reverse()
                );
            }
        }
    }

    #[test]
    fn alphabetic_column_ignores_case() {
        let records = vec![
            stock("b").sector("energy").build(),
            stock("A").sector("Banks").build(),
            stock("C").build(),
        ];
        let view = ViewState::default()
            .with_sort(SortState::by(SortColumn::Sector, SortDirection::Ascending));
        assert_eq!(order(&records, &view), vec!["A", "b", "C"]);
    }

    #[test]
    fn supertrend_column_groups_directions() {
        let records = vec![
            stock("D1").supertrend(Direction::Down).score(90.0).build(),
            stock("NONE").score(99.0).build(),
            stock("U1").supertrend(Direction::Up).score(10.0).build(),
            stock("U2").supertrend(Direction::Up).score(50.0).build(),
        ];
        let desc = ViewState::default().with_sort(SortState::by(
            SortColumn::DailySupertrend,
            SortDirection::Descending,
        ));
        assert_eq!(order(&records, &desc), vec!["U2", "U1", "D1", "NONE"]);

        let asc = desc.with_sort(desc.sort.toggled(SortColumn::DailySupertrend));
        assert_eq!(order(&records, &asc), vec!["D1", "U1", "U2", "NONE"]);
    }

    #[test]
    fn header_toggle_flips_then_resets() {
        let s = SortState::initial().toggled(SortColumn::Roe);
        assert_eq!(s, SortState::by(SortColumn::Roe, SortDirection::Descending));
        let s = s.toggled(SortColumn::Roe);
        assert_eq!(s.direction, SortDirection::Ascending);
        let s = s.toggled(SortColumn::Pe);
        assert_eq!(s, SortState::by(SortColumn::Pe, SortDirection::Descending));
    }

    proptest! {
        #[test]
        fn nulls_last_in_both_directions(
            values in prop::collection::vec(optional_value(), 0..20),
            ascending in any::<bool>(),
        ) {
            let records: Vec<StockRecord> = values
                .iter()
                .enumerate()
                .map(|(i, v)| stock(&format!("S{i}")).with(|r| r.fundamentals.roe = *v).build())
                .collect();
            let direction = if ascending { SortDirection::Ascending } else { SortDirection::Descending };
            let view = ViewState::default().with_sort(SortState::by(SortColumn::Roe, direction));
            let mut refs: Vec<&StockRecord> = records.iter().collect();
            sort_records(&mut refs, &view);

            let first_missing = refs.iter().position(|r| r.fundamentals.roe.is_none());
            if let Some(pos) = first_missing {
                prop_assert!(refs[pos..].iter().all(|r| r.fundamentals.roe.is_none()));
            }
            for pair in refs.windows(2) {
                if let (Some(a), Some(b)) = (pair[0].fundamentals.roe, pair[1].fundamentals.roe) {
                    let in_order = if ascending { a <= b } else { a >= b };
                    prop_assert!(in_order, "{} then {} out of order", a, b);
                }
            }
        }

        #[test]
        fn comparator_is_antisymmetric(
            sa in optional_value(),
            sb in optional_value(),
            ua in optional_value(),
            ub in optional_value(),
        ) {
            let a = stock("A").with(|r| { r.scores.total = sa; r.upside = ua; }).build();
            let b = stock("B").with(|r| { r.scores.total = sb; r.upside = ub; }).build();
            for sort in [
                SortState::initial(),
                SortState::by(SortColumn::Score, SortDirection::Ascending),
                SortState::by(SortColumn::Upside, SortDirection::Descending),
            ] {
                prop_assert_eq!(
                    compare_by(&a, &b, sort, Quadrant::All),
                    compare_by(&b, &a, sort, Quadrant::All).reverse()
                );
            }
        }
    }

    #[test]
    fn equal_records_keep_snapshot_order() {
        let records: Vec<StockRecord> = ["Q", "R", "S"]
            .iter()
            .map(|s| stock(s).score(50.0).upside(1.0).build())
            .collect();
        assert_eq!(order(&records, &ViewState::default()), vec!["Q", "R", "S"]);
        assert_eq!(
            compare_by(&records[0], &records[1], SortState::initial(), Quadrant::All),
            Ordering::Equal
        );
    }
}

mod presets {
    use super::*;

    #[test]
    fn best_up_up_selects_quality_uptrends() {
        let snapshot = sample_snapshot();
        let view = apply(Preset::BestUpUp);
        let index = ReferenceIndex::nifty50();
        let picked: Vec<&StockRecord> = snapshot
            .stocks
            .iter()
            .filter(|r| matches(r, &view, &index))
            .collect();
        assert_eq!(symbols(picked), vec!["TCS", "INFY"]);
    }

    #[test]
    fn best_turn_selects_monthly_down_reversals() {
        let snapshot = sample_snapshot();
        let view = apply(Preset::BestTurn);
        let projection = project(&snapshot, &view, &ReferenceIndex::nifty50(), 100);
        assert_eq!(symbols(projection.rows), vec!["SUZLON"]);
    }

    #[test]
    fn preset_replaces_every_filter() {
        let prior = ViewState::default()
            .with_quadrant(Quadrant::AllDown)
            .with_membership(MembershipFilter::Member)
            .with_criteria(FilterCriteria::blank().with_sector("bank"));
        let view = apply(Preset::BestUpUp);
        assert_ne!(view, prior);
        assert_eq!(view.quadrant, Quadrant::All);
        assert_eq!(view.membership, MembershipFilter::All);
        assert!(view.criteria.sector.is_empty());
        assert_eq!(view.criteria.weekly_trend, DirectionFilter::Only(Direction::Up));
    }

    #[test]
    fn clear_after_preset_restores_blank_criteria() {
        for preset in Preset::ALL {
            let cleared = clear_all(&apply(preset));
            assert!(cleared.criteria.is_blank());
            assert_eq!(cleared.sort, SortState::initial());
        }
    }

    #[test]
    fn clear_all_keeps_quadrant_and_membership() {
        let view = ViewState::default()
            .with_quadrant(Quadrant::AllUp)
            .with_membership(MembershipFilter::NonMember)
            .with_criteria(FilterCriteria::blank().with_min(RangeField::Roe, "10"));
        let cleared = clear_all(&view);
        assert_eq!(cleared.quadrant, Quadrant::AllUp);
        assert_eq!(cleared.membership, MembershipFilter::NonMember);
        assert!(cleared.criteria.is_blank());
    }
}

mod aggregation {
    use super::*;

    #[test]
    fn sector_trends_split_on_median_sign() {
        let snapshot = sample_snapshot();
        let trends = aggregate(&snapshot.stocks, GroupKey::Sector, 5);

        assert_eq!(trends.up_trends.len(), 1);
        let tech = &trends.up_trends[0];
        assert_eq!(tech.name, "Technology");
        assert_relative_eq!(tech.median_score, 300.0);
        assert_eq!(tech.member_count, 3);
        assert_eq!(tech.fully_up_count, 2);
        assert_relative_eq!(tech.pct_fully_up, 66.67);

        assert_eq!(trends.down_trends.len(), 1);
        let energy = &trends.down_trends[0];
        assert_eq!(energy.name, "Energy");
        assert_relative_eq!(energy.median_score, -100.0);
        assert_relative_eq!(energy.pct_fully_down, 50.0);
    }

    #[test]
    fn top_n_truncates_each_list() {
        let records: Vec<StockRecord> = (0..8)
            .map(|i| {
                stock(&format!("S{i}"))
                    .industry(&format!("Industry {i}"))
                    .mwd(UP, if i % 2 == 0 { UP } else { None }, None)
                    .build()
            })
            .collect();
        let trends = aggregate(&records, GroupKey::Industry, 3);
        assert_eq!(trends.up_trends.len(), 3);
        assert!(trends.down_trends.is_empty());
        assert_relative_eq!(trends.up_trends[0].median_score, 200.0);
    }

    #[test]
    fn down_branch_ranks_lowest_score_first() {
        let y = stock("Y").mwd(DOWN, DOWN, UP).upside(2.0).build();
        let x = stock("X").mwd(DOWN, DOWN, DOWN).upside(-5.0).build();
        let members = [&y, &x];
        let ranked = rank_members(&members, true);
        let order: Vec<&str> = ranked.iter().map(|m| m.record.symbol.as_str()).collect();
        assert_eq!(order, vec!["X", "Y"]);
        assert_eq!(ranked[0].triple.score, -300);
    }

    #[test]
    fn up_branch_prefers_alignment_then_upside() {
        let snapshot = sample_snapshot();
        let tech = group_members(&snapshot.stocks, GroupKey::Sector, "Technology");
        let ranked = rank_members(&tech, false);
        let order: Vec<&str> = ranked.iter().map(|m| m.record.symbol.as_str()).collect();
        assert_eq!(order, vec!["MINDTREE", "TCS", "INFY"]);
    }

    #[test]
    fn all_unknown_udts_members_pull_median_to_zero() {
        let json = r#"[
            {"symbol": "A", "sector": "Tech",
             "udts": {"monthly": "UP", "weekly": "UP", "daily": "UP", "1hour": "UP", "15min": "UP"}},
            {"symbol": "B", "sector": "Tech",
             "udts": {"monthly": "UNKNOWN", "weekly": "UNKNOWN", "daily": "UNKNOWN",
                      "1hour": "UNKNOWN", "15min": "UNKNOWN"}},
            {"symbol": "C", "sector": "Tech",
             "udts": {"monthly": "UNKNOWN", "weekly": "UNKNOWN", "daily": "UNKNOWN",
                      "1hour": "UNKNOWN", "15min": "UNKNOWN"}},
            {"symbol": "D", "sector": "Tech"}
        ]"#;
        let snapshot = JsonSnapshotAdapter::parse(json, "inline").unwrap();
        let groups = summarise_groups(&snapshot.stocks, GroupKey::Sector);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].member_count, 3);
        assert_relative_eq!(groups[0].median_score, 0.0);

        let trends = aggregate(&snapshot.stocks, GroupKey::Sector, 5);
        assert!(trends.up_trends.is_empty());
        assert!(trends.down_trends.is_empty());
    }

    #[test]
    fn group_members_match_exact_name() {
        let snapshot = sample_snapshot();
        assert!(group_members(&snapshot.stocks, GroupKey::Sector, "tech").is_empty());
        assert_eq!(
            group_members(&snapshot.stocks, GroupKey::Industry, "IT Services").len(),
            2
        );
    }
}

mod full_pipeline {
    use super::*;

    #[test]
    fn mock_port_feeds_projection_and_counts() {
        let port = MockSnapshotPort::new(sample_snapshot().stocks);
        let snapshot = port.load_snapshot().unwrap();
        assert_eq!(port.loads.get(), 1);

        let index = ReferenceIndex::nifty50();
        let view = ViewState::default().with_membership(MembershipFilter::Member);
        let projection = project(&snapshot, &view, &index, 2);
        assert_eq!(projection.total, 6);
        assert_eq!(projection.filtered_count, 3);
        assert_eq!(symbols(projection.rows.iter().copied()), vec!["TCS", "INFY"]);
        assert!(projection.is_truncated());

        let counts = SummaryCounts::compute(&snapshot, &view, &index);
        assert_eq!(counts.total, 6);
        assert_eq!(counts.members, 3);
        assert_eq!(counts.non_members, 3);
        assert_eq!(counts.triple_up, 2);
        assert_eq!(counts.triple_down, 1);
        assert_eq!(counts.triple, 3);
        assert_eq!(counts.all_up, 1);
        assert_eq!(counts.all_down, 1);
        assert_eq!(counts.filtered, 3);
    }

    #[test]
    fn all_down_quadrant_end_to_end() {
        let port = MockSnapshotPort::new(sample_snapshot().stocks);
        let snapshot = port.load_snapshot().unwrap();
        let view = ViewState::default().with_quadrant(Quadrant::AllDown);
        let projection = project(&snapshot, &view, &ReferenceIndex::empty(), 100);
        assert_eq!(symbols(projection.rows), vec!["ONGC"]);
    }

    #[test]
    fn filtered_rows_are_a_subset_of_the_snapshot() {
        let snapshot = sample_snapshot();
        let view = ViewState::default().with_criteria(
            FilterCriteria::blank()
                .with_sector("tech")
                .with_range(RangeField::Score, "70", ""),
        );
        let projection = project(&snapshot, &view, &ReferenceIndex::nifty50(), 100);
        assert_eq!(projection.filtered_count, 3);
        for row in &projection.rows {
            assert!(snapshot.stocks.iter().any(|r| r.symbol == row.symbol));
        }
    }

    #[test]
    fn empty_snapshot_yields_empty_views() {
        let port = MockSnapshotPort::new(Vec::new());
        let snapshot = port.load_snapshot().unwrap();
        let projection = project(&snapshot, &ViewState::default(), &ReferenceIndex::nifty50(), 10);
        assert!(projection.rows.is_empty());
        assert!(!projection.is_truncated());
        let trends = aggregate(&snapshot.stocks, GroupKey::Sector, 5);
        assert!(trends.up_trends.is_empty() && trends.down_trends.is_empty());
    }

    #[test]
    fn port_failure_surfaces_as_snapshot_error() {
        let port = MockSnapshotPort::failing("upstream offline");
        let err = port.load_snapshot().unwrap_err();
        assert!(matches!(err, ScreenerError::Snapshot { ref reason } if reason == "upstream offline"));
    }
}
