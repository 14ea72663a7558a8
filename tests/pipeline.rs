use std::io::Write;
use std::sync::Arc;

use serp_landscape::data::{Classification, DatasetCache, FilterParams, SerpLoader, UNKNOWN_STATE};
use serp_landscape::stats::{BrandSource, Metric, ViewMode, ViewResult};
use serp_landscape::{compute_view, DashboardParams};

const HEADER: &str = "state,keyword,position,classification,url,real_brands,sweeps_brands\n";

fn write_csv(rows: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    file.write_all(HEADER.as_bytes()).unwrap();
    file.write_all(rows.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn params(view: ViewMode, metric: Metric, lo: i64, hi: i64) -> DashboardParams {
    DashboardParams {
        filter: FilterParams::default().with_position_range(lo, hi),
        metric,
        view,
    }
}

fn sample_file() -> tempfile::NamedTempFile {
    write_csv(
        "CA,best online casino,1,Real,https://a.example,\"BetMGM, FanDuel\",\n\
         CA,best online casino,2,Sweeps,https://b.example,,\"Chumba, Pulsz\"\n\
         CA,best online casino,3,Both,https://c.example,BetMGM,Chumba\n\
         CA,sweepstakes casino,1,Sweeps,https://d.example,,Chumba\n\
         NY,best online casino,1,Real,https://e.example,\"Caesars, BetMGM\",\n\
         NY,best online casino,4,,https://f.example,,\n\
         ,free slots,2,Other,https://g.example,,\n\
         NY,poker sites,,Real,https://h.example,PokerStars,\n",
    )
}

#[test]
fn out_of_range_row_is_excluded_from_state_share() {
    let file = write_csv(
        "CA,k1,1,Real,https://a.example,,\n\
         CA,k1,11,Sweeps,https://b.example,,\n",
    );
    let records = SerpLoader::load_csv(file.path()).unwrap();

    let view = compute_view(&records, &params(ViewMode::Overview, Metric::RawCount, 1, 10));
    assert_eq!(view.matched, 1);
    assert_eq!(view.total, 2);

    let ViewResult::Overview(summary) = view.result else {
        panic!("expected overview");
    };
    assert_eq!(summary.rows.len(), 1);
    assert_eq!(summary.share("CA", Classification::Real), Some(100.0));
    assert_eq!(summary.share("CA", Classification::Sweeps), None);
}

#[test]
fn overview_shares_sum_per_state() {
    let file = sample_file();
    let records = SerpLoader::load_csv(file.path()).unwrap();

    for metric in [Metric::RawCount, Metric::PositionWeighted] {
        let view = compute_view(&records, &params(ViewMode::Overview, metric, 1, 10));
        let ViewResult::Overview(summary) = view.result else {
            panic!("expected overview");
        };

        assert_eq!(
            summary.states(),
            vec!["CA".to_string(), "NY".to_string(), UNKNOWN_STATE.to_string()]
        );
        for state in summary.states() {
            let sum: f64 = summary
                .rows
                .iter()
                .filter(|r| r.state == state)
                .map(|r| r.share)
                .sum();
            assert!((sum - 100.0).abs() <= 0.1 + 1e-9, "{metric:?} {state}: {sum}");
        }
    }
}

#[test]
fn weighted_overview_for_new_york() {
    let file = sample_file();
    let records = SerpLoader::load_csv(file.path()).unwrap();

    let view = compute_view(
        &records,
        &params(ViewMode::Overview, Metric::PositionWeighted, 1, 4),
    );
    let ViewResult::Overview(summary) = view.result else {
        panic!("expected overview");
    };

    // NY: Real at position 1 (weight 10), missing classification at 4 (weight 7).
    assert_eq!(summary.share("NY", Classification::Real), Some(58.8));
    assert_eq!(summary.share("NY", Classification::Other), Some(41.2));
}

#[test]
fn brand_breakdown_counts_filtered_records() {
    let file = sample_file();
    let records = SerpLoader::load_csv(file.path()).unwrap();

    let mut p = params(ViewMode::BrandBreakdown, Metric::RawCount, 1, 10);
    p.filter = p.filter.with_states(["CA"]);
    let view = compute_view(&records, &p);
    let ViewResult::BrandBreakdown(breakdown) = view.result else {
        panic!("expected brand breakdown");
    };

    let real: Vec<(&str, u64)> = breakdown
        .real
        .iter()
        .map(|b| (b.brand.as_str(), b.count))
        .collect();
    assert_eq!(real, vec![("BetMGM", 2), ("FanDuel", 1)]);

    let sweeps: Vec<(&str, u64)> = breakdown
        .sweeps
        .iter()
        .map(|b| (b.brand.as_str(), b.count))
        .collect();
    assert_eq!(sweeps, vec![("Chumba", 3), ("Pulsz", 1)]);

    assert_eq!(breakdown.combined[0].brand, "Chumba");
    assert_eq!(breakdown.combined[0].source, BrandSource::Sweeps);
    assert_eq!(breakdown.combined.len(), 4);
}

#[test]
fn keyword_detail_respects_keyword_filter() {
    let file = sample_file();
    let records = SerpLoader::load_csv(file.path()).unwrap();

    let mut p = params(ViewMode::KeywordDetail, Metric::RawCount, 1, 10);
    p.filter = p.filter.with_keyword("ONLINE");
    let view = compute_view(&records, &p);
    let ViewResult::KeywordDetail(detail) = view.result else {
        panic!("expected keyword detail");
    };

    assert_eq!(detail.keywords(), vec!["best online casino".to_string()]);
    // Real 10 + 10, Sweeps 9, Both 8, Other 7 of 44.
    let shares: Vec<(Classification, f64)> = detail
        .rows
        .iter()
        .map(|r| (r.classification, r.share))
        .collect();
    assert_eq!(
        shares,
        vec![
            (Classification::Real, 45.5),
            (Classification::Sweeps, 20.5),
            (Classification::Both, 18.2),
            (Classification::Other, 15.9),
        ]
    );
    let sum: f64 = detail.rows.iter().map(|r| r.share).sum();
    assert!((sum - 100.0).abs() <= 0.2 + 1e-9);
    assert!(!detail.rounding_warning);
}

#[test]
fn serp_table_is_sorted_and_drops_missing_positions() {
    let file = sample_file();
    let records = SerpLoader::load_csv(file.path()).unwrap();

    let view = compute_view(&records, &params(ViewMode::SerpTable, Metric::RawCount, 1, 10));
    let ViewResult::SerpTable(rows) = &view.result else {
        panic!("expected serp table");
    };

    assert_eq!(rows.len(), 7);
    assert!(rows.iter().all(|r| r.position.is_some()));
    let first: Vec<(&str, &str, Option<i64>)> = rows
        .iter()
        .take(3)
        .map(|r| (r.state.as_str(), r.keyword.as_str(), r.position))
        .collect();
    assert_eq!(
        first,
        vec![
            ("CA", "best online casino", Some(1)),
            ("CA", "best online casino", Some(2)),
            ("CA", "best online casino", Some(3)),
        ]
    );

    let table = view.result.to_table();
    assert_eq!(table.rows.len(), 7);
    assert_eq!(table.headers[3], "position_weight");
    assert_eq!(table.rows[0][3], "10");
}

#[test]
fn recomputing_leaves_record_set_untouched() {
    let file = sample_file();
    let mut cache = DatasetCache::new();
    let records = cache.get_or_load(file.path()).unwrap();
    let before = records.records().to_vec();

    let p = params(ViewMode::Overview, Metric::PositionWeighted, 2, 3);
    let first = compute_view(&records, &p);
    let second = compute_view(&records, &p);

    assert_eq!(first, second);
    assert_eq!(records.records(), before.as_slice());
    assert!(Arc::ptr_eq(&records, &cache.get_or_load(file.path()).unwrap()));
}
