//! Pipeline composition tests: scenario runs through layer building,
//! orchestrated by hand the way wn-app does it.

use std::collections::BTreeMap;

use wn_impact::{
    build_layers, build_report, diff_snapshots, run_scenario, HydraulicSolver, PressureSeries,
    ScalarField, Scenario, ServiceTier, SolveError, Thresholds,
};
use wn_model::NetworkModel;

const DEMO: &str = "\
[JUNCTIONS]
 J1  50  10
 J2  45  10

[RESERVOIRS]
 R1  100

[PIPES]
 P1  R1  J1  100  300  130
 P2  J1  J2  200  200  130

[COORDINATES]
 J1  100  200
 J2  200  200

[END]
";

struct CannedSolver {
    series: PressureSeries,
}

impl HydraulicSolver for CannedSolver {
    fn simulate(&self, _model: &NetworkModel) -> Result<PressureSeries, SolveError> {
        Ok(self.series.clone())
    }
}

fn series(entries: &[(u32, &str, f64)]) -> PressureSeries {
    let mut s = PressureSeries::new();
    for &(t, id, p) in entries {
        s.insert(t, id, p);
    }
    s
}

#[test]
fn both_runs_fall_back_to_the_same_earliest_instant() {
    let model = NetworkModel::parse(DEMO).unwrap();
    // Neither series samples the requested 3600 s; earliest is 0 s.
    let base_solver = CannedSolver {
        series: series(&[(0, "J1", 40.0), (0, "J2", 30.0)]),
    };
    let closed_solver = CannedSolver {
        series: series(&[(0, "J1", 40.0), (0, "J2", 2.0)]),
    };

    let base = run_scenario(&base_solver, &model, Scenario::Baseline, 3600).unwrap();
    assert!(base.time_fallback());
    assert_eq!(base.used_time_s, 0);

    // The intervention is requested at the baseline's resolved instant,
    // so the two snapshots line up.
    let closed = run_scenario(
        &closed_solver,
        &model,
        Scenario::LinkClosed {
            link_id: "P2".into(),
        },
        base.used_time_s,
    )
    .unwrap();
    assert_eq!(closed.used_time_s, base.used_time_s);
    assert!(!closed.time_fallback());

    let diff = diff_snapshots(&base, &closed);
    assert!(diff.time_fallback);
    assert_eq!(diff.used_time_s, 0);
    assert_eq!(diff.requested_time_s, 3600);

    let summary = build_report(&diff, &Thresholds::default(), 20, &model.coordinate_map());
    assert!(summary.time_fallback);
    assert_eq!(summary.all_nodes[0].node_id, "J2");
    assert_eq!(summary.all_nodes[0].drop_m, Some(28.0));
}

#[test]
fn layers_follow_the_report_records() {
    let model = NetworkModel::parse(DEMO).unwrap();
    let base = run_scenario(
        &CannedSolver {
            series: series(&[(3600, "J1", 45.0), (3600, "J2", 35.0), (3600, "R1", 0.0)]),
        },
        &model,
        Scenario::Baseline,
        3600,
    )
    .unwrap();
    let closed = run_scenario(
        &CannedSolver {
            series: series(&[(3600, "J1", 44.0), (3600, "J2", -8.0), (3600, "R1", 0.0)]),
        },
        &model,
        Scenario::LinkClosed {
            link_id: "P2".into(),
        },
        base.used_time_s,
    )
    .unwrap();

    let diff = diff_snapshots(&base, &closed);
    let summary = build_report(&diff, &Thresholds::default(), 20, &model.coordinate_map());
    let layers = build_layers(&summary.all_nodes, ScalarField::ClosedPressureM);

    // R1 has no coordinates and is absent from both layers.
    assert_eq!(layers.continuous.points.len(), 2);
    let tiers: Vec<ServiceTier> = layers.categorical.groups.iter().map(|g| g.tier).collect();
    assert_eq!(tiers, vec![ServiceTier::Dead, ServiceTier::Ok]);

    // But it is still in the tabular report.
    assert!(summary.all_nodes.iter().any(|r| r.node_id == "R1"));
}

#[test]
fn node_missing_from_one_run_ends_up_unknown() {
    let model = NetworkModel::parse(DEMO).unwrap();
    let base = run_scenario(
        &CannedSolver {
            series: series(&[(0, "J1", 40.0), (0, "J2", 30.0)]),
        },
        &model,
        Scenario::Baseline,
        0,
    )
    .unwrap();
    let closed = run_scenario(
        &CannedSolver {
            series: series(&[(0, "J1", 39.0)]),
        },
        &model,
        Scenario::LinkClosed {
            link_id: "P2".into(),
        },
        0,
    )
    .unwrap();

    let diff = diff_snapshots(&base, &closed);
    let summary = build_report(&diff, &Thresholds::default(), 20, &BTreeMap::new());
    let j2 = summary.all_nodes.iter().find(|r| r.node_id == "J2").unwrap();
    assert_eq!(j2.status, ServiceTier::Unknown);
    assert_eq!(j2.pressure_closed_m, None);
    assert_eq!(j2.drop_m, None);
    // Unknown node contributes nothing to the closed/drop means.
    assert_eq!(summary.mean_closed_m, Some(39.0));
}
