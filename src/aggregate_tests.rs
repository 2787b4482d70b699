use super::*;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn record(expected: &str, report: &str, present: u8) -> MatchRecord {
    MatchRecord {
        expected_name: expected.to_string(),
        report_name: report.to_string(),
        present,
    }
}

#[test]
fn zeroed_matrix_is_dense() {
    let matrix = PresenceMatrix::zeroed(&names(&["X", "Y", "Z"]), names(&["A", "B"]));

    assert_eq!(matrix.row_count(), 3);
    assert_eq!(matrix.columns(), ["A", "B"]);
    assert!(matrix.rows().all(|(_, values)| values == [0, 0]));
}

#[test]
fn rows_keep_configured_order() {
    let matrix = PresenceMatrix::zeroed(&names(&["Y", "X"]), names(&["A"]));
    let order: Vec<_> = matrix.rows().map(|(name, _)| name).collect();

    assert_eq!(order, ["Y", "X"]);
}

#[test]
fn duplicate_names_collapse() {
    let matrix = PresenceMatrix::zeroed(&names(&["X", "Y", "X"]), names(&["A"]));

    assert_eq!(matrix.row_count(), 2);
}

#[test]
fn build_matrix_places_values_by_branch_index() {
    let matrix = build_matrix(
        &names(&["X", "Y"]),
        &names(&["A", "B"]),
        vec![
            Some(vec![record("X", "A", 1), record("Y", "A", 0)]),
            Some(vec![record("X", "B", 0), record("Y", "B", 1)]),
        ],
    );

    assert_eq!(matrix.get("X", "A"), Some(1));
    assert_eq!(matrix.get("Y", "A"), Some(0));
    assert_eq!(matrix.get("X", "B"), Some(0));
    assert_eq!(matrix.get("Y", "B"), Some(1));
}

#[test]
fn missing_branch_records_stay_zero() {
    let matrix = build_matrix(
        &names(&["X"]),
        &names(&["A", "B"]),
        vec![None, Some(vec![record("X", "B", 1)])],
    );

    assert_eq!(matrix.get("X", "A"), Some(0));
    assert_eq!(matrix.get("X", "B"), Some(1));
}

#[test]
fn unknown_names_and_columns_are_ignored() {
    let mut matrix = PresenceMatrix::zeroed(&names(&["X"]), names(&["A"]));
    matrix.set("nobody", 0, 1);
    matrix.set("X", 5, 1);

    assert_eq!(matrix.get("X", "A"), Some(0));
    assert_eq!(matrix.get("nobody", "A"), None);
    assert_eq!(matrix.get("X", "missing"), None);
}

#[test]
fn cell_values_are_clamped_to_one() {
    let mut matrix = PresenceMatrix::zeroed(&names(&["X"]), names(&["A"]));
    matrix.set("X", 0, 7);

    assert_eq!(matrix.get("X", "A"), Some(1));
}

#[test]
fn records_flatten_row_major() {
    let mut matrix = PresenceMatrix::zeroed(&names(&["X", "Y"]), names(&["A", "B"]));
    matrix.set("Y", 0, 1);

    let records = matrix.records();

    assert_eq!(
        records,
        vec![
            record("X", "A", 0),
            record("X", "B", 0),
            record("Y", "A", 1),
            record("Y", "B", 0),
        ]
    );
}

fn check(unit: &str, location: &str) -> CheckRecord {
    CheckRecord {
        unit: unit.to_string(),
        supervisor: "S".to_string(),
        category: "Checks".to_string(),
        location: location.to_string(),
        video_present: 0,
    }
}

#[test]
fn concat_inspection_keeps_unit_order_and_skips_failures() {
    let first = InspectionReport {
        checks: vec![check("U1", "a"), check("U1", "b")],
        materials: Vec::new(),
    };
    let third = InspectionReport {
        checks: vec![check("U3", "c")],
        materials: vec![MaterialsRecord {
            unit: "U3".to_string(),
            supervisor: "S".to_string(),
            category: "Docs".to_string(),
            materials_present: 1,
        }],
    };

    let combined = concat_inspection(vec![Some(first), None, Some(third)]);

    let locations: Vec<_> = combined.checks.iter().map(|c| c.location.as_str()).collect();
    assert_eq!(locations, ["a", "b", "c"]);
    assert_eq!(combined.materials.len(), 1);
}

#[test]
fn run_report_accessors() {
    let report = RunReport::new(
        RunResult::Inspection(InspectionReport::default()),
        "inspection".to_string(),
        Duration::from_millis(5),
        vec![BranchFailure {
            branch: "U2".to_string(),
            message: "boom".to_string(),
        }],
    );

    assert_eq!(report.artifact(), "inspection");
    assert_eq!(report.elapsed(), Duration::from_millis(5));
    assert!(report.has_failures());
    assert_eq!(report.failures()[0].branch, "U2");
}
