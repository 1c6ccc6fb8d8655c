use tract_access::{
    GroupKey, Indicator, PipelineError, TractAttributes, TractRecord, TractTable,
    VulnerabilityLabel, aggregate_by_group, national_average, percentile_thresholds,
};

fn record(tract_id: &str, state: &str, income: Option<f64>, clinicians: u64) -> TractRecord {
    TractRecord {
        attributes: TractAttributes {
            tract_id: tract_id.to_string(),
            state: state.to_string(),
            median_household_income: income,
            median_home_price: None,
            income_disparity: None,
            unemployment_rate: None,
            pct_uninsured: None,
            pct_disabled: None,
            pct_no_vehicle: None,
            pct_non_white: None,
            pct_rent_burdened: None,
            pct_single_parent: None,
        },
        total_clinicians: clinicians,
        cluster: None,
    }
}

#[test]
fn group_mean_excludes_missing_from_sum_and_divisor() {
    let table = TractTable::from_rows(vec![
        record("T1", "GA", Some(10.0), 0),
        record("T2", "GA", Some(20.0), 0),
        record("T3", "GA", None, 0),
        record("T4", "GA", Some(30.0), 0),
    ]);

    let means =
        aggregate_by_group(&table, GroupKey::State, Indicator::MedianHouseholdIncome).unwrap();

    // Divisor is 3, not 4: the missing estimate is excluded entirely.
    assert_eq!(means.get("GA"), Some(&20.0));
}

#[test]
fn state_and_national_means_over_two_states() {
    let table = TractTable::from_rows(vec![
        record("A1", "GA", Some(5.0), 0),
        record("A2", "GA", Some(15.0), 0),
        record("A3", "GA", None, 0),
        record("A4", "GA", Some(25.0), 0),
        record("B1", "AL", Some(10.0), 0),
        record("B2", "AL", Some(20.0), 0),
    ]);

    let means =
        aggregate_by_group(&table, GroupKey::State, Indicator::MedianHouseholdIncome).unwrap();
    assert_eq!(means.get("GA"), Some(&15.0));
    assert_eq!(means.get("AL"), Some(&15.0));

    let national = national_average(&table, Indicator::MedianHouseholdIncome).unwrap();
    assert_eq!(national, 15.0);
}

#[test]
fn empty_group_is_an_error_not_nan() {
    let table = TractTable::from_rows(vec![
        record("T1", "GA", Some(10.0), 0),
        record("T2", "WY", None, 0),
    ]);

    let result = aggregate_by_group(&table, GroupKey::State, Indicator::MedianHouseholdIncome);
    assert!(matches!(result, Err(PipelineError::EmptyGroup(g)) if g == "WY"));
}

#[test]
fn national_average_over_empty_table_is_an_error() {
    let table = TractTable::from_rows(vec![]);
    let result = national_average(&table, Indicator::MedianHouseholdIncome);
    assert!(matches!(result, Err(PipelineError::EmptyGroup(_))));
}

#[test]
fn cluster_grouping_excludes_undefined_tracts() {
    let mut low = record("T1", "GA", Some(80_000.0), 40);
    low.cluster = Some(VulnerabilityLabel::LowVulnerability);
    let mut high = record("T2", "GA", Some(20_000.0), 2);
    high.cluster = Some(VulnerabilityLabel::HighVulnerability);
    let undefined = record("T3", "GA", Some(999_999.0), 0);

    let table = TractTable::from_rows(vec![low, high, undefined]);
    let means =
        aggregate_by_group(&table, GroupKey::Cluster, Indicator::MedianHouseholdIncome).unwrap();

    assert_eq!(means.len(), 2);
    assert_eq!(means.get("Low Vulnerability"), Some(&80_000.0));
    assert_eq!(means.get("High Vulnerability"), Some(&20_000.0));
}

#[test]
fn clinician_counts_group_by_state() {
    let table = TractTable::from_rows(vec![
        record("T1", "GA", None, 10),
        record("T2", "GA", None, 30),
        record("T3", "AL", None, 4),
    ]);

    let means = aggregate_by_group(&table, GroupKey::State, Indicator::TotalClinicians).unwrap();
    assert_eq!(means.get("GA"), Some(&20.0));
    assert_eq!(means.get("AL"), Some(&4.0));
}

#[test]
fn display_thresholds_follow_the_breakpoints() {
    let rows: Vec<TractRecord> = (0u64..101)
        .map(|i| record(&format!("T{i}"), "GA", None, i))
        .collect();
    let table = TractTable::from_rows(rows);

    let thresholds =
        percentile_thresholds(&table, Indicator::TotalClinicians, &[0.25, 0.5, 0.75]).unwrap();

    assert_eq!(thresholds, vec![0.0, 1.0, 25.0, 50.0, 75.0, 100.0]);
}

#[test]
fn non_increasing_breakpoints_are_rejected() {
    let table = TractTable::from_rows(vec![record("T1", "GA", None, 3)]);

    let result = percentile_thresholds(&table, Indicator::TotalClinicians, &[0.5, 0.25]);
    assert!(matches!(result, Err(PipelineError::InvalidInput(_))));

    let result = percentile_thresholds(&table, Indicator::TotalClinicians, &[0.0, 0.5]);
    assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
}
