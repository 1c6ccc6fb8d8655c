use geo::{MultiPolygon, polygon};
use tract_access::{
    ClinicianLocation, Crs, GroupKey, Indicator, PipelineConfig, Result, TractAttributes,
    TractDataSource, TractGeometry, VulnerabilityLabel, aggregate_by_group, national_average,
    run,
};

/// In-memory data source: a compact metro area with clinicians and a remote
/// rural area with none.
struct SyntheticSource {
    locations: Vec<ClinicianLocation>,
    geometries: Vec<TractGeometry>,
    attributes: Vec<TractAttributes>,
}

impl TractDataSource for SyntheticSource {
    fn clinician_locations(&self) -> Result<Vec<ClinicianLocation>> {
        Ok(self.locations.clone())
    }

    fn tract_geometries(&self) -> Result<Vec<TractGeometry>> {
        Ok(self.geometries.clone())
    }

    fn tract_attributes(&self) -> Result<Vec<TractAttributes>> {
        Ok(self.attributes.clone())
    }
}

fn square(tract_id: &str, center_lon: f64, center_lat: f64) -> TractGeometry {
    let half = 0.01;
    let poly = polygon![
        (x: center_lon - half, y: center_lat - half),
        (x: center_lon + half, y: center_lat - half),
        (x: center_lon + half, y: center_lat + half),
        (x: center_lon - half, y: center_lat + half),
        (x: center_lon - half, y: center_lat - half),
    ];
    TractGeometry {
        tract_id: tract_id.to_string(),
        geometry: MultiPolygon::new(vec![poly]),
        crs: Crs::Nad83,
    }
}

fn attributes(tract_id: &str, state: &str, income: f64, uninsured: f64) -> TractAttributes {
    TractAttributes {
        tract_id: tract_id.to_string(),
        state: state.to_string(),
        median_household_income: Some(income),
        median_home_price: None,
        income_disparity: None,
        unemployment_rate: None,
        pct_uninsured: Some(uninsured),
        pct_disabled: None,
        pct_no_vehicle: None,
        pct_non_white: None,
        pct_rent_burdened: None,
        pct_single_parent: None,
    }
}

fn synthetic_source() -> SyntheticSource {
    let mut geometries = Vec::new();
    let mut attrs = Vec::new();
    let mut locations = Vec::new();

    // Metro tracts around Atlanta, each with a clinic at its center.
    for i in 0..6u32 {
        let jitter = f64::from(i);
        let lon = -84.4 + 0.02 * jitter;
        let id = format!("1312100650{i}");
        geometries.push(square(&id, lon, 33.75));
        attrs.push(attributes(&id, "GA", 85_000.0 + 500.0 * jitter, 5.0 + 0.1 * jitter));
        locations.push(ClinicianLocation {
            address_id: format!("adrs-{i}"),
            organization_id: Some(format!("org-{i}")),
            clinician_id: None,
            name: format!("Metro Clinic {i}"),
            latitude: 33.75,
            longitude: lon,
            clinician_count: 50 + i,
        });
    }

    // Rural tracts in south Georgia, far beyond any clinic buffer.
    for i in 0..6u32 {
        let jitter = f64::from(i);
        let id = format!("1327700110{i}");
        geometries.push(square(&id, -83.0 + 0.3 * jitter, 31.0));
        attrs.push(attributes(&id, "AL", 22_000.0 + 400.0 * jitter, 23.0 + 0.2 * jitter));
    }

    // A tract whose geometry is unusable and one with no geometry at all.
    geometries.push(TractGeometry {
        tract_id: "13999000000".to_string(),
        geometry: MultiPolygon::new(vec![]),
        crs: Crs::Nad83,
    });
    attrs.push(attributes("13999000000", "GA", 40_000.0, 12.0));
    attrs.push(attributes("13999000001", "GA", 41_000.0, 12.0));

    // A clinician record with broken geocoding.
    locations.push(ClinicianLocation {
        address_id: "adrs-bad".to_string(),
        organization_id: None,
        clinician_id: Some("npi-1".to_string()),
        name: "Ungeocoded Clinic".to_string(),
        latitude: f64::NAN,
        longitude: -84.0,
        clinician_count: 9,
    });

    SyntheticSource {
        locations,
        geometries,
        attributes: attrs,
    }
}

fn config() -> PipelineConfig {
    PipelineConfig {
        cluster_features: vec![
            Indicator::MedianHouseholdIncome,
            Indicator::PctUninsured,
            Indicator::TotalClinicians,
        ],
        seed: 11,
        ..PipelineConfig::default()
    }
}

#[test]
fn end_to_end_run_produces_labeled_table_and_report() {
    tract_access::utils::init_logging();
    let outcome = run(&synthetic_source(), &config()).unwrap();

    // Both phantom tracts are excluded; the twelve real ones survive.
    assert_eq!(outcome.table.len(), 12);
    assert!(outcome.table.get("13999000000").is_none());
    assert!(outcome.table.get("13999000001").is_none());

    assert_eq!(outcome.report.tracts_buffered, 12);
    assert_eq!(outcome.report.tracts_skipped, 1);
    assert_eq!(outcome.report.points_skipped, 1);
    assert_eq!(outcome.report.merge.dropped_no_geometry, 2);
    assert_eq!(outcome.report.labeled, 12);
    assert_eq!(outcome.report.undefined, 0);

    // Every metro tract reaches all six clinics: 50+51+..+55.
    let expected_metro_count: u64 = (50..56).sum();
    for i in 0..6 {
        let row = outcome.table.get(&format!("1312100650{i}")).unwrap();
        assert_eq!(row.total_clinicians, expected_metro_count);
        assert_eq!(row.cluster, Some(VulnerabilityLabel::LowVulnerability));
    }

    // Rural tracts: measured zero, high vulnerability.
    for i in 0..6 {
        let row = outcome.table.get(&format!("1327700110{i}")).unwrap();
        assert_eq!(row.total_clinicians, 0);
        assert_eq!(row.cluster, Some(VulnerabilityLabel::HighVulnerability));
    }

    // The fitted artifact orders components low-vulnerability first and
    // reports means in original units.
    let [low, high] = outcome.model.component_summaries();
    assert_eq!(low.label, VulnerabilityLabel::LowVulnerability);
    assert_eq!(high.label, VulnerabilityLabel::HighVulnerability);
    let low_access = low.means.iter().find(|(i, _)| *i == Indicator::TotalClinicians).unwrap().1;
    let high_access = high.means.iter().find(|(i, _)| *i == Indicator::TotalClinicians).unwrap().1;
    assert!(low_access > high_access);
}

#[test]
fn outputs_feed_the_statistics_module() {
    let outcome = run(&synthetic_source(), &config()).unwrap();

    let by_state =
        aggregate_by_group(&outcome.table, GroupKey::State, Indicator::TotalClinicians).unwrap();
    assert_eq!(by_state.len(), 2);
    assert_eq!(by_state.get("AL"), Some(&0.0));

    let by_cluster = aggregate_by_group(
        &outcome.table,
        GroupKey::Cluster,
        Indicator::MedianHouseholdIncome,
    )
    .unwrap();
    assert!(
        by_cluster.get("Low Vulnerability").unwrap()
            > by_cluster.get("High Vulnerability").unwrap()
    );

    let national = national_average(&outcome.table, Indicator::TotalClinicians).unwrap();
    let expected_metro_count: f64 = f64::from((50u32..56).sum::<u32>());
    assert!((national - expected_metro_count / 2.0).abs() < 1e-9);
}

#[test]
fn rerunning_the_pipeline_is_deterministic() {
    let source = synthetic_source();
    let cfg = config();

    let first = run(&source, &cfg).unwrap();
    let second = run(&source, &cfg).unwrap();

    assert_eq!(first.table.rows(), second.table.rows());
    assert_eq!(
        serde_json::to_string(&first.table).unwrap(),
        serde_json::to_string(&second.table).unwrap()
    );
}
