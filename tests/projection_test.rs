use geo::{Coord, MultiPolygon, polygon};
use tract_access::{AlbersEqualArea, AlbersParams, Crs, PipelineError, TractGeometry};
use tract_access::models::ClinicianLocation;

fn projection() -> AlbersEqualArea {
    AlbersEqualArea::new(AlbersParams::default())
}

fn square_tract(tract_id: &str, center_lon: f64, center_lat: f64, half_deg: f64) -> TractGeometry {
    let poly = polygon![
        (x: center_lon - half_deg, y: center_lat - half_deg),
        (x: center_lon + half_deg, y: center_lat - half_deg),
        (x: center_lon + half_deg, y: center_lat + half_deg),
        (x: center_lon - half_deg, y: center_lat + half_deg),
        (x: center_lon - half_deg, y: center_lat - half_deg),
    ];
    TractGeometry {
        tract_id: tract_id.to_string(),
        geometry: MultiPolygon::new(vec![poly]),
        crs: Crs::Nad83,
    }
}

fn clinician(address_id: &str, lat: f64, lon: f64, count: u32) -> ClinicianLocation {
    ClinicianLocation {
        address_id: address_id.to_string(),
        organization_id: Some(format!("org-{address_id}")),
        clinician_id: None,
        name: "Test Clinic".to_string(),
        latitude: lat,
        longitude: lon,
        clinician_count: count,
    }
}

#[test]
fn buffers_valid_tracts_and_skips_empty_geometry() {
    let tracts = vec![
        square_tract("13121006500", -84.4, 33.75, 0.05),
        TractGeometry {
            tract_id: "13121006600".to_string(),
            geometry: MultiPolygon::new(vec![]),
            crs: Crs::Nad83,
        },
    ];

    let buffered = projection().buffer_tracts(&tracts, 25_000.0).unwrap();

    assert_eq!(buffered.tracts.len(), 1);
    assert_eq!(buffered.skipped, 1);
    assert_eq!(buffered.crs, Crs::ConusAlbers);
    assert_eq!(buffered.tracts[0].tract_id(), "13121006500");
    assert!(buffered.tract_ids().contains("13121006500"));
    assert!(!buffered.tract_ids().contains("13121006600"));
}

#[test]
fn skips_tracts_with_non_finite_coordinates() {
    let poly = polygon![
        (x: -84.45, y: 33.70),
        (x: f64::NAN, y: 33.70),
        (x: -84.35, y: 33.80),
        (x: -84.45, y: 33.70),
    ];
    let tract = TractGeometry {
        tract_id: "13121006500".to_string(),
        geometry: MultiPolygon::new(vec![poly]),
        crs: Crs::Nad83,
    };

    let buffered = projection().buffer_tracts(&[tract], 25_000.0).unwrap();
    assert!(buffered.tracts.is_empty());
    assert_eq!(buffered.skipped, 1);
}

#[test]
fn planar_tagged_tracts_are_a_fatal_crs_mismatch() {
    let mut tract = square_tract("13121006500", -84.4, 33.75, 0.05);
    tract.crs = Crs::ConusAlbers;

    let result = projection().buffer_tracts(&[tract], 25_000.0);
    assert!(matches!(result, Err(PipelineError::CrsMismatch { .. })));
}

#[test]
fn projects_clinicians_and_skips_invalid_coordinates() {
    let locations = vec![
        clinician("a1", 33.75, -84.4, 12),
        clinician("a2", f64::NAN, -84.4, 3),
        clinician("a3", 91.0, -84.4, 5),
    ];

    let projected = projection().project_clinicians(&locations);

    assert_eq!(projected.points.len(), 1);
    assert_eq!(projected.skipped, 2);
    assert_eq!(projected.points[0].count, 12);
    assert_eq!(projected.crs, Crs::ConusAlbers);
}

#[test]
fn projection_preserves_metric_distances_at_buffer_scale() {
    let proj = projection();
    // Two points 0.225 degrees of latitude apart: almost exactly 25 km.
    let a = proj.forward(Coord { x: -84.4, y: 33.75 });
    let b = proj.forward(Coord { x: -84.4, y: 33.975 });
    let planar = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();

    assert!((planar - 25_019.0).abs() < 400.0, "planar distance {planar}");
}
