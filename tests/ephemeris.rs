mod common;

use approx::assert_relative_eq;
use common::{constant_de406, CatalogDir};
use nalgebra::Vector3;
use orrery::catalog_errors::CatalogError;
use orrery::jpl_ephem::jpl_ids::JplObjectId;
use orrery::jpl_ephem::JplEphemeris;
use orrery::UniverseCatalog;
use serde_json::json;

const START_JD: f64 = 2451536.5;

#[test]
fn decoded_series_evaluate_to_slot_positions() {
    let dir = CatalogDir::new();
    let path = dir.write_bytes("de406.dat", &constant_de406(START_JD, 32.0, 4, 5));
    let ephemeris = JplEphemeris::load(&path).unwrap();

    assert_eq!(ephemeris.record_count(), 4);
    assert_relative_eq!(ephemeris.start_jd(), START_JD);
    assert_relative_eq!(ephemeris.end_jd(), START_JD + 128.0);
    assert_relative_eq!(ephemeris.earth_moon_mass_ratio(), 81.30056);

    let mars = ephemeris.trajectory(JplObjectId::Mars).unwrap();
    assert_eq!(mars.degree(), 4);
    assert_eq!(mars.granule_count(), 4);
    for t in [0.0, 40.0 * 86_400.0, 100.0 * 86_400.0] {
        let position = mars.state(t).position;
        assert_relative_eq!(position, Vector3::new(4000.0, -4000.0, 40.0), epsilon = 1e-9);
    }

    let sun = ephemeris.trajectory(JplObjectId::Sun).unwrap();
    assert_relative_eq!(sun.state(0.0).position.x, 11_000.0, epsilon = 1e-9);
}

#[test]
fn truncated_images_are_rejected() {
    let bytes = constant_de406(START_JD, 32.0, 3, 4);
    let cut = &bytes[..bytes.len() - 8];
    assert!(matches!(
        JplEphemeris::from_bytes(cut),
        Err(CatalogError::TruncatedEphemeris(_))
    ));
    assert!(matches!(
        JplEphemeris::from_bytes(&bytes[..100]),
        Err(CatalogError::TruncatedEphemeris(_))
    ));
}

#[test]
fn ephemeris_orbits_back_builtin_trajectories() {
    let ephemeris = JplEphemeris::from_bytes(&constant_de406(START_JD, 32.0, 2, 3)).unwrap();
    let mut loader = orrery::UniverseLoader::new();
    loader.add_ephemeris_orbits(&ephemeris);

    let contents = json!({
        "version": "1.0",
        "items": [
            { "name": "Sun", "center": "Sun" },
            { "name": "Mars", "center": "Sun",
              "trajectory": { "type": "Builtin", "name": "Mars" } },
            { "name": "Vulcan", "center": "Sun",
              "trajectory": { "type": "Builtin", "name": "Vulcan" } }
        ]
    });
    let mut catalog = UniverseCatalog::new();
    let names = loader.load_catalog_items(contents.as_object().unwrap(), &mut catalog);
    assert_eq!(names, ["Sun", "Mars"]);

    let mars = catalog.find("Mars").unwrap();
    let state = mars.borrow().relative_state(0.0).unwrap();
    assert_relative_eq!(state.position, Vector3::new(4000.0, -4000.0, 40.0), epsilon = 1e-9);
    assert_relative_eq!(state.velocity.norm(), 0.0, epsilon = 1e-12);

    assert_eq!(
        loader.messages(),
        [
            "Item 'Vulcan': Builtin trajectory 'Vulcan' not found",
            "Item 'Vulcan': Skipping body 'Vulcan' because of errors.",
        ]
    );

    loader.remove_builtin_orbit("Mars");
    loader.clear_message_log();
    loader.load_catalog_items(contents.as_object().unwrap(), &mut catalog);
    assert_eq!(loader.messages().len(), 4);
    // The previous definition stays in place.
    assert!(catalog.find("Mars").unwrap().borrow().relative_state(0.0).is_some());
}
