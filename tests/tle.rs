use std::io::Cursor;

use approx::assert_relative_eq;
use orrery::trajectories::Trajectory;
use orrery::{BodyHandle, UniverseCatalog, UniverseLoader};
use serde_json::json;

const ISS_LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
const ISS_LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";
const ISS_NEXT_DAY: &str = "1 25544U 98067A   08265.51782528 -.00002182  00000-0 -11606-4 0  2928";

fn tle_epoch(body: &BodyHandle) -> f64 {
    let body = body.borrow();
    match &body.chronology().arcs()[0].trajectory {
        Some(Trajectory::Tle(handle)) => handle.borrow().epoch(),
        other => panic!("expected a TLE trajectory, got {other:?}"),
    }
}

fn stations() -> serde_json::Value {
    json!({
        "version": "1.0",
        "items": [
            { "name": "Earth", "center": "Earth" },
            { "name": "ISS", "center": "Earth", "class": "spacecraft",
              "trajectory": { "type": "TLE", "name": "ISS (ZARYA)", "source": "stations.txt",
                              "line1": ISS_LINE1, "line2": ISS_LINE2 } },
            { "name": "ISS shadow", "center": "Earth",
              "trajectory": { "type": "TLE", "name": "ISS (ZARYA)", "source": "stations.txt",
                              "line1": ISS_LINE1, "line2": ISS_LINE2 } }
        ]
    })
}

fn load_stations(loader: &mut UniverseLoader) -> UniverseCatalog {
    let mut catalog = UniverseCatalog::new();
    loader.load_catalog_items(stations().as_object().unwrap(), &mut catalog);
    assert!(loader.messages().is_empty(), "{}", loader.message_log());
    catalog
}

#[test]
fn streamed_tle_set_updates_every_instance() {
    let mut loader = UniverseLoader::new();
    let catalog = load_stations(&mut loader);
    assert!(loader.resource_requests().contains("stations.txt"));

    let iss = catalog.find("ISS").unwrap();
    let shadow = catalog.find("ISS shadow").unwrap();
    let before = tle_epoch(&iss);
    let position_before = iss.borrow().relative_state(before).unwrap().position;

    let stream = format!(
        "ISS (ZARYA)\n{ISS_NEXT_DAY}\n{ISS_LINE2}\nHST\n{ISS_LINE1}\n{ISS_LINE2}\n"
    );
    let queued = loader
        .process_tle_set("stations.txt", Cursor::new(stream))
        .unwrap();
    assert_eq!(queued, 2);
    assert_eq!(loader.process_updates(), 2);

    assert_relative_eq!(tle_epoch(&iss) - before, 86_400.0, epsilon = 1e-3);
    assert_relative_eq!(tle_epoch(&shadow), tle_epoch(&iss));
    let position_after = iss.borrow().relative_state(before).unwrap().position;
    assert!((position_after - position_before).norm() > 1.0);
    assert!(loader.messages().is_empty());
}

#[test]
fn updates_pushed_from_another_thread() {
    let mut loader = UniverseLoader::new();
    let catalog = load_stations(&mut loader);
    let iss = catalog.find("ISS").unwrap();
    let before = tle_epoch(&iss);

    let queue = loader.update_queue();
    let producer = std::thread::spawn(move || {
        queue.push(orrery::loader::TleRecord::new(
            "stations.txt",
            "ISS (ZARYA)",
            ISS_NEXT_DAY,
            ISS_LINE2,
        ));
        queue.push(orrery::loader::TleRecord::new(
            "stations.txt",
            "ISS (ZARYA)",
            "not a tle",
            ISS_LINE2,
        ));
    });
    producer.join().unwrap();

    assert_eq!(loader.process_updates(), 2);
    assert_relative_eq!(tle_epoch(&iss) - before, 86_400.0, epsilon = 1e-3);
    assert_eq!(
        loader.messages(),
        ["Bad TLE received: ISS (ZARYA) from stations.txt"]
    );

    // Later definitions pick up the cached lines, good or bad.
    loader.clear_message_log();
    let mut fresh = UniverseCatalog::new();
    let contents = json!({
        "version": "1.0",
        "items": [
            { "name": "Earth", "center": "Earth" },
            { "name": "ISS", "center": "Earth",
              "trajectory": { "type": "TLE", "name": "ISS (ZARYA)", "source": "stations.txt",
                              "line1": ISS_LINE1, "line2": ISS_LINE2 } }
        ]
    });
    loader.load_catalog_items(contents.as_object().unwrap(), &mut fresh);
    assert!(fresh.find("ISS").is_none());
    assert_eq!(
        loader.messages(),
        [
            "Item 'ISS': Invalid TLE data for 'ISS (ZARYA)'",
            "Item 'ISS': Skipping body 'ISS' because of errors.",
        ]
    );
}

#[test]
fn redefinitions_release_replaced_trajectories() {
    let mut loader = UniverseLoader::new();
    let mut catalog = load_stations(&mut loader);
    for _ in 0..4 {
        loader.load_catalog_items(stations().as_object().unwrap(), &mut catalog);
    }
    assert!(loader.messages().is_empty(), "{}", loader.message_log());
    assert_eq!(loader.live_tle_count("stations.txt", "ISS (ZARYA)"), 2);

    let iss = catalog.find("ISS").unwrap();
    let before = tle_epoch(&iss);
    loader.update_tle("stations.txt", "ISS (ZARYA)", ISS_NEXT_DAY, ISS_LINE2);
    assert_eq!(loader.process_updates(), 1);
    assert_relative_eq!(tle_epoch(&iss) - before, 86_400.0, epsilon = 1e-3);

    drop(iss);
    catalog.remove_body("ISS");
    catalog.remove_body("ISS shadow");
    assert_eq!(loader.live_tle_count("stations.txt", "ISS (ZARYA)"), 0);
}
