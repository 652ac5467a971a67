//! Station command tests

mod common;

use common::{add_station, pnt, setup};
use predicates::prelude::*;

#[test]
fn test_station_new_rejects_active_above_total() {
    let tmp = setup();

    pnt()
        .current_dir(tmp.path())
        .args([
            "station", "new", "--name", "CS1", "--total", "3", "--active", "4", "--class", "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot exceed"));
}

#[test]
fn test_station_new_rejects_zero_workshops() {
    let tmp = setup();

    pnt()
        .current_dir(tmp.path())
        .args([
            "station", "new", "--name", "CS1", "--total", "0", "--active", "0", "--class", "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one workshop"));
}

#[test]
fn test_stop_workshop_to_zero_then_noop() {
    let tmp = setup();
    add_station(&tmp, "CS1", "5", "3", "2");

    for expected in ["2/5", "1/5", "0/5"] {
        pnt()
            .current_dir(tmp.path())
            .args(["station", "stop", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains(expected));
    }

    // The boundary is an informational no-op, not a failure
    pnt()
        .current_dir(tmp.path())
        .args(["station", "stop", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to stop"));

    pnt()
        .current_dir(tmp.path())
        .args(["station", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"active_workshops\": 0"));
}

#[test]
fn test_start_workshop_at_capacity_is_a_noop() {
    let tmp = setup();
    add_station(&tmp, "CS1", "1", "1", "1");

    pnt()
        .current_dir(tmp.path())
        .args(["station", "start", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to start"));
}

#[test]
fn test_workshop_unknown_station_fails() {
    let tmp = setup();

    pnt()
        .current_dir(tmp.path())
        .args(["station", "start", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no station with ID 5"));
}

#[test]
fn test_edit_shrinking_total_clamps_active() {
    let tmp = setup();
    add_station(&tmp, "CS1", "5", "3", "2");

    pnt()
        .current_dir(tmp.path())
        .args(["station", "edit", "1", "--total", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2/2 workshops running"));

    pnt()
        .current_dir(tmp.path())
        .args(["station", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_workshops\": 2"))
        .stdout(predicate::str::contains("\"active_workshops\": 2"));
}

#[test]
fn test_search_idle_percentage() {
    let tmp = setup();
    // CS1 idles 40% of its workshops, CS2 idles none
    add_station(&tmp, "CS1", "5", "3", "2");
    add_station(&tmp, "CS2", "4", "4", "1");

    pnt()
        .current_dir(tmp.path())
        .args(["station", "search", "--idle-equals", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CS2"))
        .stdout(predicate::str::contains("1 station(s) found"));

    pnt()
        .current_dir(tmp.path())
        .args(["station", "search", "--idle-above", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CS1"))
        .stdout(predicate::str::contains("1 station(s) found"));

    pnt()
        .current_dir(tmp.path())
        .args(["station", "search", "--idle-below", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 station(s) found"));
}

#[test]
fn test_search_by_name() {
    let tmp = setup();
    add_station(&tmp, "Northern CS", "5", "3", "2");
    add_station(&tmp, "Southern CS", "4", "4", "1");

    pnt()
        .current_dir(tmp.path())
        .args(["station", "search", "--name", "north"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Northern CS"))
        .stdout(predicate::str::contains("1 station(s) found"));
}

#[test]
fn test_search_requires_exactly_one_criterion() {
    let tmp = setup();

    pnt()
        .current_dir(tmp.path())
        .args(["station", "search"])
        .assert()
        .failure();

    pnt()
        .current_dir(tmp.path())
        .args(["station", "search", "--name", "x", "--idle-above", "10"])
        .assert()
        .failure();
}

#[test]
fn test_station_delete_all() {
    let tmp = setup();
    add_station(&tmp, "CS1", "5", "3", "2");
    add_station(&tmp, "CS2", "4", "4", "1");

    pnt()
        .current_dir(tmp.path())
        .args(["station", "delete", "ALL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 station(s), 0 remaining"));
}
