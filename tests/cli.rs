use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn inventory_prints_cost_breakdown() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("stock-queue-sim");
    cmd.args(["inventory", "-s", "10", "-S", "40"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Policy (s=10, S=40) over 12 periods"))
        .stdout(predicate::str::contains("Holding cost: 800.00"))
        .stdout(predicate::str::contains("Ordering cost: 1540.00"));
}

#[test]
fn inventory_rejects_inverted_policy() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("stock-queue-sim");
    cmd.args(["inventory", "-s", "40", "-S", "10"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid policy"));
}

#[test]
fn inventory_writes_period_trace() {
    let dir = assert_fs::TempDir::new().unwrap();
    let output = dir.child("trace.csv");

    let mut cmd = assert_cmd::cargo_bin_cmd!("stock-queue-sim");
    cmd.args(["inventory", "-o", output.path().to_str().unwrap()]);
    cmd.assert().success();

    let csv = std::fs::read_to_string(output.path()).unwrap();
    assert_eq!(csv.lines().count(), 13);
    assert!(csv.starts_with("period,demand,net_stock"));
}

#[test]
fn inventory_runs_on_generated_demand() {
    let dir = assert_fs::TempDir::new().unwrap();
    let scenario = dir.child("scenario.yaml");
    scenario
        .write_str("demand: { normal: { periods: 24, mean: 25.0, std_dev: 10.0, seed: 7 } }\n")
        .unwrap();
    let output = dir.child("trace.csv");

    let mut cmd = assert_cmd::cargo_bin_cmd!("stock-queue-sim");
    cmd.args([
        "inventory",
        "-c",
        scenario.path().to_str().unwrap(),
        "-o",
        output.path().to_str().unwrap(),
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Policy (s=10, S=40) over 24 periods"));

    let csv = std::fs::read_to_string(output.path()).unwrap();
    assert_eq!(csv.lines().count(), 25);
}

#[test]
fn compare_rejects_invalid_generated_demand() {
    let dir = assert_fs::TempDir::new().unwrap();
    let scenario = dir.child("scenario.yaml");
    scenario
        .write_str("demand: { normal: { periods: 5, mean: 10.0, std_dev: -2.0 } }\n")
        .unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("stock-queue-sim");
    cmd.args(["compare", "-c", scenario.path().to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("normal demand"));
}

#[test]
fn compare_reports_best_strategy_from_scenario_file() {
    let dir = assert_fs::TempDir::new().unwrap();
    let scenario = dir.child("scenario.yaml");
    scenario
        .write_str(
            "demand: [0, 0, 0]
strategies:
  - { s: 5, S: 20 }
  - { s: 5, S: 10 }
inventory:
  costs: { holding: 1.0, shortage: 5.0, ordering: 23.0 }
",
        )
        .unwrap();
    let output = dir.child("comparison.csv");

    let mut cmd = assert_cmd::cargo_bin_cmd!("stock-queue-sim");
    cmd.args([
        "compare",
        "-c",
        scenario.path().to_str().unwrap(),
        "-o",
        output.path().to_str().unwrap(),
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Best strategy (by total cost): (s=5, S=10)",
        ));

    let csv = std::fs::read_to_string(output.path()).unwrap();
    assert!(csv.lines().nth(1).unwrap().starts_with("1,5,10,"));
}

#[test]
fn queue_prints_analytic_and_simulated_metrics() {
    let dir = assert_fs::TempDir::new().unwrap();
    let timeline = dir.child("timeline.csv");

    let mut cmd = assert_cmd::cargo_bin_cmd!("stock-queue-sim");
    cmd.args([
        "queue",
        "--seed",
        "42",
        "--timeline-output",
        timeline.path().to_str().unwrap(),
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("=== Analytic (M/M/1) ==="))
        .stdout(predicate::str::contains("=== Simulated ==="))
        .stdout(predicate::str::contains("20 customers, horizon 100, step 0.1, seed 42"));

    let csv = std::fs::read_to_string(timeline.path()).unwrap();
    assert_eq!(csv.lines().count(), 1001);
    assert!(csv.starts_with("time,waiting,in_system,server_busy"));
}
