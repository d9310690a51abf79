#![cfg(unix)]

mod common;

use std::{
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use approx::assert_relative_eq;
use camino::Utf8Path;
use levelnet::{
    collaborators::FixedValidity,
    constants::{
        SHEET_CONTROL_COMPUTATION, SHEET_FINAL_COMPUTATION, SHEET_POINT_OVERVIEW,
    },
    gama::{
        artifacts::GamaArtifacts,
        invoker::{run_gama, AdjustmentOutcome},
    },
    levelnet::Levelnet,
    levelnet_errors::LevelnetError,
    levelnet_params::LevelnetParams,
    phase::ComputationPhase,
    workbook::{MemoryWorkbook, WorkbookStore},
};

use crate::common::{
    connected, epoch, fake_solver, gama_result, init_logger, observations, overview,
    solver_writing, utf8_dir,
};

// Writing a script while another test thread forks can make exec fail with ETXTBSY
static SOLVER_LOCK: Mutex<()> = Mutex::new(());

fn solver_lock() -> MutexGuard<'static, ()> {
    SOLVER_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn params(work_dir: &Utf8Path, solver: &Utf8Path) -> LevelnetParams {
    LevelnetParams::builder()
        .gama_executable(solver.as_str())
        .work_dir(work_dir)
        .timeout(Duration::from_secs(20))
        .poll_interval(Duration::from_millis(5))
        .build()
        .unwrap()
}

fn workbook() -> MemoryWorkbook {
    MemoryWorkbook::new()
        .with_observations(observations())
        .with_sheet(SHEET_POINT_OVERVIEW, overview())
}

fn result_b_c() -> String {
    gama_result(&[("B", 11.002, 1.0e-6), ("C", 12.5, 4.0e-6)])
}

#[test]
fn test_run_success() {
    init_logger();
    let _guard = solver_lock();
    let dir = tempfile::tempdir().unwrap();
    let work_dir = utf8_dir(&dir);
    let body = format!(
        "echo \"$@\" > \"$(dirname \"$3\")/args.txt\"\n{}",
        solver_writing(Some(&result_b_c()), 0)
    );
    let solver = fake_solver(&work_dir, "gama-ok", &body);

    let artifacts = GamaArtifacts::new(&work_dir, "p", ComputationPhase::Control);
    std::fs::write(&artifacts.input, "<gama-local/>").unwrap();

    let outcome = run_gama(&params(&work_dir, &solver), &artifacts).unwrap();
    assert_eq!(
        outcome,
        AdjustmentOutcome::Success {
            report: work_dir.join("p-resultat-kontrol.html")
        }
    );
    assert!(artifacts.result.is_file());
    assert!(artifacts.report.is_file());

    let args = std::fs::read_to_string(work_dir.join("args.txt")).unwrap();
    assert_eq!(
        args.trim_end(),
        format!(
            "{} --xml {} --html {}",
            artifacts.input, artifacts.result, artifacts.report
        )
    );
}

#[test]
fn test_run_soft_and_hard_failure() {
    init_logger();
    let _guard = solver_lock();
    let dir = tempfile::tempdir().unwrap();
    let work_dir = utf8_dir(&dir);
    let artifacts = GamaArtifacts::new(&work_dir, "p", ComputationPhase::Final);
    std::fs::write(&artifacts.input, "<gama-local/>").unwrap();

    let soft = fake_solver(
        &work_dir,
        "gama-soft",
        &solver_writing(Some(&result_b_c()), 1),
    );
    let outcome = run_gama(&params(&work_dir, &soft), &artifacts).unwrap();
    assert!(outcome.is_soft_failure());
    assert_eq!(
        outcome.report(),
        work_dir.join("p-resultat-endelig.html").as_path()
    );

    // The result of the soft run must not be mistaken for one of the hard run
    let hard = fake_solver(&work_dir, "gama-hard", &solver_writing(None, 1));
    let outcome = run_gama(&params(&work_dir, &hard), &artifacts).unwrap();
    assert_eq!(
        outcome,
        AdjustmentOutcome::HardFailure {
            report: artifacts.report.clone(),
            code: Some(1)
        }
    );
    assert!(!artifacts.result.exists());
}

#[test]
fn test_run_timeout() {
    init_logger();
    let _guard = solver_lock();
    let dir = tempfile::tempdir().unwrap();
    let work_dir = utf8_dir(&dir);
    let solver = fake_solver(&work_dir, "gama-slow", "exec sleep 30");
    let artifacts = GamaArtifacts::new(&work_dir, "p", ComputationPhase::Control);
    std::fs::write(&artifacts.input, "<gama-local/>").unwrap();

    let params = LevelnetParams::builder()
        .gama_executable(solver.as_str())
        .work_dir(&work_dir)
        .timeout(Duration::from_millis(200))
        .poll_interval(Duration::from_millis(10))
        .build()
        .unwrap();

    let started = std::time::Instant::now();
    assert_eq!(
        run_gama(&params, &artifacts),
        Err(LevelnetError::AdjustmentTimeout {
            timeout: Duration::from_millis(200)
        })
    );
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_control_then_final_computation() {
    init_logger();
    let _guard = solver_lock();
    let dir = tempfile::tempdir().unwrap();
    let work_dir = utf8_dir(&dir);
    let solver = fake_solver(&work_dir, "gama-ok", &solver_writing(Some(&result_b_c()), 0));
    let valid_at = epoch(2022, 1, 1);
    let years = 731.0 / 365.25;

    let mut levelnet = Levelnet::new(
        params(&work_dir, &solver),
        workbook(),
        connected,
        FixedValidity(valid_at),
    );

    let control = levelnet.compute("p").unwrap();
    assert_eq!(control.phase, ComputationPhase::Control);
    assert_eq!(control.n_fixed, 1);
    assert_eq!(control.n_estimated, 2);
    assert!(!control.soft_failure);
    assert_eq!(control.report, work_dir.join("p-resultat-kontrol.html"));

    let ws = levelnet.store().sheet(SHEET_CONTROL_COMPUTATION).unwrap();
    assert_eq!(ws, &control.working_set);
    assert_eq!(
        ws.iter().map(|r| r.point.as_str()).collect::<Vec<_>>(),
        vec!["B", "A", "C"]
    );
    let b = &ws[0];
    assert_relative_eq!(b.delta_height.unwrap(), 2.0, epsilon = 1e-6);
    assert_relative_eq!(b.uplift.unwrap(), 2.0 / years, epsilon = 1e-6);
    assert_relative_eq!(b.new_sigma.unwrap(), 0.001, epsilon = 1e-12);
    assert_eq!(b.when, Some(valid_at));
    assert_eq!(b.system, "DVR90");
    assert_eq!(ws[1].new_height, None);
    assert_eq!(ws[2].height, None);
    assert_eq!(ws[2].new_height, Some(12.5));

    // The control sheet now exists: the next run is the final one
    let final_run = levelnet.compute("p").unwrap();
    assert_eq!(final_run.phase, ComputationPhase::Final);
    assert_eq!(final_run.n_fixed, 1);
    assert_eq!(final_run.report, work_dir.join("p-resultat-endelig.html"));

    let ws = levelnet.store().sheet(SHEET_FINAL_COMPUTATION).unwrap();
    assert_eq!(
        ws.iter().map(|r| r.point.as_str()).collect::<Vec<_>>(),
        vec!["B", "A", "C", "C"]
    );
    // Dates were taken back from the overview before reconciling
    assert_relative_eq!(ws[0].uplift.unwrap(), 2.0 / years, epsilon = 1e-6);
    assert_eq!(ws[2].when, Some(valid_at));
    assert_eq!(ws[3].when, None);
    assert_eq!(ws[3].new_height, Some(12.5));

    let (_, store, _, _) = levelnet.into_parts();
    assert_eq!(store.sheet(SHEET_POINT_OVERVIEW), Some(&overview()));
}

#[test]
fn test_failed_computations_leave_workbook_untouched() {
    init_logger();
    let _guard = solver_lock();
    let dir = tempfile::tempdir().unwrap();
    let work_dir = utf8_dir(&dir);
    let valid_at = FixedValidity(epoch(2022, 1, 1));

    let hard = fake_solver(&work_dir, "gama-hard", &solver_writing(None, 1));
    let mut levelnet = Levelnet::new(params(&work_dir, &hard), workbook(), connected, valid_at);
    assert_eq!(
        levelnet.compute("p"),
        Err(LevelnetError::AdjustmentFailed {
            report: work_dir.join("p-resultat-kontrol.html")
        })
    );
    assert_eq!(levelnet.store(), &workbook());

    let mismatch = gama_result(&[("B", 11.002, 1.0e-6)]).replace(
        "</cov-mat>",
        "<flt>4e-6</flt>\n</cov-mat>",
    );
    let broken = fake_solver(
        &work_dir,
        "gama-broken",
        &solver_writing(Some(&mismatch), 0),
    );
    let mut levelnet =
        Levelnet::new(params(&work_dir, &broken), workbook(), connected, valid_at);
    assert_eq!(
        levelnet.compute("p"),
        Err(LevelnetError::ResultCardinalityMismatch {
            heights: 1,
            variances: 2
        })
    );
    assert!(!levelnet.store().has_sheet(SHEET_CONTROL_COMPUTATION));

    let soft = fake_solver(
        &work_dir,
        "gama-soft",
        &solver_writing(Some(&result_b_c()), 2),
    );
    let strict = LevelnetParams {
        strict_soft_failure: true,
        ..params(&work_dir, &soft)
    };
    let mut levelnet = Levelnet::new(strict, workbook(), connected, valid_at);
    assert!(matches!(
        levelnet.compute("p"),
        Err(LevelnetError::AdjustmentSoftFailure { .. })
    ));
    assert_eq!(levelnet.store(), &workbook());

    let mut levelnet = Levelnet::new(params(&work_dir, &soft), workbook(), connected, valid_at);
    let summary = levelnet.compute("p").unwrap();
    assert!(summary.soft_failure);
    assert!(levelnet.store().has_sheet(SHEET_CONTROL_COMPUTATION));
}
