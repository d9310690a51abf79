#![allow(dead_code)]

use std::collections::BTreeSet;

use camino::{Utf8Path, Utf8PathBuf};
use hifitime::Epoch;
use levelnet::{
    constants::PointId,
    levelnet_errors::LevelnetError,
    observations::{Observation, Observations},
    working_set::{WorkingPoint, WorkingSet},
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn epoch(year: i32, month: u8, day: u8) -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(year, month, day)
}

/// Point overview of a small network: B free, A fixed for the control computation.
pub fn overview() -> WorkingSet {
    vec![
        WorkingPoint::with_height("B", 11.0, epoch(2020, 1, 1)),
        WorkingPoint::with_height("A", 10.0, epoch(2020, 1, 1)).fixed("x"),
    ]
    .into()
}

pub fn observations() -> Observations {
    vec![
        Observation::new("J1", "A", "B", 1.002, 1000.0, 10, "MTL", 1.0, 0.5),
        Observation::new("J2", "B", "C", 1.498, 900.0, 8, "MGL", 2.0, 0.3),
        Observation::new("J3", "A", "C", 9.9, 50.0, 1, "MTL", 1.0, 0.5).with_excluded(true),
    ]
}

pub fn connected(_project: &str) -> Result<BTreeSet<PointId>, LevelnetError> {
    Ok(["A", "B", "C"].iter().map(|p| p.to_string()).collect())
}

/// A minimal `gama-local` result document with the given adjusted heights and variances.
pub fn gama_result(points: &[(&str, f64, f64)]) -> String {
    let adjusted: String = points
        .iter()
        .map(|(id, z, _)| format!("<point><id>{id}</id><z>{z}</z></point>\n"))
        .collect();
    let flt: String = points
        .iter()
        .map(|(_, _, var)| format!("<flt>{var:e}</flt>\n"))
        .collect();
    format!(
        "<?xml version=\"1.0\" ?>\n<gama-local-adjustment version=\"2.0\">\n<coordinates>\n\
         <adjusted>\n{adjusted}</adjusted>\n\
         <cov-mat>\n<dim>{}</dim> <band>0</band>\n{flt}</cov-mat>\n\
         </coordinates>\n</gama-local-adjustment>\n",
        points.len()
    )
}

pub fn utf8_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8Path::from_path(dir.path())
        .expect("temporary directory is not UTF-8")
        .to_path_buf()
}

/// Write an executable shell script standing in for `gama-local`.
///
/// The solver is called as `solver <input> --xml <result> --html <report>`, so the script sees
/// the result path as `$3` and the report path as `$5`.
#[cfg(unix)]
pub fn fake_solver(dir: &Utf8Path, name: &str, body: &str) -> Utf8PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Script body writing `result` to the result file and a report, then exiting with `code`.
pub fn solver_writing(result: Option<&str>, code: i32) -> String {
    let mut body = String::new();
    if let Some(xml) = result {
        body.push_str(&format!("cat > \"$3\" <<'XML'\n{xml}XML\n"));
    }
    body.push_str("echo '<html></html>' > \"$5\"\n");
    body.push_str(&format!("exit {code}"));
    body
}
