#![allow(dead_code)]
use assert_cmd::{cargo_bin_cmd, Command};
use tempfile::TempDir;

pub fn hydromate(data_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("hydromate");
    cmd.env_remove("HYDROMATE_LOG")
        .arg("--data-dir")
        .arg(data_dir.path());
    cmd
}

pub fn data_dir() -> TempDir {
    tempfile::tempdir().expect("Unable to create temp dir")
}
