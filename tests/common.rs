use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;

pub const TEST_DEVICE: &str = "test-device";

/// `papershelf` bound to a store directory and a fixed device id
pub fn papershelf(store: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("papershelf");
    cmd.arg("--store")
        .arg(store)
        .env("PAPERSHELF_DEVICE_ID", TEST_DEVICE)
        .env_remove("PAPERSHELF_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Library with `a.pdf` in two folders, `b.pdf` once and one non-PDF
#[allow(dead_code)]
pub fn create_library(root: &Path) {
    fs::create_dir_all(root.join("one")).unwrap();
    fs::create_dir_all(root.join("two")).unwrap();
    fs::write(root.join("one/a.pdf"), b"%PDF-1.4").unwrap();
    fs::write(root.join("two/a.pdf"), b"%PDF-1.4").unwrap();
    fs::write(root.join("one/b.pdf"), b"%PDF-1.4").unwrap();
    fs::write(root.join("one/notes.txt"), b"not a paper").unwrap();
}
