use assert_cmd::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::{tempdir, NamedTempFile};

fn viewer() -> Command {
    Command::cargo_bin("reflectance_viewer").expect("binary exists")
}

#[test]
fn single_frame_is_written() {
    let output = tempdir().expect("temp dir");
    viewer()
        .args(["--frames", "1", "--width", "48", "--height", "32", "--seed", "7"])
        .arg("--output")
        .arg(output.path())
        .assert()
        .success()
        .stdout(contains("Wrote 1 frame(s)"));

    let frame = output.path().join("frame_0000.png");
    assert!(frame.exists());
    let image = image::open(&frame).expect("valid png");
    assert_eq!(image.to_rgba8().dimensions(), (48, 32));
}

#[test]
fn config_file_drives_the_render() {
    let output = tempdir().expect("temp dir");
    let mut config = NamedTempFile::new().expect("temp config");
    write!(
        config,
        r#"
[render]
width = 24
height = 16
frames = 2
fps = 10.0
model = "cook-torrance"

[scene]
seed = 42

[[lights]]
kind = "ambient"
color = [1.0, 1.0, 1.0, 1.0]
intensity = 0.3

[[lights]]
kind = "directional"
direction = [-1.0, -1.0, 0.0]
color = [1.0, 1.0, 1.0, 1.0]
"#
    )
    .expect("write config");

    viewer()
        .arg("--config")
        .arg(config.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();

    assert!(output.path().join("frame_0000.png").exists());
    assert!(output.path().join("frame_0001.png").exists());
    assert!(!output.path().join("frame_0002.png").exists());
}

#[test]
fn bad_config_fails() {
    let mut config = NamedTempFile::new().expect("temp config");
    write!(config, "[render]\nwidth = \"wide\"\n").expect("write config");

    viewer()
        .arg("--config")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(contains("failed to load configuration"));
}

#[test]
fn invalid_parameters_fail() {
    let mut config = NamedTempFile::new().expect("temp config");
    write!(config, "[material.cook_torrance]\nroughness = -1.0\n").expect("write config");

    viewer()
        .arg("--config")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(contains("invalid configuration"));
}

#[test]
fn unknown_model_is_rejected() {
    viewer()
        .args(["--model", "phong"])
        .assert()
        .failure()
        .stderr(contains("phong"));
}
