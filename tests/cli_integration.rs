//! CLI integration tests covering the full map → eval → post-process
//! flow.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const GT_HEADER: &str = "Selection\tView\tChannel\tBegin Time (s)\tEnd Time (s)\tLow Freq (Hz)\tHigh Freq (Hz)\tsex\tquality\tnotes\tsong\tc12\tc13\tc14\tc15\tc16\tcall type\tlikely sex";

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    std::fs::write(path, contents).expect("write fixture");
}

fn deteval() -> Command {
    Command::cargo_bin("deteval").expect("binary built")
}

fn build_fixture(root: &Path) {
    write(
        &root
            .join("gt")
            .join("N9_S00920_20220516_053000.Table.1.selections.FINAL.txt"),
        &format!(
            "{GT_HEADER}\n1\tSpectrogram 1\t1\t60\t70\t400\t8000\tf\tgood\t\ty\t\t\t\t\t\tcall-a\tf\n"
        ),
    );
    write(
        &root
            .join("p1")
            .join("N9_S00920_20220516_053000_predict_output.log"),
        "b|/audio/N9_S00920_20220516_053000.wav\n\
         b|time=55.0-65.0, pred=1, prob=0.95\n",
    );
    write(
        &root
            .join("p2")
            .join("target-62000ms-66000ms_0_N9_S00920_20220516_053000_predict_output.log"),
        "m|/x/target-62000ms-66000ms_0_N9_S00920_20220516_053000.wav\n\
         m|time=0.0-0.5, pred=1, class=female, prob=0.8\n\
         prediction scores for output_layer:\n\
         female=0.8;\n\
         male=0.15;\n\
         noise=0.05;\n\
         \n",
    );
}

#[test]
fn test_help_lists_subcommands() {
    deteval()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("eval"))
        .stdout(predicate::str::contains("map"))
        .stdout(predicate::str::contains("tables"));
}

#[test]
fn test_config_path_prints_toml_path() {
    deteval()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_eval_with_missing_file_map_fails() {
    deteval()
        .args(["eval", "/nonexistent/file_map.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_map_eval_tables_ground_truth_flow() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    build_fixture(root);

    let map_path = root.join("out").join("file_map.json");

    deteval()
        .current_dir(root)
        .args(["map", "--ground-truth", "gt", "--binary", "p1", "--multiclass", "p2"])
        .args(["-o", map_path.to_str().expect("utf-8")])
        .assert()
        .success();
    let map_json = std::fs::read_to_string(&map_path).expect("map written");
    assert!(map_json.contains("N9_S00920_20220516_053000_predict_output.log"));
    assert!(map_json.contains("target-62000ms-66000ms"));

    deteval()
        .current_dir(root)
        .args(["eval", "out/file_map.json", "-o", "out", "--no-progress"])
        .assert()
        .success();
    let results = std::fs::read_to_string(root.join("out").join("prediction_results.csv"))
        .expect("results written");
    assert!(results.contains("ground_truth_file,binary_prediction_file"));
    assert!(results.contains("female"));
    assert!(results.contains("2022-05-16 05:31:02"));

    deteval()
        .current_dir(root)
        .args(["tables", "out/prediction_results.csv", "-o", "out"])
        .assert()
        .success();
    let table = std::fs::read_to_string(root.join("out").join(
        "N9_S00920_20220516_053000.Table.1.selections.FINALpredictions.txt",
    ))
    .expect("selection table written");
    assert!(table.starts_with("Selection\tView\tChannel"));
    assert!(table.contains("Spectrogram 1"));
    assert!(table.contains("female"));

    deteval()
        .current_dir(root)
        .args([
            "ground-truth",
            "out/file_map.json",
            "out/prediction_results.csv",
            "-o",
            "out",
        ])
        .assert()
        .success();
    let analysis = std::fs::read_to_string(root.join("out").join("ground_truth_analysis.csv"))
        .expect("analysis written");
    // The single annotation is matched by the single excerpt.
    assert!(analysis.contains("female"));
    assert!(analysis.contains("f"));

    deteval()
        .current_dir(root)
        .args(["events", "out/file_map.json", "-o", "out"])
        .assert()
        .success();
    let raw = std::fs::read_to_string(
        root.join("out")
            .join("raw_N9_S00920_20220516_053000_predict_output.csv"),
    )
    .expect("raw frames written");
    assert!(raw.contains("log_file,audio_file,gt_file"));
    assert!(raw.contains("55,65"));
}
