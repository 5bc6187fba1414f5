use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn wordcount() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wordcount"))
}

#[test]
fn missing_arguments_print_usage_and_exit_one() {
    let out = wordcount().output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "stderr: {}", stderr);
}

#[test]
fn counts_words_into_output_directory() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, "The the THE\nend.\n").unwrap();
    let output = dir.path().join("out");

    let out = wordcount()
        .arg(&input)
        .arg(&output)
        .args(["--partitions", "1"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Job completed for input:"));
    assert!(stdout.contains("Total execution time:"));

    let records = fs::read_to_string(output.join("part-00000")).unwrap();
    assert_eq!(records, "(end,1)\n(the,3)\n");
    assert!(output.join("_SUCCESS").exists());
}

#[test]
fn existing_output_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, "words").unwrap();

    let out = wordcount().arg(&input).arg(dir.path()).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));
}

#[test]
fn json_report() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, "a b a").unwrap();

    let out = wordcount()
        .arg(&input)
        .arg(dir.path().join("out"))
        .arg("--json-report")
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("\"tokens\": 3"), "stdout: {}", stdout);
    assert!(stdout.contains("\"distinct_words\": 2"));
}
