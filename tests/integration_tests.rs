use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

struct RunOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

/// Helper function to run statescatter with arguments and optional stdin
fn run_statescatter(args: &[&str], stdin: Option<&str>) -> RunOutput {
    let mut child = Command::new(env!("CARGO_BIN_EXE_statescatter"))
        .args(args)
        .env("RUST_LOG", "info")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn process");

    if let Some(mut handle) = child.stdin.take() {
        if let Some(input) = stdin {
            handle
                .write_all(input.as_bytes())
                .expect("Failed to write to stdin");
        }
    }

    let output = child.wait_with_output().expect("Failed to wait for process");
    RunOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Helper function to check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn temp_output(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("statescatter-{}-{}", std::process::id(), name))
}

#[test]
fn test_default_render_to_stdout() {
    let result = run_statescatter(&["--data", "test/states.csv"], None);
    assert!(result.success, "Failed: {}", result.stderr);
    assert!(result.stdout.contains("<svg"));
    assert!(result.stdout.contains("AK"));
    assert!(result.stdout.contains("In Poverty (%)"));
    assert!(result.stdout.contains("Household Income (Meridian)"));
    assert!(result.stdout.contains("Obese (%)"));
    assert!(result.stderr.contains("Loaded 6 records"));
}

#[test]
fn test_bundled_dataset_renders() {
    let result = run_statescatter(&[], None);
    assert!(result.success, "Failed: {}", result.stderr);
    assert!(result.stdout.contains("OH"));
}

#[test]
fn test_rendering_twice_is_identical() {
    let first = run_statescatter(&["--data", "test/states.csv", "-x", "age", "-y", "obesity"], None);
    let second = run_statescatter(&["--data", "test/states.csv", "-x", "age", "-y", "obesity"], None);
    assert!(first.success && second.success);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_event_script_file_updates_output() {
    let out = temp_output("script.svg");
    let out_str = out.to_str().unwrap();
    let result = run_statescatter(
        &["--data", "test/states.csv", "--out", out_str, "--events", "test/session.events"],
        None,
    );
    assert!(result.success, "Failed: {}", result.stderr);
    assert!(result.stdout.is_empty());

    let svg = fs::read_to_string(&out).expect("Output not written");
    let _ = fs::remove_file(&out);

    // Last event shows Alabama with the income/smokes selection
    assert!(svg.contains("Alabama"));
    assert!(svg.contains("Smokes : 21.1"));
    assert!(svg.contains("Income : 42830"));
    assert!(!svg.contains("Alaska"));
    assert!(result.stderr.contains("Rendered session 3"));
}

#[test]
fn test_png_output_with_tooltip() {
    let out = temp_output("chart.png");
    let out_str = out.to_str().unwrap();
    let result = run_statescatter(
        &["--data", "test/states.csv", "--out", out_str, "--events", "-"],
        Some("select y obesity\nclick OH\n"),
    );
    assert!(result.success, "Failed: {}", result.stderr);
    assert!(result.stdout.is_empty());

    let png = fs::read(&out).expect("Output not written");
    let _ = fs::remove_file(&out);
    assert!(is_valid_png(&png), "Output is not a valid PNG");
    assert!(result.stderr.contains("Rendered session 2"));
    assert!(result.stderr.contains("Wrote"));
}

#[test]
fn test_events_from_stdin() {
    let result = run_statescatter(
        &["--data", "test/states.csv", "--events", "-"],
        Some("select x age\nclick OH\n"),
    );
    assert!(result.success, "Failed: {}", result.stderr);
    assert!(result.stdout.contains("Ohio"));
    assert!(result.stdout.contains("Age : 39.3"));
    assert!(result.stdout.contains("HealthCare (Low) : 8.5"));
}

#[test]
fn test_single_record_tooltip() {
    let result = run_statescatter(&["--data", "test/ohio.csv", "--events", "-"], Some("click OH\n"));
    assert!(result.success, "Failed: {}", result.stderr);
    assert!(result.stdout.contains("Ohio"));
    assert!(result.stdout.contains("HealthCare (Low) : 5"));
    assert!(result.stdout.contains("Poverty : 10"));
}

#[test]
fn test_mouseout_hides_tooltip() {
    let result = run_statescatter(
        &["--data", "test/ohio.csv", "--events", "-"],
        Some("click OH\nmouseout OH\n"),
    );
    assert!(result.success, "Failed: {}", result.stderr);
    assert!(!result.stdout.contains("Ohio"));
}

#[test]
fn test_bad_script_lines_are_skipped() {
    let result = run_statescatter(
        &["--data", "test/states.csv", "--events", "-"],
        Some("hover OH\nclick TX\nselect x smokes\nclick CT\n"),
    );
    assert!(result.success, "Failed: {}", result.stderr);
    assert!(result.stderr.contains("Parse error"));
    assert!(result.stderr.contains("rejected"));
    assert!(result.stdout.contains("Connecticut"));
}

#[test]
fn test_bad_value_rejects_selection_but_keeps_chart() {
    let result = run_statescatter(
        &["--data", "test/bad_smokes.csv", "--events", "-"],
        Some("select y smokes\n"),
    );
    assert!(result.success, "Failed: {}", result.stderr);
    assert!(result.stderr.contains("unknown"));
    // Previous selection is still drawn as active
    assert!(result.stdout.contains("Lacks Healthcare (%)"));
}

#[test]
fn test_bad_value_in_initial_selection_fails() {
    let result = run_statescatter(&["--data", "test/bad_smokes.csv", "-y", "smokes"], None);
    assert!(!result.success);
    assert!(result.stderr.contains("smokes"));
    assert!(result.stdout.is_empty());
}

#[test]
fn test_missing_column_fails_to_load() {
    let result = run_statescatter(&["--data", "test/missing_column.csv"], None);
    assert!(!result.success);
    assert!(result.stderr.contains("Column 'obesity' not found"));
    assert!(result.stdout.is_empty());
}

#[test]
fn test_missing_file_fails_to_load() {
    let result = run_statescatter(&["--data", "test/does_not_exist.csv"], None);
    assert!(!result.success);
    assert!(result.stderr.contains("Failed to open dataset"));
}

#[test]
fn test_axis_column_must_be_offered_on_that_axis() {
    let result = run_statescatter(&["--data", "test/states.csv", "-x", "smokes"], None);
    assert!(!result.success);
    assert!(result.stderr.contains("not selectable on the x axis"));
}
