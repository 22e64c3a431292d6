use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

use serde_json::Value;

const SCENARIO_A_TOKEN: &str = "AHsAIgBzACIAOgA4ACwAIgBwAQMAWwBbADAALAAwAF0ALAELACwANwEPAFsANwESAF0BDwAiAHcBCQBbADEALAAxADIBGAEGAGgBAwEgADAAfQ.ce770eed";

fn xodex(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_xodex"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn xodex");
    {
        let mut pipe = child.stdin.take().expect("stdin pipe");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }
    child.wait_with_output().expect("xodex output")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

#[test]
fn encode_reads_stdin_and_prints_reference_token() {
    let output = xodex(
        &["encode", "-"],
        Some(r#"{"size":8,"path":[[0,0],[0,7],[7,7]],"waves":[{"t":1,"c":12}],"heat":120}"#),
    );
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains(&format!("token: {SCENARIO_A_TOKEN}")), "{text}");
    assert!(text.contains(&format!("fragment: #XDX1.{SCENARIO_A_TOKEN}")), "{text}");
}

#[test]
fn decode_accepts_share_links() {
    let link = format!("https://levels.example/play/#XDX1.{SCENARIO_A_TOKEN}");
    let output = xodex(&["decode", &link], None);
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("seed: 117856508"), "{text}");

    let json_end = text.rfind("seed:").expect("seed line");
    let level: Value = serde_json::from_str(&text[..json_end]).expect("level json");
    assert_eq!(level["size"], 8);
    assert_eq!(level["heat"], 120);
    assert_eq!(level["path"][2], serde_json::json!([7, 7]));
}

#[test]
fn tampered_token_fails_with_checksum_rejection() {
    let tampered = SCENARIO_A_TOKEN.replacen("AHsA", "AHsB", 1);
    let output = xodex(&["decode", &tampered], None);
    assert!(!output.status.success());
    let errors = String::from_utf8_lossy(&output.stderr);
    assert!(errors.contains("Checksum rejection"), "{errors}");
}

#[test]
fn validate_reports_schema_reason() {
    let output = xodex(&["validate", "-"], Some(r#"{"size":8,"path":[[0,0]],"waves":[]}"#));
    assert!(!output.status.success());
    let errors = String::from_utf8_lossy(&output.stderr);
    assert!(errors.contains("Path length is invalid."), "{errors}");
}

#[test]
fn seed_prints_generator_samples() {
    let output = xodex(&["seed", SCENARIO_A_TOKEN, "--samples", "3"], None);
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("seed: 117856508"));
    let samples: Vec<f64> = lines.map(|line| line.parse().expect("float")).collect();
    assert_eq!(samples.len(), 3);
    assert!(samples.iter().all(|value| (0.0..1.0).contains(value)));
}

#[test]
fn eigenstate_round_trips_through_cli() {
    let encoded = xodex(
        &["eigenstate", "encode", "-"],
        Some(
            r#"{"energy_setpoint":0.8,"epigenetic_profile":0.42,"cascade_readiness":0.73,
                "stress_resilience":0.65,"differentiation_axis":-0.1,"mechanical_state":0.5}"#,
        ),
    );
    assert!(encoded.status.success(), "{encoded:?}");
    let token = stdout(&encoded).trim().to_owned();
    assert_eq!(token, "XDX1.P0zMzT7XCj0_OuFIPyZmZr3MzM0_AAAA.475f48a6");

    let decoded = xodex(&["eigenstate", "decode", &token], None);
    assert!(decoded.status.success(), "{decoded:?}");
    let state: Value = serde_json::from_str(&stdout(&decoded)).expect("state json");
    assert_eq!(state["mechanical_state"], 0.5);
}
