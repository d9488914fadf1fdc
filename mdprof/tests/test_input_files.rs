mod common;

use common::RecordingBuilder;
use mdprof::intervals::{write_breakpoints_file, IntervalRuleTable};
use mdprof::symbolization::{SymbolResolver, SymbolTable};
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

const NM_SYMBOLS: &str = "\
00000200 T Main_Loop
00000300 T Update
00001000 t mdp_label_Frame_a
00001010 t mdp_label_Frame_b
00001100 t Frame_done
";

fn temp_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents).expect("Failed to write temp file");
    file
}

#[test]
fn test_symbol_file_from_disk() {
    let file = temp_file(NM_SYMBOLS.as_bytes());
    let symbols = SymbolTable::from_file(file.path()).expect("Failed to load symbols");

    assert_eq!(symbols.len(), 5);
    assert_eq!(symbols.resolve(0x300), Some("Update"));
    assert_eq!(symbols.lookup("Frame_done"), Some(0x1100));
    assert_eq!(symbols.with_prefix("mdp_label_Frame"), vec![0x1000, 0x1010]);
}

#[test]
fn test_interval_file_resolves_label_families() {
    let symbols = SymbolTable::from_file(temp_file(NM_SYMBOLS.as_bytes()).path())
        .expect("Failed to load symbols");
    let intervals = temp_file(b"// frame timing\nFrame,Frame_done,Frame,Timing\n");

    let table = IntervalRuleTable::from_file(intervals.path(), &symbols).expect("Failed to load intervals");
    assert_eq!(table.len(), 1);
    assert_eq!(table.categories().len(), 3);

    let addresses: Vec<u32> = table.addresses().iter().map(|a| a.0).collect();
    assert_eq!(addresses, vec![0x1000, 0x1010, 0x1100]);
}

#[test]
fn test_unresolved_interval_element_names_the_line() {
    let intervals = temp_file(b"\nNoSuchLabel,0x100\n");
    let err = IntervalRuleTable::from_file(intervals.path(), &SymbolTable::default())
        .expect_err("unresolved label must fail");
    assert!(err.to_string().contains("Line 2"), "{err}");
}

#[test]
fn test_breakpoint_file_on_disk() {
    let table = IntervalRuleTable::parse("0x300,0x200\n0x200,0x100\n", &SymbolTable::default())
        .expect("Failed to parse intervals");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("game.bpt");

    let written = write_breakpoints_file(&table, &path).expect("Failed to write breakpoints");
    assert_eq!(written, 3);

    let bytes = std::fs::read(&path).expect("Failed to read breakpoints");
    assert_eq!(bytes, [0x00, 0x01, 0, 0, 0x00, 0x02, 0, 0, 0x00, 0x03, 0, 0]);
}

#[test]
fn test_cli_missing_input_is_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_mdprof"))
        .output()
        .expect("Failed to run mdprof");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing required argument"));
}

#[test]
fn test_cli_converts_recording() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("capture.mdp");
    let symbols = dir.path().join("game.nm");
    std::fs::write(&input, RecordingBuilder::new(1_000_000).call(10, 0x200).ret(50).build())
        .expect("Failed to write recording");
    std::fs::write(&symbols, NM_SYMBOLS).expect("Failed to write symbols");

    let status = Command::new(env!("CARGO_BIN_EXE_mdprof"))
        .arg(&input)
        .arg("-s")
        .arg(&symbols)
        .arg("-q")
        .status()
        .expect("Failed to run mdprof");
    assert!(status.success());

    let json = std::fs::read_to_string(dir.path().join("capture.json")).expect("No trace written");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");
    let names: Vec<&str> = parsed["traceEvents"]
        .as_array()
        .expect("traceEvents is not an array")
        .iter()
        .filter(|e| e["ph"] == "X")
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Main_Loop"]);
}

#[test]
fn test_cli_rejects_empty_recording_file() {
    let input = temp_file(b"");
    let output = Command::new(env!("CARGO_BIN_EXE_mdprof"))
        .arg(input.path())
        .output()
        .expect("Failed to run mdprof");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("is empty"));
}
