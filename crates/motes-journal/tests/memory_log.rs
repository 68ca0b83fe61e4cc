use std::io::Cursor;

use motes_journal::{Command, MemoryLog, Session, SessionEnd};

#[test]
fn commit_then_reload_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.json");

    let mut log = MemoryLog::new(&path);
    log.commit("X", "Y").unwrap();

    let reloaded = MemoryLog::open(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    let record = &reloaded.records()[0];
    assert_eq!(record.category, "X");
    assert_eq!(record.content, "Y");
    assert_eq!(record, &log.records()[0]);
}

#[test]
fn missing_file_is_seeded_and_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.json");

    let log = MemoryLog::open(&path).unwrap();
    assert!(!log.is_empty());
    assert!(path.exists());
    assert_eq!(MemoryLog::open(&path).unwrap().len(), log.len());
}

#[test]
fn corrupt_file_starts_empty_until_next_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut log = MemoryLog::open(&path).unwrap();
    assert!(log.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");

    log.commit("lesson", "recovered").unwrap();
    let reloaded = MemoryLog::open(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.records()[0].category, "LESSON");
}

#[test]
fn recall_ignores_case_and_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = MemoryLog::new(dir.path().join("recall.json"));
    log.commit("project", "Secure vault uses encryption").unwrap();
    log.commit("tactic", "Shine to draw the crowd").unwrap();
    log.commit("VAULT", "Second entry").unwrap();

    let found: Vec<&str> = log
        .recall("VaUlT")
        .into_iter()
        .map(|r| r.content.as_str())
        .collect();
    assert_eq!(found, vec!["Secure vault uses encryption", "Second entry"]);
    assert!(log.recall("dragon").is_empty());
    assert_eq!(log.recall("").len(), 3);
}

#[test]
fn file_layout_is_meta_plus_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");
    MemoryLog::new(&path).commit("identity", "motes").unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(value["meta"].is_object());
    let record = &value["records"][0];
    assert_eq!(record["category"], "IDENTITY");
    assert_eq!(record["id"].as_str().unwrap().len(), 8);
    let stamp = record["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
}

#[test]
fn console_session_commits_and_recalls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("console.json");
    let mut log = MemoryLog::new(&path);

    let script = "learn tactic Light up to draw attention\n\
                  save core memory you are not a tool\n\
                  learn nothing\n\
                  recall TOOL\n\
                  how are you\n\
                  sleep\n\
                  recall never reached\n";
    let mut session = Session::new(Cursor::new(script), Vec::new());
    assert_eq!(session.run(&mut log).unwrap(), SessionEnd::Farewell);
    let output = String::from_utf8(session.into_output()).unwrap();

    assert_eq!(log.len(), 2);
    assert_eq!(log.records()[0].category, "TACTIC");
    assert_eq!(log.records()[1].category, "CORE_MEMORY");
    assert!(output.contains("syntax: learn <CATEGORY> <FACT>"));
    assert!(output.contains("   > [CORE_MEMORY] you are not a tool"));
    assert!(output.contains("I am listening"));
    assert!(output.contains("entering hibernation"));
    assert!(!output.contains("never reached"));
    assert_eq!(MemoryLog::open(&path).unwrap().len(), 2);
}

#[test]
fn console_ends_at_end_of_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = MemoryLog::new(dir.path().join("eof.json"));
    let mut session = Session::new(Cursor::new("recall anything\n"), Vec::new()).with_prompt("$ ");
    assert_eq!(session.run(&mut log).unwrap(), SessionEnd::EndOfInput);
    let output = String::from_utf8(session.into_output()).unwrap();
    assert!(output.contains("[null] no data found"));
    assert!(output.contains("$ "));
}

#[test]
fn execute_reports_farewell() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = MemoryLog::new(dir.path().join("exec.json"));
    let mut session = Session::new(Cursor::new(""), Vec::new());
    assert!(session.execute(&mut log, Command::parse("hello")).unwrap());
    assert!(!session.execute(&mut log, Command::parse("rest")).unwrap());
}
