//! Loading fixture tasks from JSON files.

use super::helpers::temp_path;
use gigbounty::task::{
    adapters::fixture::{FixtureError, load_fixture_tasks, parse_fixture_tasks},
    domain::{Amount, TaskStatus},
};
use rstest::rstest;

const FIXTURE: &str = r#"[
  {
    "id": "7",
    "title": "Landing page copy",
    "description": "Write copy for the landing page",
    "amount": 12.5,
    "creator_wallet": "POSTERWALLETADDRESS",
    "worker_wallet": "ACCEPTORWALLETADDRESS",
    "status": "SUBMITTED",
    "proof_url": "https://proof.example/copy",
    "deadline": "2026-12-31",
    "created_at": "2026-10-01T09:30:00"
  },
  {
    "id": "8",
    "title": "Logo",
    "description": "Design a logo",
    "amount": "3",
    "creator_wallet": "POSTERWALLETADDRESS",
    "worker_wallet": "",
    "status": "OPEN"
  }
]"#;

#[rstest]
fn parses_service_records() -> eyre::Result<()> {
    let tasks = parse_fixture_tasks("inline", FIXTURE)?;

    let [submitted, open] = tasks.as_slice() else {
        eyre::bail!("expected two tasks, got {}", tasks.len());
    };
    eyre::ensure!(submitted.status() == TaskStatus::Submitted);
    eyre::ensure!(submitted.amount() == Amount::from_micro(12_500_000));
    eyre::ensure!(submitted.deadline().is_some());
    eyre::ensure!(submitted.created_at().is_some());
    eyre::ensure!(open.worker().is_none(), "blank worker should decode as none");
    eyre::ensure!(open.amount() == Amount::from_whole(3));
    Ok(())
}

#[rstest]
#[case::not_json("{")]
#[case::not_an_array(r#"{"id": "1"}"#)]
fn rejects_malformed_files(#[case] contents: &str) {
    let result = parse_fixture_tasks("inline", contents);

    assert!(matches!(result, Err(FixtureError::Parse { .. })));
}

#[rstest]
fn rejects_unknown_statuses() {
    let contents = r#"[{"id": "1", "title": "t", "description": "d", "amount": 1,
        "creator_wallet": "POSTER", "status": "ARCHIVED"}]"#;

    let result = parse_fixture_tasks("inline", contents);

    assert!(matches!(result, Err(FixtureError::Record { .. })));
}

#[rstest]
fn loads_tasks_from_disk() -> eyre::Result<()> {
    let dir = temp_path("fixtures")?;
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("tasks.json");
    std::fs::write(&path, FIXTURE)?;

    let loaded = load_fixture_tasks(&path);
    std::fs::remove_dir_all(&dir)?;

    eyre::ensure!(loaded?.len() == 2);
    Ok(())
}

#[rstest]
fn missing_file_is_a_read_error() -> eyre::Result<()> {
    let path = temp_path("absent")?.join("tasks.json");

    let result = load_fixture_tasks(&path);

    eyre::ensure!(matches!(result, Err(FixtureError::Read { .. })));
    Ok(())
}
