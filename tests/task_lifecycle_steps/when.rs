//! When steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async, session_for};
use gigbounty::task::services::PostTaskRequest;
use rstest_bdd_macros::when;

#[when(r#""{worker}" claims the task"#)]
fn claim_task(world: &mut TaskLifecycleWorld, worker: String) -> Result<(), eyre::Report> {
    let id = world.task_id()?;
    let session = session_for(&worker)?;
    world.last_result = Some(run_async(world.board.claim(&session, &id)));
    Ok(())
}

#[when(r#""{worker}" submits proof "{proof_url}""#)]
fn submit_proof(
    world: &mut TaskLifecycleWorld,
    worker: String,
    proof_url: String,
) -> Result<(), eyre::Report> {
    let id = world.task_id()?;
    let session = session_for(&worker)?;
    world.last_result = Some(run_async(
        world.board.submit_proof(&session, &id, &proof_url, false),
    ));
    Ok(())
}

#[when(r#""{creator}" approves the task"#)]
fn approve_task(world: &mut TaskLifecycleWorld, creator: String) -> Result<(), eyre::Report> {
    let id = world.task_id()?;
    let session = session_for(&creator)?;
    world.last_result = Some(run_async(world.board.approve(&session, &id)));
    Ok(())
}

#[when(r#""{caller}" disputes the task because "{reason}""#)]
fn dispute_task(
    world: &mut TaskLifecycleWorld,
    caller: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let id = world.task_id()?;
    let session = session_for(&caller)?;
    world.last_result = Some(run_async(world.board.dispute(&session, &id, &reason)));
    Ok(())
}

#[when(r#""{poster}" posts a task worth "{amount}" ALGO"#)]
fn post_task(
    world: &mut TaskLifecycleWorld,
    poster: String,
    amount: String,
) -> Result<(), eyre::Report> {
    let session = session_for(&poster)?;
    let request = PostTaskRequest::new("Design a logo", "A logo for the landing page", amount);
    world.last_result = Some(run_async(world.board.post_task(&session, request)));
    Ok(())
}
