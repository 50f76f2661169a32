//! Given steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async, session_for};
use gigbounty::task::services::PostTaskRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#""{poster}" has posted a task worth "{amount}" ALGO"#)]
fn task_posted(
    world: &mut TaskLifecycleWorld,
    poster: String,
    amount: String,
) -> Result<(), eyre::Report> {
    let session = session_for(&poster)?;
    let request = PostTaskRequest::new(
        "Translate the README",
        "Translate the README into Spanish",
        amount,
    );
    let task = run_async(world.board.post_task(&session, request))
        .wrap_err("post task for scenario setup")?;
    world.current_task = Some(task.id().clone());
    Ok(())
}

#[given(r#""{worker}" has claimed the task"#)]
fn task_claimed(world: &mut TaskLifecycleWorld, worker: String) -> Result<(), eyre::Report> {
    let id = world.task_id()?;
    let session = session_for(&worker)?;
    run_async(world.board.claim(&session, &id)).wrap_err("claim task for scenario setup")?;
    Ok(())
}
