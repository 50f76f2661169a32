//! Then steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, wallet_for};
use gigbounty::task::{
    domain::{Amount, FormField, TaskStatus},
    services::BoardError,
};
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.task()?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then(r#"the task worker is "{worker}""#)]
fn task_worker_is(world: &TaskLifecycleWorld, worker: String) -> Result<(), eyre::Report> {
    let expected = wallet_for(&worker)?;
    let task = world.task()?;
    if task.worker() != Some(&expected) {
        return Err(eyre::eyre!(
            "expected worker {expected}, found {:?}",
            task.worker()
        ));
    }
    Ok(())
}

#[then(r#"the action fails as "{kind}""#)]
fn action_fails_as(world: &TaskLifecycleWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action result"))?;
    match result {
        Err(error) if error.kind().as_str() == kind => Ok(()),
        other => Err(eyre::eyre!("expected a {kind} failure, got {other:?}")),
    }
}

#[then(r#""{earner}" leads the earners with "{amount}" ALGO"#)]
fn leads_the_earners(
    world: &TaskLifecycleWorld,
    earner: String,
    amount: String,
) -> Result<(), eyre::Report> {
    let expected_total = Amount::parse(&amount)
        .map_err(|err| eyre::eyre!("invalid expected amount in scenario: {err}"))?;
    let leaderboard = world.board.leaderboard();
    let leader = leaderboard
        .top_earners
        .first()
        .ok_or_else(|| eyre::eyre!("no earners ranked"))?;
    if leader.address != wallet_for(&earner)? || leader.total != expected_total {
        return Err(eyre::eyre!("unexpected leader {leader:?}"));
    }
    Ok(())
}

#[then(r#"the post is rejected on the "{field}" field"#)]
fn post_rejected_on_field(world: &TaskLifecycleWorld, field: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing post result"))?;
    let Err(BoardError::Form(errors)) = result else {
        return Err(eyre::eyre!("expected form errors, got {result:?}"));
    };
    let rejected: Vec<FormField> = errors.errors().iter().map(|error| error.field()).collect();
    if rejected.iter().map(|rejected_field| rejected_field.as_str()).ne([field.as_str()]) {
        return Err(eyre::eyre!("expected only {field} to be rejected, got {rejected:?}"));
    }
    Ok(())
}

#[then("the board is empty")]
fn board_is_empty(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let count = world.board.tasks().len();
    if count != 0 {
        return Err(eyre::eyre!("expected an empty board, found {count} tasks"));
    }
    Ok(())
}
