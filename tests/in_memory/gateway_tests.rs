//! Lifecycle guards enforced by the in-memory gateway.

use super::helpers::{ACCEPTOR, POSTER, board, gateway, post, wallet};
use gigbounty::session::WalletSession;
use gigbounty::task::{
    adapters::memory::InMemoryTaskGateway,
    domain::{DisputeReason, ProofUrl, TaskDomainError, TaskStatus},
    ports::{GatewayMode, TaskGateway, TaskGatewayError},
};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_tasks_are_listed_newest_first(gateway: Arc<InMemoryTaskGateway>) -> eyre::Result<()> {
    let first = post(&gateway, "Write docs", "3").await?;
    let second = post(&gateway, "Fix bug", "4.5").await?;

    let listed = gateway.list_tasks(None).await?;

    eyre::ensure!(listed == vec![second.clone(), first], "unexpected order");
    eyre::ensure!(second.id().as_str().starts_with("local-"));
    eyre::ensure!(second.status() == TaskStatus::Open);
    eyre::ensure!(gateway.mode() == GatewayMode::Fixture);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeded_store_keeps_the_seed_in_order(
    gateway: Arc<InMemoryTaskGateway>,
) -> eyre::Result<()> {
    let first = post(&gateway, "Write docs", "3").await?;
    let second = post(&gateway, "Fix bug", "4.5").await?;
    let seed = vec![first.clone(), second.clone()];

    let seeded = InMemoryTaskGateway::seeded(seed.clone());

    eyre::ensure!(seeded.list_tasks(None).await? == seed, "seed should be kept as given");
    eyre::ensure!(seeded.get_task(second.id(), None).await? == second);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fixture_ids_are_unique(gateway: Arc<InMemoryTaskGateway>) -> eyre::Result<()> {
    let first = post(&gateway, "One", "1").await?;
    let second = post(&gateway, "Two", "1").await?;

    eyre::ensure!(first.id() != second.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_runs_to_completion(gateway: Arc<InMemoryTaskGateway>) -> eyre::Result<()> {
    let task = post(&gateway, "Translate", "8").await?;
    let poster = wallet(POSTER)?;
    let acceptor = wallet(ACCEPTOR)?;
    let proof = ProofUrl::new("https://proof.example/translation")?;

    gateway.claim(task.id(), &acceptor).await?;
    gateway.submit_proof(task.id(), &acceptor, &proof, false).await?;
    let completed = gateway.approve(task.id(), &poster).await?;

    eyre::ensure!(completed.status() == TaskStatus::Completed);
    eyre::ensure!(completed.worker() == Some(&acceptor));
    eyre::ensure!(completed.proof_url() == Some(&proof));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_transition_leaves_the_store_unchanged(
    gateway: Arc<InMemoryTaskGateway>,
) -> eyre::Result<()> {
    let task = post(&gateway, "Translate", "8").await?;
    let poster = wallet(POSTER)?;

    let result = gateway.claim(task.id(), &poster).await;

    eyre::ensure!(matches!(
        result,
        Err(TaskGatewayError::Domain(TaskDomainError::Unauthorized { .. }))
    ));
    eyre::ensure!(gateway.get_task(task.id(), None).await? == task);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disputes_freeze_the_task(gateway: Arc<InMemoryTaskGateway>) -> eyre::Result<()> {
    let task = post(&gateway, "Translate", "8").await?;
    let poster = wallet(POSTER)?;
    let acceptor = wallet(ACCEPTOR)?;
    gateway.claim(task.id(), &acceptor).await?;

    let reason = DisputeReason::new("Work never delivered")?;
    let disputed = gateway.dispute(task.id(), &poster, &reason).await?;
    let approve = gateway.approve(task.id(), &poster).await;

    eyre::ensure!(disputed.status() == TaskStatus::Disputed);
    eyre::ensure!(disputed.dispute().map(|dispute| &dispute.raised_by) == Some(&poster));
    eyre::ensure!(approve.is_err());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ai_verification_is_unavailable_in_fixture_mode(
    gateway: Arc<InMemoryTaskGateway>,
) -> eyre::Result<()> {
    let task = post(&gateway, "Translate", "8").await?;

    let result = gateway.ai_verify(task.id(), None).await;
    let escrow = gateway.escrow_info().await?;

    eyre::ensure!(matches!(result, Err(TaskGatewayError::Unsupported(_))));
    eyre::ensure!(!escrow.configured);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_over_fixture_store_tracks_my_tasks(
    gateway: Arc<InMemoryTaskGateway>,
) -> eyre::Result<()> {
    let task = post(&gateway, "Translate", "8").await?;
    post(&gateway, "Review", "2").await?;
    let board = board(gateway.clone());
    let acceptor = WalletSession::connected(wallet(ACCEPTOR)?);
    board.refresh(&acceptor).await?;

    board.claim(&acceptor, task.id()).await?;

    eyre::ensure!(board.claimed_by(&wallet(ACCEPTOR)?).len() == 1);
    eyre::ensure!(board.posted_by(&wallet(POSTER)?).len() == 2);
    eyre::ensure!(board.filter_by_label("Open")?.len() == 1);
    Ok(())
}
