//! Startup fallback from the remote service to fixture mode.

use super::helpers::temp_path;
use gigbounty::task::{
    adapters::http::HttpTaskGateway,
    ports::{GatewayMode, TaskGateway},
    services::{FixtureFallback, SelectionError, select_gateway},
};
use rstest::{fixture, rstest};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

/// Gateway pointed at a local port with nothing listening.
#[fixture]
fn unreachable() -> Arc<HttpTaskGateway> {
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .expect("reserve a local port");
    Arc::new(
        HttpTaskGateway::new(
            &format!("http://127.0.0.1:{port}"),
            Some(Duration::from_secs(2)),
        )
        .expect("build HTTP gateway"),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_service_falls_back_to_fixture_mode(
    unreachable: Arc<HttpTaskGateway>,
) -> eyre::Result<()> {
    let gateway = select_gateway(unreachable, &FixtureFallback::Empty).await?;

    eyre::ensure!(gateway.mode() == GatewayMode::Fixture);
    eyre::ensure!(gateway.list_tasks(None).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_fallback_reports_the_transport_error(unreachable: Arc<HttpTaskGateway>) {
    let result = select_gateway(unreachable, &FixtureFallback::Disabled).await;

    assert!(matches!(result, Err(SelectionError::Remote(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_fixture_file_is_reported(unreachable: Arc<HttpTaskGateway>) -> eyre::Result<()> {
    let path = temp_path("missing")?.join("tasks.json");

    let result = select_gateway(unreachable, &FixtureFallback::File(path)).await;

    eyre::ensure!(matches!(result, Err(SelectionError::Fixture(_))));
    Ok(())
}
