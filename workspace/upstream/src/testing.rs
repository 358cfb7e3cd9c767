//! Local stand-ins for the upstream services, served on an ephemeral port.

use axum::Router;
use tokio::net::TcpListener;

/// Serves `app` on `127.0.0.1:0` and returns its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test upstream");
    let address = listener.local_addr().expect("Failed to read test upstream address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test upstream crashed");
    });
    format!("http://{}", address)
}

/// A base URL nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let address = listener.local_addr().expect("Failed to read probe address");
    drop(listener);
    format!("http://{}", address)
}
