//! Network actor - runs API calls in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::api::ApiClient;
use crate::messages::{NetworkCommand, NetworkResponse};

/// Network actor that executes API calls, one task per call
pub struct NetworkActor {
    client: ApiClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: ApiClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Call { id, call }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                let label = call.label();
                                tracing::info!(id, call = %label, "Executing call");
                                let result = call.execute(&client).await;
                                match &result {
                                    Ok(_) => tracing::info!(id, call = %label, "Call completed"),
                                    Err(e) => tracing::warn!(id, call = %label, error = %e, "Call failed"),
                                }
                                let _ = response_tx.send(NetworkResponse::Completed { id, result });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Reap finished tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::{client_for, serve_once};
    use crate::api::{ApiCall, Reply};
    use crate::models::ResourceKind;

    #[tokio::test]
    async fn test_call_reply_carries_id() {
        let (base, server) = serve_once(200, "[]").await;
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        tokio::spawn(NetworkActor::new(client_for(&base), resp_tx).run(cmd_rx));
        cmd_tx
            .send(NetworkCommand::Call { id: 42, call: ApiCall::List(ResourceKind::Team) })
            .unwrap();

        let NetworkResponse::Completed { id, result } = resp_rx.recv().await.unwrap();
        server.await.unwrap();
        assert_eq!(id, 42);
        assert!(matches!(result, Ok(Reply::Response(_))));

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
    }
}
