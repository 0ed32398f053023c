//! Parallel Coordinator: owns a fixed pool of worker actors and distributes
//! one work item per application to them round-robin. Dispatch blocks on a
//! full mailbox, which is the pool's only backpressure mechanism — the
//! Processor refills its batch no faster than workers drain it.

use crate::{
    actor::ActorRef,
    error::RunError,
    messages::{WorkResult, WorkStatus, WorkerMsg},
    spawn::spawn_actor,
    worker::WorkerActor,
};
use connectors::Destination;
use model::{contract::Contract, core::identifiers::AppId};
use std::sync::Arc;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

/// How long the coordinator waits for already-dispatched items to finish
/// once cancellation is requested, before giving up and returning whatever
/// results have arrived.
const CANCEL_DRAIN_GRACE: Duration = Duration::from_secs(310);

/// Mailbox capacity per worker. Kept small so a coordinator dispatching a
/// 500-item batch round-robin blocks quickly once workers fall behind,
/// rather than buffering the whole batch in memory.
const WORKER_MAILBOX_CAPACITY: usize = 2;

pub struct Coordinator {
    worker_refs: Vec<ActorRef<WorkerMsg>>,
    worker_handles: Vec<JoinHandle<()>>,
    results_rx: mpsc::Receiver<WorkResult>,
    next_worker: usize,
    cancel_token: CancellationToken,
}

impl Coordinator {
    /// Connects `worker_count` destinations (one per worker, never shared)
    /// and spawns that many worker actors.
    pub async fn connect(
        conn_str: &str,
        worker_count: usize,
        contract: Arc<Contract>,
        cancel_token: CancellationToken,
    ) -> Result<Self, RunError> {
        let (results_tx, results_rx) = mpsc::channel(worker_count * WORKER_MAILBOX_CAPACITY);

        let mut worker_refs = Vec::with_capacity(worker_count);
        let mut worker_handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let destination = Destination::connect(conn_str).await?;
            let actor = WorkerActor {
                worker_id,
                destination,
                contract: contract.clone(),
                results_tx: results_tx.clone(),
            };
            let (actor_ref, handle) =
                spawn_actor(format!("worker-{worker_id}"), WORKER_MAILBOX_CAPACITY, actor);
            worker_refs.push(actor_ref);
            worker_handles.push(handle);
        }
        drop(results_tx);

        Ok(Self {
            worker_refs,
            worker_handles,
            results_rx,
            next_worker: 0,
            cancel_token,
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Dispatches `items` round-robin across the pool and waits for every
    /// dispatched item's result. Stops dispatching as soon as cancellation
    /// is observed, mid-batch if necessary, and returns only the results
    /// for items actually sent — a partial result set, per the cancellation
    /// contract.
    pub async fn run_batch(
        &mut self,
        items: Vec<(AppId, String)>,
    ) -> Result<Vec<WorkResult>, RunError> {
        let mut dispatched = 0usize;
        for (app_id, xml) in items {
            if self.cancel_token.is_cancelled() {
                break;
            }
            let worker = &self.worker_refs[self.next_worker % self.worker_refs.len()];
            self.next_worker = self.next_worker.wrapping_add(1);
            worker
                .send(WorkerMsg::Process { app_id, xml })
                .await
                .map_err(RunError::from)?;
            dispatched += 1;
        }

        let mut results = Vec::with_capacity(dispatched);
        let recv_all = async {
            for _ in 0..dispatched {
                match self.results_rx.recv().await {
                    Some(result) => results.push(result),
                    None => break,
                }
            }
        };

        if self.cancel_token.is_cancelled() {
            let _ = tokio::time::timeout(CANCEL_DRAIN_GRACE, recv_all).await;
        } else {
            recv_all.await;
        }

        Ok(results)
    }

    /// Drops every worker's mailbox sender and waits for all worker tasks
    /// to finish their in-flight item (if any) and exit.
    pub async fn shutdown(self) {
        drop(self.worker_refs);
        for handle in self.worker_handles {
            let _ = handle.await;
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_refs.len()
    }
}

/// Summarizes a batch of [`WorkResult`]s into success/failure counts, used
/// by the Processor to decide what to write to the processing log.
pub fn partition_results(results: &[WorkResult]) -> (usize, usize) {
    let succeeded = results
        .iter()
        .filter(|r| matches!(r.status, WorkStatus::Success { .. }))
        .count();
    (succeeded, results.len() - succeeded)
}
