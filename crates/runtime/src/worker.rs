//! A worker actor: owns one destination connection for its lifetime,
//! receives `(app_id, xml)` items on its mailbox, and runs each through
//! Validate → Parse → Map → Migrate in strict sequence. A crash or panic in
//! one worker's task cannot reach another worker's connection, since the
//! mailbox is the only way in and connections are never shared.

use crate::{
    actor::{Actor, ActorContext},
    error::ActorError,
    messages::{WorkResult, WorkerMsg},
};
use async_trait::async_trait;
use connectors::Destination;
use mapping::MappingEngine;
use model::{contract::Contract, core::identifiers::AppId};
use roxmltree::Document;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Per-application processing must complete within this bound or the
/// worker abandons it, dropping its transaction (which rolls back in the
/// background) and reporting a failure instead of hanging the pool.
pub const APPLICATION_TIMEOUT: Duration = Duration::from_secs(300);

pub struct WorkerActor {
    pub worker_id: usize,
    pub destination: Destination,
    pub contract: Arc<Contract>,
    pub results_tx: mpsc::Sender<WorkResult>,
}

impl WorkerActor {
    async fn process_one(&mut self, app_id: AppId, xml: &str) -> WorkResult {
        let doc = match Document::parse(xml) {
            Ok(doc) => doc,
            Err(e) => return WorkResult::failed(app_id, format!("malformed xml: {e}")),
        };

        let outcome = mapping::validate(&doc, &self.contract);
        if !outcome.can_process {
            return WorkResult::failed(app_id, outcome.errors.join("; "));
        }

        let rows = match MappingEngine::apply_contract(app_id, &doc, &self.contract) {
            Ok(rows) => rows,
            Err(e) => return WorkResult::failed(app_id, e.to_string()),
        };

        match engine_core::migrate_application(
            self.destination.client_mut(),
            &self.contract,
            app_id,
            rows,
        )
        .await
        {
            Ok(counts) => WorkResult::success(app_id, &counts),
            Err(e) => WorkResult::failed(app_id, e.to_string()),
        }
    }
}

#[async_trait]
impl Actor<WorkerMsg> for WorkerActor {
    async fn handle(&mut self, msg: WorkerMsg, ctx: &ActorContext) -> Result<(), ActorError> {
        let WorkerMsg::Process { app_id, xml } = msg;

        let result = match tokio::time::timeout(APPLICATION_TIMEOUT, self.process_one(app_id, &xml)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(actor = %ctx.name(), app_id = %app_id, "application timed out, transaction rolled back");
                WorkResult::failed(app_id, format!("worker timed out after {}s", APPLICATION_TIMEOUT.as_secs()))
            }
        };

        info!(actor = %ctx.name(), worker_id = self.worker_id, app_id = %app_id, "application processed");
        self.results_tx
            .send(result)
            .await
            .map_err(|_| ActorError::MailboxClosed)
    }
}
