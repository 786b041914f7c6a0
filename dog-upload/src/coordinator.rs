use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, instrument, warn, Instrument};

use crate::{
    planner, CompletionManifest, EmptyInputPolicy, PartResult, PartSource, PartSpec,
    PartTransport, PartUploader, RunId, SessionCoordinator, SigningAuthority, UploadConfig,
    UploadError, UploadReceipt, UploadResult, UploadSession, UploadState, UploadTarget,
};

/// Runs the initiate → upload parts → complete protocol for whole objects
#[derive(Clone)]
pub struct MultipartUploader {
    sessions: SessionCoordinator,
    parts: PartUploader,
    config: UploadConfig,
}

impl MultipartUploader {
    pub fn new<A, T>(authority: A, transport: T, config: UploadConfig) -> Self
    where
        A: SigningAuthority + 'static,
        T: PartTransport + 'static,
    {
        Self::from_shared(Arc::new(authority), Arc::new(transport), config)
    }

    /// Create from collaborators that are shared with other code
    pub fn from_shared(
        authority: Arc<dyn SigningAuthority>,
        transport: Arc<dyn PartTransport>,
        config: UploadConfig,
    ) -> Self {
        let parts = PartUploader::new(transport, config.content_type.clone());
        Self {
            sessions: SessionCoordinator::new(authority),
            parts,
            config,
        }
    }

    /// Get configuration
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Upload `target`, reading part bodies from `source`, and wait for the outcome
    pub async fn upload<S>(&self, target: UploadTarget, source: S) -> UploadResult<UploadReceipt>
    where
        S: PartSource + 'static,
    {
        let (state, _) = watch::channel(UploadState::Idle);
        self.run(RunId::new(), target, Arc::new(source), state).await
    }

    /// Spawn the upload onto the runtime and return a handle to observe it
    pub fn start<S>(&self, target: UploadTarget, source: S) -> UploadHandle
    where
        S: PartSource + 'static,
    {
        let run_id = RunId::new();
        let (state, receiver) = watch::channel(UploadState::Idle);
        let uploader = self.clone();
        let id = run_id.clone();
        let task =
            tokio::spawn(async move { uploader.run(id, target, Arc::new(source), state).await });

        UploadHandle {
            run_id,
            state: receiver,
            task,
        }
    }

    #[instrument(
        name = "upload",
        skip_all,
        fields(run_id = %run_id, object = %target.name, total_bytes = target.total_bytes)
    )]
    async fn run(
        &self,
        run_id: RunId,
        target: UploadTarget,
        source: Arc<dyn PartSource>,
        state: watch::Sender<UploadState>,
    ) -> UploadResult<UploadReceipt> {
        let tracker = StateTracker { state };

        let parts = match self.plan_parts(&target) {
            Ok(parts) => parts,
            Err(e) => {
                warn!(error = %e, "upload rejected before initiating a session");
                tracker.advance(UploadState::Failed);
                return Err(e);
            }
        };

        let session = match self.sessions.initiate_session(&target).await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "upload failed");
                tracker.advance(UploadState::Failed);
                return Err(e);
            }
        };
        tracker.advance(UploadState::SessionInitiated);

        match self.transfer_and_complete(&session, parts, source, &tracker).await {
            Ok((manifest, location)) => {
                tracker.advance(UploadState::Finalized);
                info!(parts = manifest.len(), "upload finalized");

                Ok(UploadReceipt {
                    run_id,
                    object_name: target.name,
                    session_id: session.session_id,
                    total_bytes: target.total_bytes,
                    part_size: self.config.part_size,
                    parts: manifest,
                    location,
                    completed_at: chrono::Utc::now().timestamp(),
                })
            }
            Err(e) => {
                warn!(
                    error = %e,
                    phase = %e.phase(),
                    part_number = ?e.part_number(),
                    "upload failed"
                );
                tracker.advance(UploadState::Failed);
                if self.config.abort_on_failure {
                    self.sessions.abort_session(&session).await;
                }
                Err(e)
            }
        }
    }

    /// Plan parts for the target, applying limits and the empty-input policy
    fn plan_parts(&self, target: &UploadTarget) -> UploadResult<Vec<PartSpec>> {
        self.config.validate()?;

        let count = planner::part_count(target.total_bytes, self.config.part_size);
        if count > u64::from(self.config.max_parts) {
            return Err(UploadError::TooManyParts {
                parts: count,
                max: self.config.max_parts,
            });
        }

        if count == 0 {
            return match self.config.empty_input {
                EmptyInputPolicy::Reject => Err(UploadError::EmptyInput {
                    name: target.name.clone(),
                }),
                EmptyInputPolicy::SingleEmptyPart => Ok(vec![PartSpec {
                    part_number: 1,
                    start: 0,
                    end: 0,
                }]),
            };
        }

        Ok(planner::plan(target.total_bytes, self.config.part_size))
    }

    async fn transfer_and_complete(
        &self,
        session: &UploadSession,
        parts: Vec<PartSpec>,
        source: Arc<dyn PartSource>,
        tracker: &StateTracker,
    ) -> UploadResult<(Vec<PartResult>, Option<String>)> {
        let expected = parts.len() as u32;

        tracker.advance(UploadState::PartsInFlight);
        let results = self.upload_parts(session, parts, source).await?;
        tracker.advance(UploadState::PartsComplete);

        let manifest = CompletionManifest::build(results, expected)?;
        let submitted = manifest.parts().to_vec();
        let ack = self.sessions.complete(session, manifest).await?;

        Ok((submitted, ack.location))
    }

    /// Fan out every part into a task group and join on all of them or the first failure
    async fn upload_parts(
        &self,
        session: &UploadSession,
        parts: Vec<PartSpec>,
        source: Arc<dyn PartSource>,
    ) -> UploadResult<Vec<PartResult>> {
        let limiter = self
            .config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit)));
        let session = Arc::new(session.clone());

        let mut tasks = JoinSet::new();
        for part in parts {
            let span = tracing::debug_span!("part", part_number = part.part_number);
            tasks.spawn(
                transfer_part(
                    self.sessions.clone(),
                    self.parts.clone(),
                    Arc::clone(&session),
                    Arc::clone(&source),
                    part,
                    limiter.clone(),
                )
                .instrument(span),
            );
        }
        debug!(launched = tasks.len(), limit = ?self.config.max_concurrency, "parts launched");

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| UploadError::TaskFailed {
                    message: e.to_string(),
                })
                .and_then(|result| result);

            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    if self.config.cancel_on_failure {
                        tasks.abort_all();
                        while tasks.join_next().await.is_some() {}
                        debug!("sibling parts cancelled");
                    } else {
                        // Siblings must settle before the session can be aborted
                        debug!(in_flight = tasks.len(), "waiting for sibling parts to finish");
                        while tasks.join_next().await.is_some() {}
                    }
                    return Err(e);
                }
            }
        }

        Ok(results)
    }
}

/// Read, sign and upload a single part
async fn transfer_part(
    sessions: SessionCoordinator,
    uploader: PartUploader,
    session: Arc<UploadSession>,
    source: Arc<dyn PartSource>,
    part: PartSpec,
    limiter: Option<Arc<Semaphore>>,
) -> UploadResult<PartResult> {
    let _permit = match limiter {
        Some(limiter) => Some(limiter.acquire_owned().await.map_err(|_| {
            UploadError::TaskFailed {
                message: "concurrency limiter closed".to_string(),
            }
        })?),
        None => None,
    };

    let body = source
        .read_part(&part)
        .await
        .map_err(|source| UploadError::PartRead {
            part_number: part.part_number,
            source,
        })?;

    let signed = sessions.sign_part(&session, part).await?;
    uploader.upload_part(&signed, body).await
}

/// Publishes state transitions of one run
struct StateTracker {
    state: watch::Sender<UploadState>,
}

impl StateTracker {
    fn advance(&self, next: UploadState) {
        let current = *self.state.borrow();
        debug_assert!(
            current.can_advance_to(next),
            "illegal upload state transition {current} -> {next}"
        );
        info!(from = %current, to = %next, "upload state changed");
        self.state.send_replace(next);
    }
}

/// Handle to an upload spawned with [`MultipartUploader::start`]
pub struct UploadHandle {
    run_id: RunId,
    state: watch::Receiver<UploadState>,
    task: JoinHandle<UploadResult<UploadReceipt>>,
}

impl UploadHandle {
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Current state of the run
    pub fn state(&self) -> UploadState {
        *self.state.borrow()
    }

    /// Receiver that is notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.clone()
    }

    /// Wait for the run to end
    pub async fn wait(self) -> UploadResult<UploadReceipt> {
        self.task.await.map_err(|e| UploadError::TaskFailed {
            message: e.to_string(),
        })?
    }
}
