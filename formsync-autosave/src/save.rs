//! The persistence seam.
//!
//! The pipeline never knows how a record is stored; it hands the entity id
//! and the preprocessed snapshot to a [`SaveOperation`] and waits for the
//! outcome.

use crate::error::SaveError;
use async_trait::async_trait;
use formsync_types::{EntityId, FormSnapshot};
use std::future::Future;
use std::sync::Arc;

/// Persists one snapshot of a record.
#[async_trait]
pub trait SaveOperation: Send + Sync + 'static {
    /// What a successful save returns, typically the updated record.
    type Output: Send + Sync + 'static;

    /// Saves `values` as the new state of `entity_id`.
    async fn save(&self, entity_id: EntityId, values: FormSnapshot) -> Result<Self::Output, SaveError>;
}

#[async_trait]
impl<S: SaveOperation> SaveOperation for Arc<S> {
    type Output = S::Output;

    async fn save(&self, entity_id: EntityId, values: FormSnapshot) -> Result<Self::Output, SaveError> {
        (**self).save(entity_id, values).await
    }
}

/// Adapts an async closure into a [`SaveOperation`].
pub struct FnSave<F>(F);

/// Wraps `f` as a save operation.
pub fn save_fn<F, Fut, T>(f: F) -> FnSave<F>
where
    F: Fn(EntityId, FormSnapshot) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, SaveError>> + Send + 'static,
    T: Send + Sync + 'static,
{
    FnSave(f)
}

#[async_trait]
impl<F, Fut, T> SaveOperation for FnSave<F>
where
    F: Fn(EntityId, FormSnapshot) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, SaveError>> + Send + 'static,
    T: Send + Sync + 'static,
{
    type Output = T;

    async fn save(&self, entity_id: EntityId, values: FormSnapshot) -> Result<T, SaveError> {
        (self.0)(entity_id, values).await
    }
}

/// A scripted save operation for testing.
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// One recorded invocation.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SaveCall {
        pub entity_id: EntityId,
        pub values: FormSnapshot,
        pub at: Instant,
    }

    /// Sleeps for a fixed latency, then replays scripted outcomes (success
    /// echoing the saved values once the script runs out).
    #[derive(Debug)]
    pub struct ScriptedSave {
        latency: Duration,
        script: Mutex<VecDeque<(Duration, Result<(), SaveError>)>>,
        calls: Mutex<Vec<SaveCall>>,
    }

    impl ScriptedSave {
        /// Succeeds after `latency`.
        pub fn new(latency: Duration) -> Self {
            Self {
                latency,
                script: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Queues the outcome and latency of the next unscripted call.
        pub fn then(self, latency: Duration, outcome: Result<(), SaveError>) -> Self {
            self.script.lock().unwrap().push_back((latency, outcome));
            self
        }

        /// Queues a failure for the next unscripted call.
        pub fn then_fail(self, error: SaveError) -> Self {
            let latency = self.latency;
            self.then(latency, Err(error))
        }

        /// Every call made so far.
        pub fn calls(&self) -> Vec<SaveCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SaveOperation for ScriptedSave {
        type Output = FormSnapshot;

        async fn save(&self, entity_id: EntityId, values: FormSnapshot) -> Result<FormSnapshot, SaveError> {
            self.calls.lock().unwrap().push(SaveCall {
                entity_id,
                values: values.clone(),
                at: Instant::now(),
            });
            let (latency, outcome) = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((self.latency, Ok(())));
            tokio::time::sleep(latency).await;
            outcome.map(|()| values)
        }
    }
}
