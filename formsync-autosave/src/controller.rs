//! Per-form autosave controller.
//!
//! The controller owns the editable form values and, once started, a driver
//! task that runs the pipeline as an explicit state machine:
//!
//! ```text
//! Idle   --edit-->  Typing   (debounce timer restarts on every edit)
//! Typing --quiet--> Saving   (ticket dispatched, save spawned)
//! Saving --edit-->  Typing
//! Saving --ok-->    Idle     (success hook runs)
//! Saving --err-->   Error    (error stored, pipeline keeps running)
//! Error  --edit-->  Typing
//! ```
//!
//! Only the save holding the latest ticket may touch the state when it
//! completes.

use crate::config::AutosaveConfig;
use crate::debouncer::ChangeDebouncer;
use crate::error::{AutosaveError, AutosaveResult, SaveError};
use crate::error_sink::ErrorSink;
use crate::hooks::{DefaultHooks, SaveHooks};
use crate::save::SaveOperation;
use crate::serializer::{SaveSerializer, SaveTicket};
use crate::state::{AutosaveStatus, PipelineState};
use formsync_types::{EntityId, FormSnapshot};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Editable values of the bound form.
#[derive(Debug)]
struct FormState {
    values: FormSnapshot,
    /// Present while the pipeline observes edits.
    edits: Option<mpsc::UnboundedSender<FormSnapshot>>,
    started: bool,
}

/// Autosave for one form bound to one record.
pub struct AutosaveController<S, H = DefaultHooks>
where
    S: SaveOperation,
    H: SaveHooks<S::Output>,
{
    entity_id: EntityId,
    save: Arc<S>,
    hooks: Arc<H>,
    config: AutosaveConfig,
    form: Option<FormState>,
    state: Arc<watch::Sender<PipelineState>>,
    driver: Option<JoinHandle<()>>,
}

impl<S: SaveOperation> AutosaveController<S, DefaultHooks> {
    /// Creates a controller with default hooks and configuration.
    pub fn with_defaults(entity_id: EntityId, save: S) -> Self {
        Self::new(entity_id, save, DefaultHooks, AutosaveConfig::default())
    }
}

impl<S, H> AutosaveController<S, H>
where
    S: SaveOperation,
    H: SaveHooks<S::Output>,
{
    /// Creates an unbound controller for `entity_id`.
    pub fn new(entity_id: EntityId, save: S, hooks: H, config: AutosaveConfig) -> Self {
        Self {
            entity_id,
            save: Arc::new(save),
            hooks: Arc::new(hooks),
            config,
            form: None,
            state: Arc::new(watch::Sender::new(PipelineState::default())),
            driver: None,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Creates the editable form state. Binding again replaces the form and
    /// tears down a running pipeline.
    pub fn bind_form(&mut self, initial_values: FormSnapshot) {
        if self.form.is_some() {
            self.stop();
            self.state.send_replace(PipelineState::default());
        }
        debug!("Bound form for entity {} ({} fields)", self.entity_id, initial_values.len());
        self.form = Some(FormState {
            values: initial_values,
            edits: None,
            started: false,
        });
    }

    /// Starts observing edits. Allowed once per binding.
    pub fn start(&mut self) -> AutosaveResult<()> {
        let entity_id = self.entity_id;
        let form = self.form.as_mut().ok_or(AutosaveError::NotBound(entity_id))?;
        if form.started {
            return Err(AutosaveError::AlreadyStarted(entity_id));
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| AutosaveError::NoRuntime)?;

        let (edits_tx, edits_rx) = mpsc::unbounded_channel();
        let pipeline = Pipeline {
            entity_id,
            save: self.save.clone(),
            hooks: self.hooks.clone(),
            state: self.state.clone(),
            debouncer: ChangeDebouncer::new(self.config.quiet_period),
            serializer: SaveSerializer::new(),
            errors: ErrorSink::new(),
            running_hooks: JoinSet::new(),
        };
        form.edits = Some(edits_tx);
        form.started = true;
        self.driver = Some(runtime.spawn(pipeline.run(edits_rx)));

        info!(
            "Autosave started for entity {} (quiet period {:?})",
            entity_id, self.config.quiet_period
        );
        Ok(())
    }

    /// Stops the pipeline: the pending debounce is dropped, running success
    /// hooks are aborted and outstanding saves can no longer change state or
    /// fire hooks. Idempotent.
    pub fn stop(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.edits = None;
        }
        if let Some(driver) = self.driver.take() {
            driver.abort();
            info!("Autosave stopped for entity {}", self.entity_id);
        }
    }

    /// Switches to another record: stops, resets the state and binds the new
    /// form. Outcomes of saves for the previous record are discarded.
    pub fn rebind(&mut self, entity_id: EntityId, initial_values: FormSnapshot) {
        self.stop();
        self.state.send_replace(PipelineState::default());
        debug!("Rebinding autosave from entity {} to {}", self.entity_id, entity_id);
        self.entity_id = entity_id;
        self.form = None;
        self.bind_form(initial_values);
    }

    // ── Editing ──────────────────────────────────────────────────

    /// Sets one field, as a form control would.
    pub fn set_value(&mut self, field: impl Into<String>, value: impl Into<Value>) -> AutosaveResult<()> {
        let form = self.form_mut()?;
        form.values.set(field, value);
        Self::emit(form);
        Ok(())
    }

    /// Sets several fields at once, emitting a single edit.
    pub fn patch(&mut self, changes: FormSnapshot) -> AutosaveResult<()> {
        let form = self.form_mut()?;
        form.values.merge(changes);
        Self::emit(form);
        Ok(())
    }

    /// Current form values, if bound.
    pub fn values(&self) -> Option<&FormSnapshot> {
        self.form.as_ref().map(|f| &f.values)
    }

    fn form_mut(&mut self) -> AutosaveResult<&mut FormState> {
        let entity_id = self.entity_id;
        self.form.as_mut().ok_or(AutosaveError::NotBound(entity_id))
    }

    fn emit(form: &FormState) {
        if let Some(edits) = &form.edits {
            // A closed channel means the driver is gone; the edit stays local.
            let _ = edits.send(form.values.clone());
        }
    }

    // ── Read-only state ──────────────────────────────────────────

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn config(&self) -> &AutosaveConfig {
        &self.config
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn is_bound(&self) -> bool {
        self.form.is_some()
    }

    /// Whether the pipeline is currently running.
    pub fn is_started(&self) -> bool {
        self.driver.as_ref().is_some_and(|d| !d.is_finished())
    }

    /// Snapshot of the pipeline state.
    pub fn state(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    pub fn saving(&self) -> bool {
        self.state.borrow().saving
    }

    pub fn typing(&self) -> bool {
        self.state.borrow().typing
    }

    pub fn error(&self) -> Option<SaveError> {
        self.state.borrow().error.clone()
    }

    pub fn status(&self) -> AutosaveStatus {
        self.state.borrow().status()
    }

    /// Observes every state change, for re-rendering.
    pub fn watch_state(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }
}

impl<S, H> Drop for AutosaveController<S, H>
where
    S: SaveOperation,
    H: SaveHooks<S::Output>,
{
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S, H> std::fmt::Debug for AutosaveController<S, H>
where
    S: SaveOperation,
    H: SaveHooks<S::Output>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveController")
            .field("entity_id", &self.entity_id)
            .field("config", &self.config)
            .field("bound", &self.is_bound())
            .field("started", &self.is_started())
            .field("state", &*self.state.borrow())
            .finish()
    }
}

type Completion<T> = (SaveTicket, Result<T, SaveError>);

/// The driver task's half of a running controller.
struct Pipeline<S, H> {
    entity_id: EntityId,
    save: Arc<S>,
    hooks: Arc<H>,
    state: Arc<watch::Sender<PipelineState>>,
    debouncer: ChangeDebouncer,
    serializer: SaveSerializer,
    errors: ErrorSink,
    /// Success hooks still running; aborted when the pipeline is dropped.
    running_hooks: JoinSet<()>,
}

impl<S, H> Pipeline<S, H>
where
    S: SaveOperation,
    H: SaveHooks<S::Output>,
{
    async fn run(mut self, mut edits: mpsc::UnboundedReceiver<FormSnapshot>) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion<S::Output>>();

        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                edit = edits.recv() => match edit {
                    Some(snapshot) => self.on_edit(snapshot),
                    None => {
                        debug!("Form for entity {} detached, stopping pipeline", self.entity_id);
                        break;
                    }
                },
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.on_quiet(&done_tx);
                }
                Some((ticket, outcome)) = done_rx.recv() => {
                    self.on_complete(ticket, outcome);
                }
                Some(finished) = self.running_hooks.join_next(), if !self.running_hooks.is_empty() => {
                    if let Err(e) = finished {
                        warn!("Success hook for entity {} failed: {}", self.entity_id, e);
                    }
                }
            }
        }

        self.debouncer.cancel();
        self.serializer.invalidate();
    }

    fn on_edit(&mut self, snapshot: FormSnapshot) {
        self.debouncer.push(snapshot, Instant::now());
        self.state.send_modify(PipelineState::begin_typing);
    }

    fn on_quiet(&mut self, done_tx: &mpsc::UnboundedSender<Completion<S::Output>>) {
        let Some(snapshot) = self.debouncer.take_due(Instant::now()) else {
            return;
        };
        let values = self.hooks.preprocess_snapshot(snapshot);
        let ticket = self.serializer.dispatch();

        let errors = &self.errors;
        self.state.send_modify(|s| {
            errors.clear(s);
            s.begin_saving();
        });
        debug!("Saving entity {} (save #{})", self.entity_id, ticket.generation());

        let save = self.save.clone();
        let entity_id = self.entity_id;
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let outcome = save.save(entity_id, values).await;
            // The receiver is gone once the pipeline stopped.
            let _ = done_tx.send((ticket, outcome));
        });
    }

    fn on_complete(&mut self, ticket: SaveTicket, outcome: Result<S::Output, SaveError>) {
        if !self.serializer.complete(ticket) {
            return;
        }
        match outcome {
            Ok(saved) => {
                self.state.send_modify(PipelineState::finish_saving);
                info!("Autosaved entity {} (save #{})", self.entity_id, ticket.generation());
                // Runs beside the loop so edits and deadlines keep being served.
                let hooks = self.hooks.clone();
                let entity_id = self.entity_id;
                self.running_hooks.spawn(async move {
                    hooks.on_successful_save(entity_id, &saved).await;
                });
            }
            Err(error) => {
                let entity_id = self.entity_id;
                let errors = &mut self.errors;
                self.state.send_modify(|s| errors.record(s, entity_id, error));
            }
        }
    }
}
