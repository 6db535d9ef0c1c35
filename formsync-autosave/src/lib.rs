//! Debounced autosave pipeline for formsync.
//!
//! Watches edits to a form, coalesces bursts of edits into one save after a
//! quiet period, keeps only the latest save's outcome, and surfaces
//! typing/saving/error state to the UI. A successful save can announce
//! itself to other contexts through `formsync-channel`.
//!
//! # Architecture
//!
//! ## Components
//!
//! - **Normalizer**: turns multi-select option objects back into keys
//! - **Debouncer**: trailing-edge quiet-period timer over snapshots
//! - **Serializer**: save tickets; only the latest may change state
//! - **ErrorSink**: stores failures without stopping the pipeline
//! - **Controller**: owns the form and drives the components above
//! - **Hooks**: preprocessing and post-save extension points
//!
//! ## Data flow
//!
//! 1. **Edit**: the form emits a snapshot, `typing` is set
//! 2. **Quiet**: no edit for the quiet period, the snapshot is preprocessed
//! 3. **Save**: a ticket is dispatched and the save operation spawned
//! 4. **Settle**: the current ticket's outcome clears `saving` and either
//!    runs the success hook or records the error
//!
//! # Example
//!
//! ```
//! use formsync_autosave::{save_fn, AutosaveController, SaveError};
//! use formsync_types::{EntityId, FormSnapshot};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let save = save_fn(|_id: EntityId, values: FormSnapshot| async move {
//!     Ok::<_, SaveError>(values)
//! });
//! let mut controller = AutosaveController::with_defaults(EntityId::new(7), save);
//! controller.bind_form(FormSnapshot::new().with("name", "A"));
//! controller.start().unwrap();
//! controller.set_value("name", "B").unwrap();
//! # }
//! ```

mod config;
mod controller;
pub mod debouncer;
mod error;
pub mod error_sink;
pub mod hooks;
pub mod normalizer;
pub mod save;
pub mod serializer;
mod state;

pub use config::{AutosaveConfig, DEFAULT_QUIET_PERIOD};
pub use controller::AutosaveController;
pub use debouncer::ChangeDebouncer;
pub use error::{AutosaveError, AutosaveResult, SaveError};
pub use error_sink::ErrorSink;
pub use hooks::{AnnounceOnSave, CacheOnSave, DefaultHooks, SaveHooks};
pub use normalizer::{is_enum_option, is_enum_selection, normalize_enum_selections, normalize_value};
pub use save::{save_fn, FnSave, SaveOperation};
pub use serializer::{SaveSerializer, SaveTicket};
pub use state::{AutosaveStatus, PipelineState};
