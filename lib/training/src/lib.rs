//! Dialog training services for the medtrain platform.
//!
//! Ties the dialog engine, the stores and the text generator together into
//! the operations the HTTP surface exposes: starting a training dialog,
//! exchanging messages with the simulated patient and reading back history.

pub mod error;
pub mod service;
pub mod view;

pub use error::{TrainingError, UpstreamFailure};
pub use service::{SendMessage, StartTraining, TrainingConfig, TrainingService};
pub use view::{DialogHistory, DialogOverview, Exchange, StartedDialog, TurnView};
