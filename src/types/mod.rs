//! Core types for the agent

mod account;
mod timeline;
mod report;
mod state;
mod decision;
mod status;
mod config;

pub use account::{AccountId, RelationSet, RelationKind, Cursor, Page};
pub use timeline::{StatusId, TimelineItem};
pub use report::{ReconciliationDelta, ReconciliationReport, ActionFailure, ReconcileOutcome, IterationReport};
pub use state::SchedulerState;
pub use decision::ReplyDecision;
pub use status::StatusSnapshot;
pub use config::{BotConfig, PolicyConfig};
