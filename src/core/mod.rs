//! Core modules for the agent

pub mod client;
pub mod clock;
pub mod collector;
pub mod reconciler;
pub mod cursor;
pub mod gate;
pub mod lexicon;
pub mod compositor;
pub mod mastodon;
pub mod scheduler;
pub mod api;

pub use client::RemoteClient;
pub use clock::{Clock, SystemClock};
pub use collector::PaginatedCollector;
pub use reconciler::SetReconciler;
pub use cursor::TimelineCursor;
pub use gate::ReplyGate;
pub use lexicon::{Lexicon, PartOfSpeech};
pub use compositor::{Compositor, DadCompositor, strip_html};
pub use mastodon::MastodonClient;
pub use scheduler::{PollScheduler, StatusHandle};
pub use api::{create_router, run_server};
