pub mod types;
pub mod dates;
pub mod normalize;
pub mod posted_log;
pub mod selector;
pub mod llm_adapter;
pub mod composer;
pub mod traits;
pub mod publisher;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod config;
pub mod pipeline;

pub use types::*;
pub use dates::extract_timestamp;
pub use normalize::normalize_url;
pub use posted_log::PostedLog;
pub use selector::select_candidates;
pub use llm_adapter::{GenerationRequest, LlmAdapter, MockLlmAdapter, OpenAiAdapter};
pub use composer::StatusComposer;
pub use traits::{FeedSource, NoteRequest, Publisher, Visibility};
pub use publisher::SharkeyPublisher;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::RssFeedSource;
pub use config::{CliOverrides, ReblogConfig};
pub use pipeline::{PipelineConfig, PublishPipeline, PublishTarget, RunReport};
