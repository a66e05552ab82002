pub mod adapters;
pub mod config;
pub mod core;
pub mod dom;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::HttpRecommendationClient;
pub use crate::config::AssistConfig;
pub use crate::core::assist::{ClickResult, Dispatch, Event, FormAssist};
pub use crate::dom::{Document, NodeId};
pub use crate::utils::error::{AssistError, Result};
