pub mod assist;
pub mod enhancers;
pub mod feedback;
pub mod page;
pub mod recommendation;
pub mod validator;

pub use crate::domain::model::{FieldKind, FieldOutcome, Notification, Recommendation};
pub use crate::domain::ports::RecommendationSource;
pub use crate::utils::error::Result;
