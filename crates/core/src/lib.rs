#![forbid(unsafe_code)]

pub mod model;
pub mod normalize;
pub mod router;
pub mod session;

pub use model::{AnswerKey, Dataset, DatasetError, Progress, Question, QuestionError};
pub use normalize::normalize;
pub use router::{NavState, NavToken, Router};
pub use session::{AnswerOutcome, Resume, SessionEvent, SessionState};
