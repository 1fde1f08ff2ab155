mod dataset;
mod progress;
mod question;

pub use dataset::{Dataset, DatasetError};
pub use progress::Progress;
pub use question::{AnswerKey, Question, QuestionError};
