mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use progress::ProgressView;
pub use service::QuizSession;
pub use view::{NextLabel, OptionMark, OptionView, QuestionView, Screen, SummaryView};
pub use workflow::{BootedQuiz, DatasetOrigin, QuizService};
