#![forbid(unsafe_code)]

pub mod app_services;
pub mod dataset_source;
pub mod error;
pub mod sample;
pub mod sessions;

pub use app_services::AppServices;
pub use dataset_source::{
    DatasetFetcher, DatasetSourceConfig, FileDatasetFetcher, HttpDatasetFetcher,
};
pub use error::{AppServicesError, LoadError, OverrideError, QuizError};
pub use sessions::{
    BootedQuiz, DatasetOrigin, NextLabel, OptionMark, OptionView, ProgressView, QuestionView,
    QuizService, QuizSession, Screen, SummaryView,
};
