#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod http;
pub mod memory;

pub use api::{AnswerReceipt, ApiError, Feedback, InterviewApi, QuestionDetail};
pub use config::{ConfigError, RemoteConfig};
pub use http::HttpInterviewApi;
pub use memory::InMemoryInterviewApi;
