//! Application Layer - Use Cases

pub mod check_session;
pub mod config;
pub mod log_in;
pub mod log_out;
pub mod notify;
pub mod sign_up;

pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use log_in::{IssueTokenOutput, LogInInput, LogInOutput, LogInUseCase};
pub use log_out::LogOutUseCase;
pub use notify::{LogOnlyNotifier, NotifyError, WelcomeNotifier};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
