// Panic isolation for job execution
use std::any::Any;
use tokio::task::JoinError;
use tracing::error;

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Describe why a spawned job did not return
///
/// Panics keep their message so the on-demand caller sees what went wrong.
pub fn describe_join_error(job: &str, join_err: JoinError) -> String {
    if join_err.is_panic() {
        let panic_msg = panic_message(join_err.into_panic().as_ref());
        error!(job, panic_msg = %panic_msg, "Job panicked");
        format!("{} panicked: {}", job, panic_msg)
    } else {
        error!(job, "Job cancelled");
        format!("{} was cancelled", job)
    }
}
