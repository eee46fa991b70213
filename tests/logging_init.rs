use repowatch::logging::{init_logging, LOG_ENV_VAR};
use repowatch::types::LogLevel;

// Own test binary: the global subscriber is process-wide.
#[test]
fn logging_installs_once() {
    assert_eq!(LOG_ENV_VAR, "REPOWATCH_LOG");

    assert!(init_logging(Some(LogLevel::Debug)).is_ok());
    tracing::debug!("logging initialised");

    assert!(init_logging(None).is_err());
}
