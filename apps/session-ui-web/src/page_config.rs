use session_ui_core::{ConfigError, SessionUiConfig};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(test, expect(dead_code))]
pub(crate) enum WebShellError {
    #[error("window is unavailable")]
    WindowUnavailable,
    #[error("document is unavailable")]
    DocumentUnavailable,
    #[error("local storage is unavailable")]
    StorageUnavailable,
    #[error("page config global `{global}` must be a JSON string or object")]
    ConfigNotJson { global: &'static str },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What the page put in the config global, after the JS value was inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageConfigSource {
    Missing,
    Json(String),
    Unsupported,
}

pub(crate) fn config_from_page(
    source: PageConfigSource,
    global: &'static str,
) -> Result<SessionUiConfig, WebShellError> {
    match source {
        PageConfigSource::Missing => Ok(SessionUiConfig::default()),
        PageConfigSource::Json(raw) if raw.trim().is_empty() => Ok(SessionUiConfig::default()),
        PageConfigSource::Json(raw) => Ok(SessionUiConfig::from_json(&raw)?),
        PageConfigSource::Unsupported => Err(WebShellError::ConfigNotJson { global }),
    }
}
