//! Secret handling utilities.
//!
//! Re-exports secrecy types and provides helpers for keeping the
//! database credentials out of logs.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

/// Render a connection URL with its password replaced, for log lines.
pub fn redacted_url(url: &SecretString) -> String {
    let raw = url.expose_secret();
    let Some((scheme, rest)) = raw.split_once("://") else {
        return "<redacted>".to_string();
    };
    match rest.split_once('@') {
        Some((userinfo, host)) => {
            let user = userinfo.split(':').next().unwrap_or_default();
            format!("{scheme}://{user}:***@{host}")
        }
        None => format!("{scheme}://{rest}"),
    }
}
