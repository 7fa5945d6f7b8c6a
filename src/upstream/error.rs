use thiserror::Error;

/// Why a fetch from the ordering service produced no payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16, body_excerpt: String },

    #[error("upstream did not return JSON data (content type: {0})")]
    UnexpectedContentType(String),

    #[error("upstream returned malformed JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl FetchError {
    /// Extra context worth showing to whoever triggered the sync.
    pub fn details(&self) -> Option<String> {
        match self {
            FetchError::UpstreamStatus { body_excerpt, .. } if !body_excerpt.is_empty() => {
                Some(body_excerpt.clone())
            }
            FetchError::UnexpectedContentType(ct) => Some(format!("content type: {ct}")),
            _ => None,
        }
    }
}

pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_counts_chars_not_bytes() {
        assert_eq!(excerpt("obědy", 3), "obě");
        assert_eq!(excerpt("ok", 500), "ok");
    }

    #[test]
    fn details_only_for_informative_variants() {
        let err = FetchError::UpstreamStatus {
            status: 401,
            body_excerpt: "session expired".into(),
        };
        assert_eq!(err.details().as_deref(), Some("session expired"));
        assert_eq!(err.to_string(), "upstream returned status 401");

        let err = FetchError::UpstreamStatus {
            status: 500,
            body_excerpt: String::new(),
        };
        assert!(err.details().is_none());

        let err = FetchError::UnexpectedContentType("text/html".into());
        assert_eq!(err.details().as_deref(), Some("content type: text/html"));
    }
}
