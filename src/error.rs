use thiserror::Error;

/// Failures surfaced by the metadata client.
///
/// Callers never recover from these inside the client; views catch them at the top of
/// their fetch sequence and fall back to an empty state.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("missing required credential {0}; set it in the environment or .env file")]
    MissingCredential(&'static str),

    #[error("upstream returned HTTP {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TmdbError {
    /// HTTP status carried by the failure, if the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TmdbError::Status { status, .. } => Some(*status),
            TmdbError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type TmdbResult<T> = std::result::Result<T, TmdbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_reports_code() {
        let err = TmdbError::Status {
            status: 404,
            endpoint: "/movie/1".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "upstream returned HTTP 404 for /movie/1");
    }

    #[test]
    fn missing_credential_names_variable() {
        let err = TmdbError::MissingCredential("TMDB_API_KEY");
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("TMDB_API_KEY"));
    }
}
