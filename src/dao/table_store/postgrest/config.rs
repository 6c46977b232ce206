use super::error::{PostgrestError, PostgrestResult};

/// Runtime configuration describing how to reach the hosted PostgREST + auth endpoints.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL.
    pub base_url: String,
    /// Anonymous API key sent as `apikey`.
    pub anon_key: String,
    /// Path prefix of the REST API below `base_url`.
    pub rest_path: String,
    /// Path prefix of the auth API below `base_url`.
    pub auth_path: String,
}

impl PostgrestConfig {
    /// Construct a configuration from an explicit project URL and anonymous key.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            rest_path: "rest/v1".into(),
            auth_path: "auth/v1".into(),
        }
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> PostgrestResult<Self> {
        let base_url = std::env::var("SUPABASE_URL").map_err(|_| PostgrestError::MissingEnvVar {
            var: "SUPABASE_URL",
        })?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY").map_err(|_| {
            PostgrestError::MissingEnvVar {
                var: "SUPABASE_ANON_KEY",
            }
        })?;

        Ok(Self::new(base_url, anon_key))
    }
}
