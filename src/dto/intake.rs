use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Contact form payload. Fields are trimmed before validation.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Pricing tier interest payload; `tier` is `plus` or `pro`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InterestRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
}

/// Acknowledgement returned by the public forms.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
