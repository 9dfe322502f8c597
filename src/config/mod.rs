use anyhow::Result;

pub(crate) const KEY_API_BASE_URL: &str = "api_base_url";
pub(crate) const KEY_API_KEY: &str = "api_key";

const FALLBACK_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Endpoint and credential used for every remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiConfig {
    pub(crate) endpoint: String,
    pub(crate) credential: String,
}

impl ApiConfig {
    pub(crate) fn new(endpoint: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential: credential.into(),
        }
    }

    /// Defaults baked in at build time via `LEDGERUI_API_BASE_URL` / `LEDGERUI_API_KEY`.
    pub(crate) fn compiled_defaults() -> Self {
        Self::new(
            option_env!("LEDGERUI_API_BASE_URL").unwrap_or(FALLBACK_API_BASE_URL),
            option_env!("LEDGERUI_API_KEY").unwrap_or(""),
        )
    }

    /// Credential with all but the last four characters masked.
    pub(crate) fn masked_credential(&self) -> String {
        mask(&self.credential)
    }
}

pub(crate) fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

/// Overridable key-value store persisted across sessions.
pub(crate) trait SettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write both API settings together.
    fn save_api_settings(&mut self, endpoint: &str, credential: &str) -> Result<()>;
}

/// Effective config: each stored override wins when present and non-empty.
pub(crate) fn resolve(store: &dyn SettingsStore, defaults: &ApiConfig) -> Result<ApiConfig> {
    let pick = |key: &str, default: &str| -> Result<String> {
        Ok(store
            .get(key)?
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string()))
    };

    Ok(ApiConfig {
        endpoint: pick(KEY_API_BASE_URL, &defaults.endpoint)?,
        credential: pick(KEY_API_KEY, &defaults.credential)?,
    })
}

/// Persist the settings form's values.
pub(crate) fn save(store: &mut dyn SettingsStore, config: &ApiConfig) -> Result<()> {
    let endpoint = normalize_endpoint(&config.endpoint);
    store.save_api_settings(&endpoint, config.credential.trim())?;
    tracing::info!(endpoint = %endpoint, "saved API settings");
    Ok(())
}

pub(crate) fn normalize_endpoint(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests;
