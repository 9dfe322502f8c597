use std::time::Duration;

use tracing::{debug, warn};

use super::wire::{soft_error, CreateReply, EntryRecord};
use super::{classify_status, ClientError, LedgerApi, Operation};
use crate::config::ApiConfig;
use crate::models::{LedgerEntry, NewEntry};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking HTTP implementation of [`LedgerApi`].
pub(crate) struct HttpLedgerClient {
    agent: ureq::Agent,
}

impl HttpLedgerClient {
    pub(crate) fn new() -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self { agent }
    }

    fn request(&self, method: &str, config: &ApiConfig, path: &str) -> ureq::Request {
        let url = format!("{}{path}", config.endpoint.trim_end_matches('/'));
        debug!(%method, %url, "sending request");
        self.agent
            .request(method, &url)
            .set("Content-Type", "application/json")
            .set("x-api-key", &config.credential)
    }

    /// Run a request and return the body of a 2xx response.
    fn execute(
        &self,
        op: Operation,
        result: Result<ureq::Response, ureq::Error>,
    ) -> Result<String, ClientError> {
        match result {
            Ok(response) => response.into_string().map_err(|e| {
                ClientError::Network(format!("failed to read response body: {e}"))
            }),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                let err = classify_status(op, status, &body);
                warn!(op = %op, status, error = %err, "request rejected");
                Err(err)
            }
            Err(ureq::Error::Transport(transport)) => {
                warn!(op = %op, error = %transport, "transport failure");
                Err(ClientError::Network(transport.to_string()))
            }
        }
    }

    fn send_entry(
        &self,
        op: Operation,
        method: &str,
        config: &ApiConfig,
        path: &str,
        entry: &NewEntry,
    ) -> Result<String, ClientError> {
        let payload = serde_json::to_string(&EntryRecord::from(entry))
            .map_err(|e| ClientError::Network(format!("failed to encode entry: {e}")))?;
        let result = self.request(method, config, path).send_string(&payload);
        self.execute(op, result)
    }
}

impl Default for HttpLedgerClient {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<T: serde::de::DeserializeOwned>(op: Operation, body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body)
        .map_err(|e| ClientError::Network(format!("unexpected {op} response: {e}")))
}

fn reject_soft_error(body: &str) -> Result<(), ClientError> {
    match soft_error(body) {
        Some(message) => Err(ClientError::Validation(message)),
        None => Ok(()),
    }
}

impl LedgerApi for HttpLedgerClient {
    fn list(&self, config: &ApiConfig) -> Result<Vec<LedgerEntry>, ClientError> {
        let result = self.request("GET", config, "/entries").call();
        let body = self.execute(Operation::List, result)?;
        let records: Vec<EntryRecord> = decode(Operation::List, &body)?;
        debug!(count = records.len(), "fetched entries");
        Ok(records.into_iter().map(LedgerEntry::from).collect())
    }

    fn create(&self, config: &ApiConfig, entry: &NewEntry) -> Result<LedgerEntry, ClientError> {
        let body = self.send_entry(Operation::Create, "POST", config, "/add", entry)?;
        reject_soft_error(&body)?;
        match decode(Operation::Create, &body)? {
            CreateReply::Record(record) => Ok(record.into()),
            CreateReply::Created { id } => Ok(LedgerEntry::from_new(id, entry.clone())),
        }
    }

    fn update(
        &self,
        config: &ApiConfig,
        id: i64,
        entry: &NewEntry,
    ) -> Result<LedgerEntry, ClientError> {
        let path = format!("/entries/{id}");
        let body = self.send_entry(Operation::Update, "PUT", config, &path, entry)?;
        reject_soft_error(&body)?;
        let record: EntryRecord = decode(Operation::Update, &body)?;
        let mut updated = LedgerEntry::from(record);
        updated.id.get_or_insert(id);
        Ok(updated)
    }

    fn delete(&self, config: &ApiConfig, id: i64) -> Result<(), ClientError> {
        let path = format!("/entries/{id}");
        let result = self.request("DELETE", config, &path).call();
        let body = self.execute(Operation::Delete, result)?;
        reject_soft_error(&body)
    }
}
