use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use triplet_core::TrialRecord;

use crate::error::ExportError;

/// Simple content type; the receiving script reads the raw body.
pub const CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// Wire shape of the POST body
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub data: &'a [TrialRecord],
}

pub fn payload(records: &[TrialRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string(&Envelope { data: records })?)
}

/// Best-effort sender for the record collection. The response is never read.
#[derive(Debug, Clone)]
pub struct RemoteSink {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl RemoteSink {
    pub fn new(endpoint: &str) -> Result<Self, ExportError> {
        let endpoint = reqwest::Url::parse(endpoint).map_err(|e| ExportError::Endpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, endpoint })
    }

    /// Serializes `records` and spawns a single POST.
    ///
    /// Returns as soon as the request is scheduled. Delivery failures and
    /// non-2xx statuses are logged at debug level and otherwise dropped.
    /// Awaiting the handle is optional; dropping it does not cancel the send.
    pub fn send(&self, records: &[TrialRecord]) -> Result<JoinHandle<()>, ExportError> {
        let body = payload(records)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ExportError::NoRuntime)?;

        let request = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body);
        let endpoint = self.endpoint.clone();
        info!(endpoint = %endpoint, records = records.len(), "sending results");

        Ok(runtime.spawn(async move {
            match request.send().await {
                Ok(resp) => debug!(endpoint = %endpoint, status = %resp.status(), "results sent"),
                Err(e) => debug!(endpoint = %endpoint, error = %e, "results send failed"),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use triplet_core::{Response, ResponseRecord, StandardPhase, TrialType};

    fn record(trial_index: usize) -> TrialRecord {
        TrialRecord::new(ResponseRecord {
            trial_index,
            trial_type: TrialType::HtmlButtonResponse,
            phase: StandardPhase::Trials,
            response: Some(Response::Button(0)),
            rt: 500,
            items: None,
            correct: None,
        })
    }

    #[test]
    fn payload_wraps_records_in_data() {
        let records: Vec<TrialRecord> = (0..3).map(record).collect();
        let body: serde_json::Value = serde_json::from_str(&payload(&records).unwrap()).unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
        assert_eq!(body["data"][2]["trial_index"], 2);
    }

    #[test]
    fn empty_collection_still_has_data_field() {
        assert_eq!(payload(&[]).unwrap(), r#"{"data":[]}"#);
    }

    #[test]
    fn rejects_malformed_endpoint() {
        let err = RemoteSink::new("not a url").unwrap_err();
        assert!(matches!(err, ExportError::Endpoint { .. }));
    }

    #[test]
    fn send_outside_runtime_fails_fast() {
        let sink = RemoteSink::new("http://127.0.0.1:9/exec").unwrap();
        assert!(matches!(sink.send(&[record(0)]), Err(ExportError::NoRuntime)));
    }
}
