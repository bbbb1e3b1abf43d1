//! `multipart/form-data` submission over HTTP, plus a submitter that keeps
//! what it is sent.
//!
//! [`HttpSubmitter`] uses reqwest's blocking client. Call it from synchronous
//! code or from inside `tokio::task::spawn_blocking`, never directly on an
//! async worker thread.

use folio_traits::{RecordSubmitter, SubmissionPayload, SubmissionReceipt, SubmitError};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use std::sync::Mutex;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the multipart form for a payload: fields first, then files, each in
/// payload order.
pub fn to_form(payload: &SubmissionPayload) -> Result<Form, SubmitError> {
    let mut form = Form::new();
    for (name, value) in &payload.fields {
        form = form.text(name.clone(), value.clone());
    }
    for file in &payload.files {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| {
                SubmitError::InvalidPayload(format!(
                    "file '{}' has an invalid content type '{}': {}",
                    file.field, file.content_type, e
                ))
            })?;
        form = form.part(file.field.clone(), part);
    }
    Ok(form)
}

/// Posts each payload as `multipart/form-data` to a fixed endpoint.
///
/// A 2xx response is accepted. When the body is a JSON object carrying an
/// `id` (string or number) it becomes the receipt reference.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecordSubmitter for HttpSubmitter {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmitError> {
        let form = to_form(payload)?;
        log::debug!(
            "Posting {} fields and {} files to {}",
            payload.fields.len(),
            payload.files.len(),
            self.endpoint
        );
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        if !status.is_success() {
            log::warn!("Submission to {} rejected with {}", self.endpoint, status);
            return Err(SubmitError::Rejected(format!("{}: {}", status, body.trim())));
        }

        let reference = reference_from_body(&body);
        log::info!(
            "Submitted record to {} (reference: {})",
            self.endpoint,
            reference.as_deref().unwrap_or("none")
        );
        Ok(SubmissionReceipt { reference })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn reference_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("id")? {
        serde_json::Value::String(id) => Some(id.clone()),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Accepts every payload and keeps a copy. Stands in for a remote endpoint.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    received: Mutex<Vec<SubmissionPayload>>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<SubmissionPayload> {
        self.received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl RecordSubmitter for RecordingSubmitter {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmitError> {
        // Same validation the HTTP path applies.
        to_form(payload)?;
        let mut received = self
            .received
            .lock()
            .map_err(|_| SubmitError::Transport("recorder lock poisoned".to_string()))?;
        received.push(payload.clone());
        let reference = format!("rec-{}", received.len());
        log::info!("Recorded submission {}", reference);
        Ok(SubmissionReceipt {
            reference: Some(reference),
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_traits::SubmissionFile;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn payload() -> SubmissionPayload {
        SubmissionPayload {
            fields: vec![
                ("customer_name".to_string(), "Acme Ltd".to_string()),
                ("total_amount".to_string(), "1150000".to_string()),
            ],
            files: vec![SubmissionFile {
                field: "company_signature".to_string(),
                file_name: "company_sig.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }],
        }
    }

    struct CapturedRequest {
        request_line: String,
        content_type: String,
        body: Vec<u8>,
    }

    /// Serves one request on a loopback port, answering with `status` and
    /// `body`, and hands back what it read.
    fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/records", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_type = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    match name.to_ascii_lowercase().as_str() {
                        "content-type" => content_type = value.trim().to_string(),
                        "content-length" => content_length = value.trim().parse().unwrap(),
                        _ => {}
                    }
                }
            }
            let mut received = vec![0u8; content_length];
            reader.read_exact(&mut received).unwrap();

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
            CapturedRequest {
                request_line: request_line.trim_end().to_string(),
                content_type,
                body: received,
            }
        });
        (url, handle)
    }

    #[test]
    fn http_submitter_posts_multipart_form() {
        let (url, server) = serve_once("201 Created", r#"{"id":"42"}"#);
        let submitter = HttpSubmitter::new(url).unwrap();

        let receipt = submitter.submit(&payload()).unwrap();
        assert_eq!(receipt.reference.as_deref(), Some("42"));

        let request = server.join().unwrap();
        assert_eq!(request.request_line, "POST /records HTTP/1.1");
        assert!(request.content_type.starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8_lossy(&request.body);
        assert!(body.contains("name=\"customer_name\""));
        assert!(body.contains("Acme Ltd"));
        assert!(body.contains("name=\"company_signature\"; filename=\"company_sig.png\""));
        assert!(body.contains("Content-Type: image/png"));
        let fields_at = body.find("name=\"total_amount\"").unwrap();
        let file_at = body.find("name=\"company_signature\"").unwrap();
        assert!(fields_at < file_at);
    }

    #[test]
    fn non_success_status_is_rejected() {
        let (url, server) = serve_once("422 Unprocessable Entity", r#"{"error":"bad total"}"#);
        let submitter = HttpSubmitter::new(url).unwrap();

        let err = submitter.submit(&payload()).unwrap_err();
        server.join().unwrap();
        match err {
            SubmitError::Rejected(message) => {
                assert!(message.contains("422"));
                assert!(message.contains("bad total"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/records", listener.local_addr().unwrap());
        drop(listener);

        let submitter = HttpSubmitter::new(url).unwrap();
        let err = submitter.submit(&payload()).unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
    }

    #[test]
    fn invalid_content_type_is_refused_before_sending() {
        let mut p = payload();
        p.files[0].content_type = "not a mime\u{0}".to_string();
        assert!(matches!(to_form(&p), Err(SubmitError::InvalidPayload(_))));

        let submitter = RecordingSubmitter::new();
        assert!(submitter.submit(&p).is_err());
        assert!(submitter.received().is_empty());
    }

    #[test]
    fn receipt_reference_reads_json_id() {
        assert_eq!(reference_from_body(r#"{"id":7}"#).as_deref(), Some("7"));
        assert_eq!(reference_from_body(r#"{"id":"abc"}"#).as_deref(), Some("abc"));
        assert_eq!(reference_from_body("created"), None);
        assert_eq!(reference_from_body(r#"{"id":null}"#), None);
    }

    #[test]
    fn recording_submitter_keeps_payloads() {
        let submitter = RecordingSubmitter::new();
        let receipt = submitter.submit(&payload()).unwrap();
        assert_eq!(receipt.reference.as_deref(), Some("rec-1"));
        assert_eq!(submitter.received(), vec![payload()]);
    }
}
