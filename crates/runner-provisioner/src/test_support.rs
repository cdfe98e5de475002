// Test doubles: a local HTTP server standing in for the GitHub API and the
// release download host, and a fake runner package.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// `config.sh` body that records how it was called: its own arguments in
/// `configured.txt`, and one line per call in `../config-invocations.log`.
pub const RECORDING_CONFIG_SCRIPT: &str = r#"printf '%s\n' "$*" > configured.txt
printf '%s|%s\n' "$(basename "$PWD")" "$*" >> ../config-invocations.log
echo "Runner successfully added""#;

#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    body: Vec<u8>,
    content_type: &'static str,
}

impl MockResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
            content_type: "application/json",
        }
    }

    pub fn bytes(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            body,
            content_type: "application/octet-stream",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    fn is_token_request(&self) -> bool {
        self.method == "POST" && self.path.ends_with("/actions/runners/registration-token")
    }

    fn is_download_request(&self) -> bool {
        self.method == "GET" && self.path.starts_with("/download/")
    }
}

pub struct MockGitHubBuilder {
    token: MockResponse,
    download: MockResponse,
    /// Zero-based download index from which `failing_download` is served.
    failing_download: Option<(usize, MockResponse)>,
}

impl MockGitHubBuilder {
    pub fn token_response(mut self, response: MockResponse) -> Self {
        self.token = response;
        self
    }

    pub fn download_response(mut self, response: MockResponse) -> Self {
        self.download = response;
        self
    }

    /// Serve `response` for the `index`-th download (zero-based) and every
    /// later one; earlier downloads get the regular package.
    pub fn fail_downloads_from(mut self, index: usize, response: MockResponse) -> Self {
        self.failing_download = Some((index, response));
        self
    }

    pub fn start(self) -> MockGitHub {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").expect("bind mock server"));
        let addr = server
            .server_addr()
            .to_ip()
            .expect("mock server listens on TCP");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let server = server.clone();
            let requests = requests.clone();
            std::thread::spawn(move || {
                let mut downloads = 0usize;
                for request in server.incoming_requests() {
                    let recorded = RecordedRequest {
                        method: request.method().to_string(),
                        path: request.url().to_string(),
                        headers: request
                            .headers()
                            .iter()
                            .map(|h| (h.field.to_string(), h.value.to_string()))
                            .collect(),
                    };

                    let reply = if recorded.is_token_request() {
                        self.token.clone()
                    } else if recorded.is_download_request() {
                        let reply = match &self.failing_download {
                            Some((from, failure)) if downloads >= *from => failure.clone(),
                            _ => self.download.clone(),
                        };
                        downloads += 1;
                        reply
                    } else {
                        MockResponse::json(404, r#"{"message": "Not Found"}"#)
                    };
                    requests.lock().unwrap().push(recorded);

                    let content_type =
                        tiny_http::Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes())
                            .expect("valid header");
                    let response = tiny_http::Response::from_data(reply.body)
                        .with_status_code(tiny_http::StatusCode(reply.status))
                        .with_header(content_type);
                    let _ = request.respond(response);
                }
            })
        };

        MockGitHub {
            url: format!("http://{addr}"),
            server,
            requests,
            handle: Some(handle),
        }
    }
}

/// A running mock server. Stops when dropped.
pub struct MockGitHub {
    url: String,
    server: Arc<tiny_http::Server>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<JoinHandle<()>>,
}

impl MockGitHub {
    /// Defaults: the token endpoint returns `abc123`, downloads return a
    /// runner package with [`RECORDING_CONFIG_SCRIPT`].
    pub fn builder() -> MockGitHubBuilder {
        MockGitHubBuilder {
            token: MockResponse::json(
                201,
                r#"{"token": "abc123", "expires_at": "2026-10-18T13:00:00.000-07:00"}"#,
            ),
            download: MockResponse::bytes(200, runner_package_archive(RECORDING_CONFIG_SCRIPT)),
            failing_download: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn token_requests(&self) -> usize {
        self.requests().iter().filter(|r| r.is_token_request()).count()
    }

    pub fn download_requests(&self) -> usize {
        self.requests().iter().filter(|r| r.is_download_request()).count()
    }
}

impl Drop for MockGitHub {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Build a `.tar.gz` shaped like a runner release: `config.sh` with the
/// given body, `run.sh`, and `bin/Runner.Listener`.
pub fn runner_package_archive(config_script_body: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let config = format!("#!/bin/sh\n{config_script_body}\n");
    append_file(&mut builder, "config.sh", config.as_bytes(), 0o755);
    append_file(&mut builder, "run.sh", b"#!/bin/sh\nexit 0\n", 0o755);
    append_file(&mut builder, "bin/Runner.Listener", b"listener", 0o755);

    builder
        .into_inner()
        .expect("finish tar stream")
        .finish()
        .expect("finish gzip stream")
}

fn append_file(
    builder: &mut tar::Builder<GzEncoder<Vec<u8>>>,
    path: &str,
    contents: &[u8],
    mode: u32,
) {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(contents.len() as u64);
    header.set_mode(mode);
    builder
        .append_data(&mut header, path, contents)
        .expect("append tar entry");
}
