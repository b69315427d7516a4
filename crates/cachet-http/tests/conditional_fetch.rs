use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use cachet_http::{
    BoxRead, ConditionalFetcher, Error, FetchOutcome, RawResponse, Request, TransferOutcome,
    Transport, format_http_date, parse_http_date,
};
use tempfile::tempdir;

const URL: &str = "http://rs.example.org/vocabulary/rank.xml";
const BODY: &str = "<ranks><rank>species</rank></ranks>";

fn server_time() -> SystemTime { UNIX_EPOCH + Duration::from_secs(784_111_777) }

#[derive(Debug)]
struct MockError(String);

impl std::fmt::Display for MockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl std::error::Error for MockError {}

/// Serves one resource and honours `If-Modified-Since` like a real origin.
struct MockServer {
    status:        u16,
    body:          &'static str,
    last_modified: Option<String>,
    unreachable:   bool,
    requests:      Mutex<Vec<Request>>,
}

impl MockServer {
    fn new() -> Self {
        Self {
            status:        200,
            body:          BODY,
            last_modified: Some(format_http_date(server_time())),
            unreachable:   false,
            requests:      Mutex::new(Vec::new()),
        }
    }

    fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    fn last_modified(mut self, value: Option<&str>) -> Self {
        self.last_modified = value.map(str::to_string);
        self
    }

    fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    fn requests(&self) -> Vec<Request> { self.requests.lock().unwrap().clone() }

    fn is_fresh_for(&self, request: &Request) -> bool {
        let modified = self.last_modified.as_deref().and_then(parse_http_date);
        let since = request
            .header_value("If-Modified-Since")
            .and_then(parse_http_date);
        matches!((modified, since), (Some(modified), Some(since)) if modified <= since)
    }
}

impl Transport for MockServer {
    type Error = MockError;

    fn execute(&self, request: &Request) -> Result<RawResponse, Self::Error> {
        self.requests.lock().unwrap().push(request.clone());
        if self.unreachable {
            return Err(MockError("connection refused".into()));
        }

        let status = if self.status == 200 && self.is_fresh_for(request) {
            304
        } else {
            self.status
        };
        let mut headers = vec![("Content-Type".to_string(), "text/xml; charset=utf-8".to_string())];
        if let Some(value) = &self.last_modified {
            headers.push(("Last-Modified".to_string(), value.clone()));
        }
        let body: BoxRead = if status == 304 {
            Box::new(std::io::empty())
        } else {
            Box::new(Cursor::new(self.body.as_bytes().to_vec()))
        };
        Ok(RawResponse::new(status, headers, body))
    }
}

fn modified(path: &Path) -> SystemTime { fs::metadata(path).unwrap().modified().unwrap() }

#[test]
fn test_unconditional_download_is_idempotent() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("rank.xml");
    let fetcher = ConditionalFetcher::new(MockServer::new());

    assert_eq!(fetcher.download(URL, &dest).unwrap(), TransferOutcome::Transferred);
    let first = fs::read(&dest).unwrap();
    assert_eq!(fetcher.download(URL, &dest).unwrap(), TransferOutcome::Transferred);
    let second = fs::read(&dest).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, BODY.as_bytes());
    assert!(
        fetcher
            .transport()
            .requests()
            .iter()
            .all(|r| r.header_value("If-Modified-Since").is_none())
    );
}

#[test]
fn test_conditional_round_trip() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("rank.xml");
    let fetcher = ConditionalFetcher::new(MockServer::new());

    let unchanged = fetcher
        .download_if_changed(URL, Some(server_time()), &dest)
        .unwrap();
    assert!(!unchanged);
    assert!(!dest.exists());

    let changed = fetcher
        .download_if_changed(URL, Some(server_time() - Duration::from_secs(1)), &dest)
        .unwrap();
    assert!(changed);
    assert_eq!(fs::read_to_string(&dest).unwrap(), BODY);
    assert_eq!(modified(&dest), server_time());

    let requests = fetcher.transport().requests();
    assert_eq!(
        requests[0].header_value("If-Modified-Since"),
        Some("Sun, 06 Nov 1994 08:49:37 GMT")
    );
    assert_eq!(
        requests[1].header_value("If-Modified-Since"),
        Some("Sun, 06 Nov 1994 08:49:36 GMT")
    );
}

#[test]
fn test_not_modified_is_not_a_failure() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("rank.xml");
    fs::write(&dest, "cached").unwrap();
    let fetcher = ConditionalFetcher::new(MockServer::new());

    let outcome = fetcher
        .download_if_modified_since(URL, Some(server_time()), &dest)
        .unwrap();

    assert_eq!(outcome, TransferOutcome::NotModified);
    assert_eq!(fs::read_to_string(&dest).unwrap(), "cached");
}

#[test]
fn test_missing_resource_leaves_destination_untouched() {
    let dir = tempdir().unwrap();
    let existing = dir.path().join("existing.xml");
    let absent = dir.path().join("absent.xml");
    fs::write(&existing, "original").unwrap();
    let before = modified(&existing);
    let fetcher = ConditionalFetcher::new(MockServer::new().status(404));

    assert_eq!(
        fetcher.download(URL, &existing).unwrap(),
        TransferOutcome::Failed { status: 404 }
    );
    assert!(!fetcher.download_if_changed(URL, None, &absent).unwrap());

    assert_eq!(fs::read_to_string(&existing).unwrap(), "original");
    assert_eq!(modified(&existing), before);
    assert!(!absent.exists());
}

#[test]
fn test_unparseable_last_modified_keeps_transfer_time() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("rank.xml");
    let fetcher =
        ConditionalFetcher::new(MockServer::new().last_modified(Some("yesterday-ish")));

    assert!(fetcher.download_if_changed(URL, None, &dest).unwrap());

    let age = SystemTime::now()
        .duration_since(modified(&dest))
        .unwrap_or_default();
    assert!(age < Duration::from_secs(3600));
}

#[test]
fn test_missing_last_modified_keeps_transfer_time() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("rank.xml");
    let fetcher = ConditionalFetcher::new(MockServer::new().last_modified(None));

    assert!(fetcher.download_if_changed(URL, None, &dest).unwrap());
    assert!(modified(&dest) > server_time());
}

#[test]
fn test_parent_directories_are_created() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("vocabulary").join("2024").join("rank.xml");
    let fetcher = ConditionalFetcher::new(MockServer::new());

    assert!(fetcher.download_if_changed(URL, None, &dest).unwrap());
    assert_eq!(fs::read_to_string(&dest).unwrap(), BODY);
}

#[test]
fn test_refresh_uses_destination_timestamp() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("rank.xml");
    let fetcher = ConditionalFetcher::new(MockServer::new());

    assert!(fetcher.refresh(URL, &dest).unwrap());
    assert!(!fetcher.refresh(URL, &dest).unwrap());

    let requests = fetcher.transport().requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].header_value("If-Modified-Since").is_none());
    assert_eq!(
        requests[1].header_value("If-Modified-Since"),
        Some("Sun, 06 Nov 1994 08:49:37 GMT")
    );
}

#[test]
fn test_fetch_returns_body_text() {
    let fetcher = ConditionalFetcher::new(MockServer::new());
    assert_eq!(fetcher.fetch(URL).unwrap().as_deref(), Some(BODY));
}

#[test]
fn test_fetch_with_malformed_url_yields_none() {
    let fetcher = ConditionalFetcher::new(MockServer::new());

    assert_eq!(fetcher.fetch("not a url").unwrap(), None);
    assert!(fetcher.transport().requests().is_empty());
}

#[test]
fn test_fetch_if_changed_outcomes() {
    let fetcher = ConditionalFetcher::new(MockServer::new());

    assert_eq!(
        fetcher.fetch_if_changed(URL, Some(server_time())).unwrap(),
        FetchOutcome::NotModified
    );
    assert_eq!(
        fetcher.fetch_if_changed(URL, None).unwrap().changed().as_deref(),
        Some(BODY)
    );

    let failing = ConditionalFetcher::new(MockServer::new().status(503));
    assert_eq!(
        failing.fetch_if_changed(URL, None).unwrap(),
        FetchOutcome::Failed { status: 503 }
    );
}

#[test]
fn test_transport_errors_propagate() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("rank.xml");
    fs::write(&dest, "original").unwrap();
    let fetcher = ConditionalFetcher::new(MockServer::new().unreachable());

    let err = fetcher.download_if_changed(URL, None, &dest).unwrap_err();
    assert!(err.is_transport());
    assert!(fetcher.fetch(URL).unwrap_err().is_transport());
    assert_eq!(fs::read_to_string(&dest).unwrap(), "original");
}

#[test]
fn test_download_rejects_malformed_url() {
    let dir = tempdir().unwrap();
    let fetcher = ConditionalFetcher::new(MockServer::new());

    let err = fetcher
        .download("::no-scheme", &dir.path().join("x"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidUrl { .. }));
    assert!(fetcher.transport().requests().is_empty());
}

/// Sends the status line and a few bytes, then drops the connection.
struct TruncatingTransport;

struct Truncated(usize);

impl Read for Truncated {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.0 == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ));
        }
        let n = self.0.min(buf.len());
        buf[..n].fill(b'x');
        self.0 -= n;
        Ok(n)
    }
}

impl Transport for TruncatingTransport {
    type Error = MockError;

    fn execute(&self, _request: &Request) -> Result<RawResponse, Self::Error> {
        Ok(RawResponse::new(200, Vec::new(), Box::new(Truncated(16))))
    }
}

#[test]
fn test_interrupted_body_leaves_no_partial_file() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("rank.xml");
    fs::write(&dest, "original").unwrap();
    let fetcher = ConditionalFetcher::new(TruncatingTransport);

    let err = fetcher.download(URL, &dest).unwrap_err();

    assert!(err.is_transport());
    assert_eq!(fs::read_to_string(&dest).unwrap(), "original");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[cfg(unix)]
#[test]
fn test_downloaded_file_mode_follows_umask() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let reference = dir.path().join("reference.xml");
    let dest = dir.path().join("rank.xml");
    fs::write(&reference, "reference").unwrap();
    let fetcher = ConditionalFetcher::new(MockServer::new());

    assert_eq!(fetcher.download(URL, &dest).unwrap(), TransferOutcome::Transferred);

    let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&dest), mode(&reference));
}

#[cfg(unix)]
#[test]
fn test_replaced_file_mode_follows_umask() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let reference = dir.path().join("reference.xml");
    let dest = dir.path().join("rank.xml");
    fs::write(&reference, "reference").unwrap();
    fs::write(&dest, "stale").unwrap();
    let fetcher = ConditionalFetcher::new(MockServer::new());

    assert!(fetcher.download_if_changed(URL, None, &dest).unwrap());

    let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;
    assert_eq!(fs::read_to_string(&dest).unwrap(), BODY);
    assert_eq!(mode(&dest), mode(&reference));
}
