use std::fs;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::time::SystemTime;

use tracing::{debug, error};

use crate::core::{FetchOutcome, TransferOutcome, format_http_date, parse_http_date, parse_url};
use crate::data::Request;
use crate::effects::transport::{RawResponse, Transport, exchange};
use crate::error::{Error, Result};

/// Conditional GET on top of an injected [`Transport`].
///
/// A resource counts as changed only when the server answers 2xx. A 304 is its own
/// outcome, never a failure. Downloads are staged beside the destination and moved into
/// place only after the whole body arrived, so a failed transfer leaves the destination
/// and its timestamp exactly as they were.
///
/// The destination of a download is owned by that call; concurrent downloads to the
/// same path are not guarded against.
pub struct ConditionalFetcher<T: Transport> {
    transport: T,
}

impl<T: Transport> ConditionalFetcher<T> {
    pub fn new(transport: T) -> Self { Self { transport } }

    pub fn transport(&self) -> &T { &self.transport }

    /// Unconditional GET returning the body as text.
    ///
    /// A malformed `url` is logged and yields `Ok(None)`.
    pub fn fetch(&self, url: &str) -> Result<Option<String>> {
        if let Err(e) = parse_url(url) {
            error!("Invalid URL provided: {url}: {e}");
            return Ok(None);
        }
        let response = exchange(&self.transport, &Request::get(url))?;
        Ok(Some(response.into_body_text().unwrap_or_default()))
    }

    /// GET with `If-Modified-Since` when `since` is given.
    pub fn fetch_if_changed(&self, url: &str, since: Option<SystemTime>) -> Result<FetchOutcome> {
        parse_url(url)?;
        let request = conditional_get(url, since);
        let raw = self.execute(&request)?;

        match TransferOutcome::from_status(raw.status) {
            TransferOutcome::NotModified => {
                debug!("Content not modified since last request");
                Ok(FetchOutcome::NotModified)
            }
            TransferOutcome::Transferred => {
                let body = raw.into_response(&request)?.into_body_text();
                Ok(FetchOutcome::Changed(body.unwrap_or_default()))
            }
            TransferOutcome::Failed { status } => {
                error!("Fetching {url} failed!: {status}");
                Ok(FetchOutcome::Failed { status })
            }
        }
    }

    /// Unconditional download of `url` into `destination`.
    pub fn download(&self, url: &str, destination: &Path) -> Result<TransferOutcome> {
        self.download_if_modified_since(url, None, destination)
    }

    /// Downloads `url` into `destination` unless the server reports it unchanged since `since`.
    ///
    /// On transfer the destination's modification time is set from `Last-Modified` when the
    /// header is present and parseable; otherwise it keeps the time of the write.
    pub fn download_if_modified_since(
        &self,
        url: &str,
        since: Option<SystemTime>,
        destination: &Path,
    ) -> Result<TransferOutcome> {
        parse_url(url)?;
        let request = conditional_get(url, since);
        let raw = self.execute(&request)?;

        let outcome = TransferOutcome::from_status(raw.status);
        match outcome {
            TransferOutcome::NotModified => debug!("Content not modified since last request"),
            TransferOutcome::Transferred => {
                save_to_file(url, raw, destination)?;
                debug!("Successfully downloaded {url} to {}", destination.display());
            }
            TransferOutcome::Failed { status } => {
                error!(
                    "Downloading {url} to {} failed!: {status}",
                    destination.display()
                );
            }
        }
        Ok(outcome)
    }

    /// Returns `true` iff a body was transferred and written.
    pub fn download_if_changed(
        &self,
        url: &str,
        since: Option<SystemTime>,
        destination: &Path,
    ) -> Result<bool> {
        self.download_if_modified_since(url, since, destination)
            .map(TransferOutcome::is_transferred)
    }

    /// Like [`download_if_changed`](Self::download_if_changed), using the destination's
    /// current modification time as `since`. A missing destination downloads unconditionally.
    pub fn refresh(&self, url: &str, destination: &Path) -> Result<bool> {
        let since = local_last_modified(destination)?;
        self.download_if_changed(url, since, destination)
    }

    fn execute(&self, request: &Request) -> Result<RawResponse> {
        self.transport
            .execute(request)
            .map_err(|e| Error::transport(request.url(), e))
    }
}

/// Modification time of `path`, or `None` if it does not exist.
pub fn local_last_modified(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(metadata) => metadata
            .modified()
            .map(Some)
            .map_err(|e| Error::io(path, e)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

fn conditional_get(url: &str, since: Option<SystemTime>) -> Request {
    let request = Request::get(url);
    match since {
        Some(since) => {
            let value = format_http_date(since);
            debug!("Conditional GET: {value}");
            request.header("If-Modified-Since", value)
        }
        None => request,
    }
}

fn save_to_file(url: &str, mut raw: RawResponse, destination: &Path) -> Result<()> {
    let server_modified = raw.header("Last-Modified").and_then(parse_http_date);

    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(".cachet-").suffix(".part");
    // created like any new file, so the process umask decides the final mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut staged = builder
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))?;

    let staged_path = staged.path().to_path_buf();
    let written = copy_body(url, &mut raw, staged.as_file_mut(), &staged_path)?;
    drop(raw);
    debug!("Staged {written} bytes at {}", staged_path.display());

    let file = staged.as_file();
    file.sync_all().map_err(|e| Error::io(&staged_path, e))?;
    if let Some(modified) = server_modified {
        file.set_modified(modified)
            .map_err(|e| Error::io(&staged_path, e))?;
    }

    if destination.is_file() {
        fs::remove_file(destination).map_err(|e| Error::io(destination, e))?;
    }
    staged
        .persist(destination)
        .map_err(|e| Error::io(destination, e.error))?;
    Ok(())
}

fn copy_body(url: &str, raw: &mut RawResponse, out: &mut fs::File, out_path: &Path) -> Result<u64> {
    let mut body = TrackedRead {
        inner:  &mut raw.body,
        failed: None,
    };
    io::copy(&mut body, out).map_err(|e| match body.failed.take() {
        Some(read_error) => Error::transport(url, read_error),
        None => Error::io(out_path, e),
    })
}

/// Remembers a read failure so `io::copy` errors can be told apart from write failures.
struct TrackedRead<R> {
    inner:  R,
    failed: Option<io::Error>,
}

impl<R: Read> Read for TrackedRead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).map_err(|e| {
            if e.kind() == ErrorKind::Interrupted {
                return e;
            }
            let kind = e.kind();
            self.failed = Some(e);
            io::Error::from(kind)
        })
    }
}
