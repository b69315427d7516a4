/// Status 304, the server's answer to a satisfied conditional GET.
pub const NOT_MODIFIED: u16 = 304;

/// Returns `true` if `status` is in `[200, 300)`.
///
/// # Examples
///
/// ```
/// use cachet_http::is_success;
///
/// assert!(is_success(200));
/// assert!(is_success(204));
/// assert!(!is_success(304));
/// assert!(!is_success(404));
/// ```
pub fn is_success(status: u16) -> bool { (200..300).contains(&status) }

pub fn is_not_modified(status: u16) -> bool { status == NOT_MODIFIED }

/// Result of a single download attempt to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The server answered 304; nothing was written.
    NotModified,
    /// A 2xx body was written to the destination.
    Transferred,
    /// Any other status; the destination was left untouched.
    Failed { status: u16 },
}

impl TransferOutcome {
    pub fn from_status(status: u16) -> Self {
        if is_not_modified(status) {
            TransferOutcome::NotModified
        } else if is_success(status) {
            TransferOutcome::Transferred
        } else {
            TransferOutcome::Failed { status }
        }
    }

    pub fn is_transferred(self) -> bool { matches!(self, TransferOutcome::Transferred) }
}

/// Result of a conditional GET whose body is returned as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Changed(String),
    NotModified,
    Failed { status: u16 },
}

impl FetchOutcome {
    /// The body, if the resource changed.
    pub fn changed(self) -> Option<String> {
        match self {
            FetchOutcome::Changed(body) => Some(body),
            _ => None,
        }
    }
}
