use std::fmt;
use std::time::Duration;

use encoding_rs::Encoding;
use percent_encoding::percent_decode_str;

use super::ftp::{FtpClient, FtpSession};
use super::listing::parse_listing;
use super::{DirectoryEntry, DirectorySource, LogicalPath, SourceOpener};
use crate::error::{ReportGuardError, Result};

pub const DEFAULT_FTP_PORT: u16 = 21;
const FTP_SCHEME: &str = "ftp://";

/// Host, port and root path parsed from an `ftp://` locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpEndpoint {
    pub host: String,
    pub port: u16,
    pub path: LogicalPath,
}

impl FtpEndpoint {
    /// Parse `ftp://host[:port]/path...`.
    ///
    /// The port falls back to 21 when absent or unparsable. Percent escapes in
    /// the path are decoded with `encoding`; if they are not valid in
    /// `encoding` the undecoded path is used instead.
    ///
    /// # Errors
    /// Returns `InvalidLocator` when the scheme is not `ftp://` or the host is
    /// empty.
    pub fn parse(locator: &str, encoding: &'static Encoding) -> Result<Self> {
        let trimmed = locator.trim();
        let rest = trimmed
            .strip_prefix(FTP_SCHEME)
            .ok_or_else(|| ReportGuardError::InvalidLocator {
                locator: locator.to_string(),
                reason: format!("must start with {FTP_SCHEME}"),
            })?;

        let (host_port, raw_path) = rest.split_once('/').unwrap_or((rest, ""));
        let (host, port) =
            split_host_port(host_port).ok_or_else(|| ReportGuardError::InvalidLocator {
                locator: locator.to_string(),
                reason: "unterminated '[' in IPv6 host".to_string(),
            })?;

        if host.is_empty() {
            return Err(ReportGuardError::InvalidLocator {
                locator: locator.to_string(),
                reason: "host is empty".to_string(),
            });
        }

        Ok(Self {
            host: host.to_string(),
            port,
            path: LogicalPath::parse(&decode_path(raw_path, encoding)),
        })
    }
}

impl fmt::Display for FtpEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "{FTP_SCHEME}[{}]:{}{}", self.host, self.port, self.path)
        } else {
            write!(f, "{FTP_SCHEME}{}:{}{}", self.host, self.port, self.path)
        }
    }
}

/// `host[:port]` or `[v6-addr][:port]`; brackets are stripped. `None` for an
/// unterminated bracket.
fn split_host_port(host_port: &str) -> Option<(&str, u16)> {
    let (host, port) = if let Some(bracketed) = host_port.strip_prefix('[') {
        let (host, after) = bracketed.split_once(']')?;
        (host, after.strip_prefix(':'))
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };
    let port = port.and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_FTP_PORT);
    Some((host, port))
}

/// Decode each run of `%XX` escapes with `encoding`, leaving literal text
/// untouched. Any run that is invalid in `encoding` voids the whole decode.
fn decode_path(raw: &str, encoding: &'static Encoding) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('%') {
        decoded.push_str(&rest[..start]);
        let run = escaped_run_len(&rest[start..]);
        if run == 0 {
            decoded.push('%');
            rest = &rest[start + 1..];
            continue;
        }

        let bytes: Vec<u8> = percent_decode_str(&rest[start..start + run]).collect();
        match encoding.decode_without_bom_handling_and_without_replacement(&bytes) {
            Some(text) => decoded.push_str(&text),
            None => return raw.to_string(),
        }
        rest = &rest[start + run..];
    }

    decoded.push_str(rest);
    decoded
}

fn escaped_run_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut len = 0;
    while bytes.len() >= len + 3
        && bytes[len] == b'%'
        && bytes[len + 1].is_ascii_hexdigit()
        && bytes[len + 2].is_ascii_hexdigit()
    {
        len += 3;
    }
    len
}

/// Login pair for the remote server.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

/// Enter the child directory `component` of the current working directory.
///
/// A direct `CWD` is tried first. When the server rejects it (typically
/// because the name did not survive the round trip through the code page),
/// the current directory is listed and the first child directory whose name
/// equals `component` byte-for-byte or case-insensitively is entered by its
/// listed spelling.
///
/// # Errors
/// Returns `Navigation` naming `component` when no child matches.
pub fn navigate_component<C: FtpClient>(
    client: &mut C,
    component: &str,
    requested: &LogicalPath,
) -> Result<()> {
    let unresolved = || ReportGuardError::Navigation {
        component: component.to_string(),
        path: requested.to_string(),
    };

    match client.change_dir(component) {
        Ok(()) => return Ok(()),
        Err(e) => tracing::debug!(component, error = %e, "Direct CWD failed, searching listing"),
    }

    let lines = client.list().map_err(|_| unresolved())?;
    let wanted = component.to_lowercase();
    let found = parse_listing(&lines)
        .into_iter()
        .filter(|e| e.is_directory)
        .find(|e| e.name == component || e.name.to_lowercase() == wanted)
        .ok_or_else(unresolved)?;

    tracing::debug!(component, resolved = %found.name, "Resolved directory via listing");
    client.change_dir(&found.name).map_err(|_| unresolved())
}

/// FTP-backed source with a single server-side cursor.
///
/// Not safe to share between concurrent tasks: every call moves the
/// session's working directory.
pub struct RemoteSource<C: FtpClient = FtpSession> {
    client: C,
    base: String,
    root_name: String,
    cursor: Option<LogicalPath>,
}

impl<C: FtpClient> RemoteSource<C> {
    /// Walk `root` component by component and remember the resolved absolute
    /// directory as the base for all later navigation.
    ///
    /// # Errors
    /// Returns `Navigation` for the first unresolvable component of `root`.
    pub fn attach(mut client: C, root: &LogicalPath) -> Result<Self> {
        for component in root.components() {
            navigate_component(&mut client, component, root)?;
        }
        let base = client.current_dir()?;
        let root_name = base
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or("root")
            .to_string();

        Ok(Self {
            client,
            base,
            root_name,
            cursor: Some(LogicalPath::root()),
        })
    }

    /// Absolute server path of the root.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn walk_from_base(&mut self, path: &LogicalPath) -> Result<()> {
        self.cursor = None;
        self.client
            .change_dir(&self.base)
            .map_err(|_| ReportGuardError::Navigation {
                component: self.base.clone(),
                path: path.to_string(),
            })?;
        for component in path.components() {
            navigate_component(&mut self.client, component, path)?;
        }
        Ok(())
    }
}

impl<C: FtpClient> DirectorySource for RemoteSource<C> {
    fn list_entries(&mut self, path: &LogicalPath) -> Result<Vec<DirectoryEntry>> {
        self.navigate_to(path)?;
        let lines = self
            .client
            .list()
            .map_err(|e| ReportGuardError::Listing {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(parse_listing(&lines))
    }

    fn navigate_to(&mut self, path: &LogicalPath) -> Result<()> {
        let current = self.cursor.take();
        match current {
            Some(cur) if cur == *path => {}
            Some(cur) if path.components().starts_with(cur.components()) => {
                for component in &path.components()[cur.components().len()..] {
                    navigate_component(&mut self.client, component, path)?;
                }
            }
            _ => self.walk_from_base(path)?,
        }
        self.cursor = Some(path.clone());
        Ok(())
    }

    fn root_name(&self) -> String {
        self.root_name.clone()
    }
}

impl<C: FtpClient> Drop for RemoteSource<C> {
    fn drop(&mut self) {
        let _ = self.client.quit();
    }
}

/// Opens one authenticated session per call.
#[derive(Debug, Clone)]
pub struct RemoteOpener {
    endpoint: FtpEndpoint,
    credentials: Credentials,
    encoding: &'static Encoding,
    timeout: Duration,
}

impl RemoteOpener {
    #[must_use]
    pub const fn new(
        endpoint: FtpEndpoint,
        credentials: Credentials,
        encoding: &'static Encoding,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint,
            credentials,
            encoding,
            timeout,
        }
    }

    #[must_use]
    pub const fn endpoint(&self) -> &FtpEndpoint {
        &self.endpoint
    }
}

#[cfg(not(tarpaulin_include))]
impl SourceOpener for RemoteOpener {
    type Source = RemoteSource<FtpSession>;

    fn open(&self) -> Result<Self::Source> {
        let mut session = FtpSession::connect(
            &self.endpoint.host,
            self.endpoint.port,
            self.encoding,
            self.timeout,
        )?;
        session.login(&self.credentials.login, &self.credentials.password)?;
        tracing::debug!(endpoint = %self.endpoint, "FTP session opened");
        RemoteSource::attach(session, &self.endpoint.path)
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
