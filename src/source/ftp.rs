//! Minimal FTP session used by the remote source.
//!
//! Only the commands needed to walk and list directories are implemented.
//! All command arguments and all server text go through one fixed
//! [`Encoding`], because servers that store Cyrillic names typically speak a
//! single-byte code page rather than UTF-8 and never announce it.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{IpAddr, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use encoding_rs::Encoding;

use crate::error::{ReportGuardError, Result};

/// Operations the remote source needs from an FTP connection.
///
/// Production code uses [`FtpSession`]; tests substitute an in-memory fake.
pub trait FtpClient {
    /// Change the working directory (`CWD`). `path` may be a single name or an
    /// absolute path previously returned by [`FtpClient::current_dir`].
    ///
    /// # Errors
    /// Returns an error when the server rejects the change.
    fn change_dir(&mut self, path: &str) -> Result<()>;

    /// Current working directory (`PWD`).
    ///
    /// # Errors
    /// Returns an error when the reply cannot be read or parsed.
    fn current_dir(&mut self) -> Result<String>;

    /// Raw `LIST` lines for the current working directory.
    ///
    /// # Errors
    /// Returns an error when the data transfer fails.
    fn list(&mut self) -> Result<Vec<String>>;

    /// Politely close the session.
    ///
    /// # Errors
    /// Returns an error when the command cannot be sent.
    fn quit(&mut self) -> Result<()>;
}

/// A server reply: three-digit code plus the decoded text after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u32,
    pub text: String,
}

impl Reply {
    #[must_use]
    pub const fn is_preliminary(&self) -> bool {
        self.code >= 100 && self.code < 200
    }

    #[must_use]
    pub const fn is_completion(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    #[must_use]
    pub const fn is_intermediate(&self) -> bool {
        self.code >= 300 && self.code < 400
    }

    fn into_error(self) -> ReportGuardError {
        ReportGuardError::Protocol {
            code: self.code,
            message: self.text,
        }
    }
}

/// A live control connection.
pub struct FtpSession {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    peer: IpAddr,
    encoding: &'static Encoding,
    timeout: Duration,
    endpoint: String,
}

impl FtpSession {
    /// Connect and read the server greeting.
    ///
    /// # Errors
    /// Returns `Connection` when the host cannot be reached or does not greet
    /// with a `220` reply.
    pub fn connect(
        host: &str,
        port: u16,
        encoding: &'static Encoding,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = format!("{host}:{port}");
        let connection_error = |message: String| ReportGuardError::Connection {
            endpoint: endpoint.clone(),
            message,
        };

        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| connection_error(e.to_string()))?
            .next()
            .ok_or_else(|| connection_error("host did not resolve".to_string()))?;

        let stream = open_stream(addr, timeout).map_err(|e| connection_error(e.to_string()))?;
        let writer = stream
            .try_clone()
            .map_err(|e| connection_error(e.to_string()))?;

        let mut session = Self {
            reader: BufReader::new(stream),
            writer,
            peer: addr.ip(),
            encoding,
            timeout,
            endpoint: endpoint.clone(),
        };

        let greeting = session
            .read_reply()
            .map_err(|e| connection_error(e.to_string()))?;
        if greeting.code != 220 {
            return Err(connection_error(format!(
                "unexpected greeting {} {}",
                greeting.code, greeting.text
            )));
        }

        Ok(session)
    }

    /// Authenticate and switch to ASCII transfer type.
    ///
    /// # Errors
    /// Returns `Connection` when the server rejects the credentials.
    pub fn login(&mut self, login: &str, password: &str) -> Result<()> {
        let reply = self.command("USER", Some(login))?;
        let reply = if reply.is_intermediate() {
            self.command("PASS", Some(password))?
        } else {
            reply
        };

        if !reply.is_completion() {
            return Err(ReportGuardError::Connection {
                endpoint: self.endpoint.clone(),
                message: format!("login rejected: {} {}", reply.code, reply.text),
            });
        }

        let reply = self.command("TYPE", Some("A"))?;
        if !reply.is_completion() {
            return Err(reply.into_error());
        }

        Ok(())
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send(&mut self, verb: &str, arg: Option<&str>) -> Result<()> {
        let line = arg.map_or_else(|| format!("{verb}\r\n"), |a| format!("{verb} {a}\r\n"));
        let (bytes, _, _) = self.encoding.encode(&line);
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        let mut raw = Vec::new();
        let read = self.reader.read_until(b'\n', &mut raw)?;
        if read == 0 {
            return Err(ReportGuardError::Connection {
                endpoint: self.endpoint.clone(),
                message: "connection closed by server".to_string(),
            });
        }
        let (text, _) = self.encoding.decode_without_bom_handling(&raw);
        Ok(text.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_reply(&mut self) -> Result<Reply> {
        let first = self.read_line()?;
        let (code, separator, text) = split_reply_line(&first).ok_or_else(|| {
            ReportGuardError::Protocol {
                code: 0,
                message: format!("malformed reply: {first}"),
            }
        })?;

        if separator != '-' {
            return Ok(Reply {
                code,
                text: text.to_string(),
            });
        }

        let mut lines = vec![text.to_string()];
        let terminator = format!("{code} ");
        loop {
            let line = self.read_line()?;
            if line.starts_with(&terminator) {
                lines.push(line[terminator.len()..].to_string());
                break;
            }
            lines.push(line);
        }

        Ok(Reply {
            code,
            text: lines.join("\n"),
        })
    }

    fn command(&mut self, verb: &str, arg: Option<&str>) -> Result<Reply> {
        self.send(verb, arg)?;
        self.read_reply()
    }

    fn open_passive(&mut self) -> Result<TcpStream> {
        let reply = self.command("PASV", None)?;
        if reply.code != 227 {
            return Err(reply.into_error());
        }
        let port = parse_pasv_port(&reply.text).ok_or_else(|| ReportGuardError::Protocol {
            code: reply.code,
            message: format!("unparsable passive reply: {}", reply.text),
        })?;

        // The advertised address is ignored: servers behind NAT report their
        // private address, while the control peer is always reachable.
        Ok(open_stream(SocketAddr::new(self.peer, port), self.timeout)?)
    }
}

impl FtpClient for FtpSession {
    fn change_dir(&mut self, path: &str) -> Result<()> {
        let reply = self.command("CWD", Some(path))?;
        if reply.is_completion() {
            Ok(())
        } else {
            Err(reply.into_error())
        }
    }

    fn current_dir(&mut self) -> Result<String> {
        let reply = self.command("PWD", None)?;
        if reply.code != 257 {
            return Err(reply.into_error());
        }
        parse_pwd(&reply.text).ok_or_else(|| ReportGuardError::Protocol {
            code: reply.code,
            message: format!("unparsable PWD reply: {}", reply.text),
        })
    }

    fn list(&mut self) -> Result<Vec<String>> {
        let mut data = self.open_passive()?;

        let reply = self.command("LIST", None)?;
        if !reply.is_preliminary() && !reply.is_completion() {
            return Err(reply.into_error());
        }

        let mut raw = Vec::new();
        data.read_to_end(&mut raw)?;
        drop(data);

        if reply.is_preliminary() {
            let done = self.read_reply()?;
            if !done.is_completion() {
                return Err(done.into_error());
            }
        }

        let (text, _) = self.encoding.decode_without_bom_handling(&raw);
        Ok(text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn quit(&mut self) -> Result<()> {
        self.send("QUIT", None)
    }
}

fn open_stream(addr: SocketAddr, timeout: Duration) -> std::io::Result<TcpStream> {
    let stream = TcpStream::connect_timeout(&addr, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;
    Ok(stream)
}

/// Split `"227 Entering..."` into code, separator and text.
fn split_reply_line(line: &str) -> Option<(u32, char, &str)> {
    let code = line.get(..3)?;
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let code: u32 = code.parse().ok()?;
    let mut rest = line[3..].chars();
    let separator = rest.next().unwrap_or(' ');
    Some((code, separator, line.get(4..).unwrap_or_default()))
}

/// Extract the data port from a `227` reply text such as
/// `Entering Passive Mode (192,168,1,2,195,80).`
fn parse_pasv_port(text: &str) -> Option<u16> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let tuple: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == ' ')
        .filter(|c| *c != ' ')
        .collect();

    let numbers: Vec<u8> = tuple
        .split(',')
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .ok()?;

    if numbers.len() != 6 {
        return None;
    }
    Some((u16::from(numbers[4]) << 8) | u16::from(numbers[5]))
}

/// Extract the quoted directory from a `257` reply text, undoubling `""`.
fn parse_pwd(text: &str) -> Option<String> {
    let start = text.find('"')? + 1;
    let mut path = String::new();
    let mut chars = text[start..].chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
                path.push('"');
            } else {
                return Some(path);
            }
        } else {
            path.push(ch);
        }
    }

    None
}

#[cfg(test)]
#[path = "ftp_tests.rs"]
mod tests;
