#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::Arc;
use std::thread;

use encoding_rs::WINDOWS_1251;
use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the report-guard binary.
#[macro_export]
macro_rules! report_guard {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("report-guard"))
    };
}

/// Temporary directory holding a report tree.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates an empty file, creating parent directories as needed.
    pub fn create_file(&self, relative_path: &str) {
        self.write_file(relative_path, "");
    }

    pub fn write_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    pub fn create_dir(&self, relative_path: &str) {
        fs::create_dir_all(self.dir.path().join(relative_path))
            .expect("Failed to create directory");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_str(&self, relative_path: &str) -> String {
        self.dir.path().join(relative_path).to_string_lossy().to_string()
    }

    pub fn create_config(&self, content: &str) {
        self.write_file(".report-guard.toml", content);
    }
}

/// Directory tree served by [`FakeFtpServer`]: absolute path -> entries.
#[derive(Default, Clone)]
pub struct FtpTree {
    dirs: HashMap<String, Vec<(String, bool)>>,
}

impl FtpTree {
    pub fn new() -> Self {
        let mut dirs = HashMap::new();
        dirs.insert("/".to_string(), Vec::new());
        Self { dirs }
    }

    /// Adds an absolute directory path and its parents.
    pub fn dir(mut self, path: &str) -> Self {
        let mut current = String::from("/");
        for part in path.split('/').filter(|p| !p.is_empty()) {
            let child = join(&current, part);
            if !self.dirs.contains_key(&child) {
                self.dirs
                    .get_mut(&current)
                    .expect("parent exists")
                    .push((part.to_string(), true));
                self.dirs.insert(child.clone(), Vec::new());
            }
            current = child;
        }
        self
    }

    pub fn file(mut self, dir: &str, name: &str) -> Self {
        self = self.dir(dir);
        let key = join("/", dir.trim_matches('/'));
        self.dirs
            .get_mut(&key)
            .expect("dir exists")
            .push((name.to_string(), false));
        self
    }
}

fn join(parent: &str, child: &str) -> String {
    if child.is_empty() {
        parent.to_string()
    } else if parent == "/" {
        format!("/{child}")
    } else {
        format!("{parent}/{child}")
    }
}

/// Minimal FTP server speaking windows-1251, one thread per connection.
pub struct FakeFtpServer {
    pub port: u16,
}

impl FakeFtpServer {
    pub fn start(tree: FtpTree, password: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind control port");
        let port = listener.local_addr().expect("local addr").port();
        let tree = Arc::new(tree);
        let password = password.to_string();

        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let tree = Arc::clone(&tree);
                let password = password.clone();
                thread::spawn(move || serve(stream, &tree, &password));
            }
        });

        Self { port }
    }

    pub fn url(&self, path: &str) -> String {
        format!("ftp://127.0.0.1:{}{path}", self.port)
    }
}

fn send(stream: &mut TcpStream, text: &str) {
    let (bytes, _, _) = WINDOWS_1251.encode(text);
    let _ = stream.write_all(&bytes);
    let _ = stream.flush();
}

fn serve(stream: TcpStream, tree: &FtpTree, password: &str) {
    let Ok(mut writer) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(stream);
    let mut cwd = String::from("/");
    let mut passive: Option<TcpListener> = None;

    send(&mut writer, "220 Fake FTP ready\r\n");
    loop {
        let mut raw = Vec::new();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let (line, _) = WINDOWS_1251.decode_without_bom_handling(&raw);
        let line = line.trim_end().to_string();
        let (verb, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));

        match verb {
            "USER" => send(&mut writer, "331 Password required\r\n"),
            "PASS" if arg == password => send(&mut writer, "230 Logged in\r\n"),
            "PASS" => send(&mut writer, "530 Login incorrect\r\n"),
            "TYPE" => send(&mut writer, "200 Type set\r\n"),
            "CWD" => {
                let target = if arg.starts_with('/') {
                    arg.to_string()
                } else {
                    join(&cwd, arg)
                };
                if tree.dirs.contains_key(&target) {
                    cwd = target;
                    send(&mut writer, "250 Directory changed\r\n");
                } else {
                    send(&mut writer, "550 No such directory\r\n");
                }
            }
            "PWD" => send(&mut writer, &format!("257 \"{cwd}\" is current directory\r\n")),
            "PASV" => {
                let Ok(data) = TcpListener::bind("127.0.0.1:0") else {
                    send(&mut writer, "425 Cannot open data port\r\n");
                    continue;
                };
                let data_port = data.local_addr().map(|a| a.port()).unwrap_or(0);
                passive = Some(data);
                send(
                    &mut writer,
                    &format!(
                        "227 Entering Passive Mode (127,0,0,1,{},{})\r\n",
                        data_port >> 8,
                        data_port & 0xff
                    ),
                );
            }
            "LIST" => {
                let Some(data) = passive.take() else {
                    send(&mut writer, "425 Use PASV first\r\n");
                    continue;
                };
                send(&mut writer, "150 Opening data connection\r\n");
                if let Ok((mut data_stream, _)) = data.accept() {
                    let mut listing = String::from("total 0\r\n");
                    for (name, is_dir) in tree.dirs.get(&cwd).cloned().unwrap_or_default() {
                        let mode = if is_dir { "drwxr-xr-x" } else { "-rw-r--r--" };
                        listing.push_str(&format!("{mode} 1 ftp ftp 0 Jan 10 12:00 {name}\r\n"));
                    }
                    send(&mut data_stream, &listing);
                }
                send(&mut writer, "226 Transfer complete\r\n");
            }
            "QUIT" => {
                send(&mut writer, "221 Bye\r\n");
                return;
            }
            _ => send(&mut writer, "502 Command not implemented\r\n"),
        }
    }
}
