// Safescan — PACLI backend
//
// Drives the vendor's PACLI command-line client, one process per command.
// PACLI keeps its own state between invocations, keyed by SESSIONID, so a
// session here is just the id plus the vault/user names every command needs.
//
// Output is requested with ENCLOSE, which yields one line per item with
// double-quoted, comma-separated fields. That is CSV, so it is parsed with
// the `csv` crate.

use std::path::PathBuf;
use std::process::Command;

use super::backend::{ConnectParams, Session, VaultBackend};
use super::VaultError;

/// Production backend spawning the PACLI executable.
pub struct PacliBackend {
    executable: PathBuf,
    session_id: u32,
}

impl PacliBackend {
    pub fn new(executable: impl Into<PathBuf>, session_id: u32) -> Self {
        Self {
            executable: executable.into(),
            session_id,
        }
    }

    /// Run one PACLI command and return its stdout.
    fn run(&self, command: &str, args: &[String]) -> Result<String, VaultError> {
        let mut full_args = Vec::with_capacity(args.len() + 2);
        full_args.push(command.to_string());
        full_args.extend(args.iter().cloned());
        full_args.push(format!("SESSIONID={}", self.session_id));

        tracing::debug!(command, "Running PACLI");

        let output = Command::new(&self.executable)
            .args(&full_args)
            .output()
            .map_err(|source| VaultError::Spawn {
                path: self.executable.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let mut detail = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if detail.is_empty() {
                detail = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(VaultError::Command {
                command: command.to_string(),
                status: output.status.code().unwrap_or(-1),
                detail,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VaultBackend for PacliBackend {
    fn connect(&self, params: &ConnectParams) -> Result<Session, VaultError> {
        let steps: [(&str, Vec<String>); 4] = [
            ("INIT", Vec::new()),
            ("DEFINE", define_args(params)),
            ("LOGON", logon_args(params)),
            (
                "OPENSAFE",
                safe_args(&params.vault_name, &params.username, &params.safe),
            ),
        ];

        for (command, args) in &steps {
            self.run(command, args).map_err(|e| {
                VaultError::Connection(format!("{} failed: {}", command, e))
            })?;
        }

        Ok(Session {
            vault: params.vault_name.clone(),
            user: params.username.clone(),
            safe: params.safe.clone(),
            id: self.session_id,
        })
    }

    fn disconnect(&self, session: &Session) -> Result<(), VaultError> {
        let steps: [(&str, Vec<String>); 3] = [
            ("CLOSESAFE", safe_args(&session.vault, &session.user, &session.safe)),
            ("LOGOFF", vec![quoted("VAULT", &session.vault), quoted("USER", &session.user)]),
            ("TERM", Vec::new()),
        ];

        // Attempt every step; report the first failure.
        let mut first_error = None;
        for (command, args) in &steps {
            if let Err(e) = self.run(command, args) {
                tracing::debug!(command, "PACLI teardown step failed: {}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn list_files(
        &self,
        session: &Session,
        safe: &str,
        folder: &str,
    ) -> Result<Vec<String>, VaultError> {
        let mut args = safe_args(&session.vault, &session.user, safe);
        args.push(quoted("FOLDER", folder));
        args.push("OUTPUT(NAME,ENCLOSE)".to_string());

        let stdout = self.run("FILESLIST", &args)?;
        let rows = parse_enclosed(&stdout)?;
        Ok(rows
            .into_iter()
            .filter_map(|mut row| if row.is_empty() { None } else { Some(row.swap_remove(0)) })
            .filter(|name| !name.is_empty())
            .collect())
    }

    fn file_categories(
        &self,
        session: &Session,
        safe: &str,
        folder: &str,
        file: &str,
    ) -> Result<Vec<(String, String)>, VaultError> {
        let mut args = safe_args(&session.vault, &session.user, safe);
        args.push(quoted("FOLDER", folder));
        args.push(quoted("FILE", file));
        args.push("OUTPUT(CATEGORYNAME,CATEGORYVALUE,ENCLOSE)".to_string());

        let stdout = self.run("LISTFILECATEGORIES", &args)?;
        let rows = parse_enclosed(&stdout)?;
        Ok(rows
            .into_iter()
            .filter(|row| !row.is_empty() && !row[0].is_empty())
            .map(|mut row| {
                let value = if row.len() > 1 { row.swap_remove(1) } else { String::new() };
                (row.swap_remove(0), value)
            })
            .collect())
    }
}

// ─── Argument Builders ───────────────────────────────────────────────────────

/// `KEY="value"`, with embedded quotes doubled the way PACLI expects.
fn quoted(key: &str, value: &str) -> String {
    format!("{}=\"{}\"", key, value.replace('"', "\"\""))
}

fn yes_no(key: &str, value: bool) -> String {
    format!("{}={}", key, if value { "YES" } else { "NO" })
}

fn define_args(params: &ConnectParams) -> Vec<String> {
    let mut args = vec![
        quoted("VAULT", &params.vault_name),
        quoted("ADDRESS", &params.address),
        format!("PORT={}", params.port),
    ];
    if params.accept_self_signed {
        args.push(yes_no("ALLOWSELFSIGNEDCERTIFICATES", true));
    }
    args
}

fn logon_args(params: &ConnectParams) -> Vec<String> {
    vec![
        quoted("VAULT", &params.vault_name),
        quoted("USER", &params.username),
        quoted("LOGONFILE", &params.logon_file.display().to_string()),
        yes_no("AUTOCHANGEPASSWORD", params.auto_change_password),
    ]
}

fn safe_args(vault: &str, user: &str, safe: &str) -> Vec<String> {
    vec![
        quoted("VAULT", vault),
        quoted("USER", user),
        quoted("SAFE", safe),
    ]
}

/// Parse ENCLOSE-formatted output into rows of fields.
fn parse_enclosed(stdout: &str) -> Result<Vec<Vec<String>>, VaultError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(stdout.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
