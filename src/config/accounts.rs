//! Account and proxy list loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::api::{CredentialError, InitData, ProxyEntry, ProxyError};

/// Errors that make the account configuration unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No accounts found in {0}")]
    NoAccounts(PathBuf),

    #[error("Proxy on line {line} is invalid: {source}")]
    InvalidProxy { line: usize, source: ProxyError },
}

/// One account ready to be processed.
#[derive(Debug, Clone)]
pub struct AccountEntry {
    /// Zero-based position in the data file, also used to pick the proxy.
    pub index: usize,
    /// Parsed credential line.
    pub init_data: InitData,
    /// Proxy from the same line of the proxy file, if there is one.
    pub proxy: Option<ProxyEntry>,
}

/// A credential line that could not be used.
#[derive(Debug)]
pub struct RejectedLine {
    /// Zero-based position in the data file.
    pub index: usize,
    /// Why the line could not be parsed.
    pub error: CredentialError,
}

/// Accounts loaded from the data file, matched with proxies by position.
#[derive(Debug, Default)]
pub struct AccountList {
    /// Usable accounts in file order.
    pub accounts: Vec<AccountEntry>,
    /// Lines skipped because their credential did not parse.
    pub rejected: Vec<RejectedLine>,
}

impl AccountList {
    /// Loads credentials from `data_path` and, if present, proxies from `proxy_path`.
    ///
    /// A missing proxy file means no proxies. Credential lines that fail to
    /// parse are collected in [`AccountList::rejected`] instead of failing the load.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be read, yields no usable
    /// accounts, or a proxy line is malformed.
    pub fn load(data_path: impl AsRef<Path>, proxy_path: Option<&Path>) -> Result<Self, ConfigError> {
        let data_path = data_path.as_ref();
        let data = read_lines(data_path)?;

        let proxies = match proxy_path {
            Some(path) if path.exists() => parse_proxies(&read_lines(path)?)?,
            _ => Vec::new(),
        };

        let list = Self::from_lines(&data, proxies);
        if list.accounts.is_empty() {
            return Err(ConfigError::NoAccounts(data_path.to_path_buf()));
        }
        Ok(list)
    }

    /// Builds the list from already-read lines.
    #[must_use]
    pub fn from_lines(data: &[String], proxies: Vec<ProxyEntry>) -> Self {
        let mut proxies = proxies.into_iter();
        let mut list = Self::default();

        for (index, line) in data.iter().enumerate() {
            let proxy = proxies.next();
            match InitData::parse(line) {
                Ok(init_data) => list.accounts.push(AccountEntry {
                    index,
                    init_data,
                    proxy,
                }),
                Err(error) => list.rejected.push(RejectedLine { index, error }),
            }
        }

        list
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Parses proxy lines, failing on the first malformed one.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidProxy`] with the one-based line number.
pub fn parse_proxies(lines: &[String]) -> Result<Vec<ProxyEntry>, ConfigError> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            ProxyEntry::parse(line).map_err(|source| ConfigError::InvalidProxy {
                line: i + 1,
                source,
            })
        })
        .collect()
}

/// Reads non-empty lines, stripping `\r`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .replace('\r', "")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect())
}
