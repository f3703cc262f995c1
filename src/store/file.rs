// JSON file store
// One pretty-printed JSON array holding every quote, rewritten on each save

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{QuoteStore, StoreError};
use crate::logger;
use crate::quotes::Quote;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[allow(clippy::missing_const_for_fn)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the data file
    ///
    /// The array is parsed first and each element afterwards, so a record
    /// that does not fit the quote schema is reported by its index.
    pub fn read(&self) -> Result<Vec<Quote>, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let records: Vec<serde_json::Value> =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                serde_json::from_value(record).map_err(|source| StoreError::Record {
                    path: self.path.clone(),
                    index,
                    source,
                })
            })
            .collect()
    }

    /// Serialize and write the data file, creating its directory if needed
    ///
    /// A file that holds valid JSON with records this server cannot read is
    /// left alone; overwriting it would drop those records.
    pub fn write(&self, quotes: &[Quote]) -> Result<(), StoreError> {
        if let Err(StoreError::Record { index, .. }) = self.read() {
            return Err(StoreError::Overwrite {
                path: self.path.clone(),
                index,
            });
        }

        let content = serde_json::to_string_pretty(quotes)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        fs::write(&self.path, content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl QuoteStore for JsonFileStore {
    fn load_all(&self) -> Vec<Quote> {
        match self.read() {
            Ok(quotes) => quotes,
            Err(StoreError::Read { ref source, .. }) if source.kind() == ErrorKind::NotFound => {
                logger::log_warning(&format!(
                    "Data file {} does not exist yet, starting with an empty collection",
                    self.path.display()
                ));
                Vec::new()
            }
            Err(e) => {
                logger::log_error(&format!("Failed to load quotes: {e}"));
                Vec::new()
            }
        }
    }

    fn save_all(&self, quotes: &[Quote]) -> bool {
        match self.write(quotes) {
            Ok(()) => true,
            Err(e) => {
                logger::log_error(&format!("Failed to save quotes: {e}"));
                false
            }
        }
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path().display())
    }
}
