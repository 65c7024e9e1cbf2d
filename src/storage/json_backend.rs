use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::Result,
    ledger::{Entry, FixedBill, YearMonth},
};

use super::{
    record::{EntryRecord, FixedBillRecord},
    LoadReport, StorageBackend,
};

const TMP_SUFFIX: &str = "tmp";
const CORRUPT_SUFFIX: &str = "corrupt";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%3f";

/// Stores the ledger as pretty-printed JSON files inside one data directory.
///
/// When a current file is absent but the matching file from the older
/// Portuguese-named layout is present, the older file is read instead. Saves
/// always go to the current names.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    entries_file: PathBuf,
    fixed_bills_file: PathBuf,
    checkpoint_file: PathBuf,
    legacy_entries_file: PathBuf,
    legacy_fixed_bills_file: PathBuf,
    legacy_checkpoint_file: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CheckpointState {
    #[serde(default)]
    last_generated_period: Option<YearMonth>,
}

impl JsonStorage {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir
            .unwrap_or_else(|| PathResolver::data_dir_in(&PathResolver::base_dir()));
        ensure_dir(&data_dir)?;
        Ok(Self {
            entries_file: PathResolver::entries_file_in(&data_dir),
            fixed_bills_file: PathResolver::fixed_bills_file_in(&data_dir),
            checkpoint_file: PathResolver::checkpoint_file_in(&data_dir),
            legacy_entries_file: PathResolver::legacy_entries_file_in(&data_dir),
            legacy_fixed_bills_file: PathResolver::legacy_fixed_bills_file_in(&data_dir),
            legacy_checkpoint_file: PathResolver::legacy_checkpoint_file_in(&data_dir),
        })
    }

    pub fn entries_path(&self) -> &Path {
        &self.entries_file
    }
}

impl StorageBackend for JsonStorage {
    fn load_entries(&self) -> LoadReport<Vec<Entry>> {
        let path = source_file(&self.entries_file, &self.legacy_entries_file);
        load_records(path, EntryRecord::into_entry)
    }

    fn load_fixed_bills(&self) -> LoadReport<Vec<FixedBill>> {
        let path = source_file(&self.fixed_bills_file, &self.legacy_fixed_bills_file);
        load_records(path, FixedBillRecord::into_fixed_bill)
    }

    fn load_checkpoint(&self) -> LoadReport<Option<YearMonth>> {
        let path = source_file(&self.checkpoint_file, &self.legacy_checkpoint_file);
        if path == self.legacy_checkpoint_file.as_path() {
            return read_legacy_checkpoint(path);
        }
        let loaded = read_json::<CheckpointState>(path);
        let mut warnings = loaded.warnings;
        if loaded.value.is_none() && !warnings.is_empty() {
            preserve_original(path, &mut warnings);
        }
        let period = loaded.value.and_then(|state| state.last_generated_period);
        report(period, warnings)
    }

    fn save_all(
        &self,
        entries: &[Entry],
        fixed_bills: &[FixedBill],
        checkpoint: Option<YearMonth>,
    ) -> Result<()> {
        let entry_records: Vec<EntryRecord> = entries.iter().map(EntryRecord::from).collect();
        let bill_records: Vec<FixedBillRecord> =
            fixed_bills.iter().map(FixedBillRecord::from).collect();

        let mut staged = vec![
            (
                self.entries_file.clone(),
                serde_json::to_string_pretty(&entry_records)?,
            ),
            (
                self.fixed_bills_file.clone(),
                serde_json::to_string_pretty(&bill_records)?,
            ),
        ];
        if let Some(period) = checkpoint {
            let state = CheckpointState {
                last_generated_period: Some(period),
            };
            staged.push((
                self.checkpoint_file.clone(),
                serde_json::to_string_pretty(&state)?,
            ));
        }

        commit(&staged)?;
        tracing::debug!(
            entries = entries.len(),
            fixed_bills = fixed_bills.len(),
            checkpoint = ?checkpoint,
            "ledger saved"
        );
        Ok(())
    }

    fn save_checkpoint(&self, period: YearMonth) -> Result<()> {
        let state = CheckpointState {
            last_generated_period: Some(period),
        };
        let json = serde_json::to_string_pretty(&state)?;
        commit(&[(self.checkpoint_file.clone(), json)])
    }
}

/// Picks the older file only while the current one has never been written.
fn source_file<'a>(current: &'a Path, legacy: &'a Path) -> &'a Path {
    if !current.exists() && legacy.exists() {
        tracing::info!(path = %legacy.display(), "reading data file from the older layout");
        legacy
    } else {
        current
    }
}

/// Loads a JSON array record by record. A bad element is skipped on its own,
/// and whenever anything in the file was dropped the file is copied aside
/// before a later save can replace it.
fn load_records<R, T>(
    path: &Path,
    mut convert: impl FnMut(R, &mut Vec<String>) -> Option<T>,
) -> LoadReport<Vec<T>>
where
    R: DeserializeOwned,
{
    let loaded = read_json::<Vec<Value>>(path);
    let mut warnings = loaded.warnings;
    let Some(raw) = loaded.value else {
        if !warnings.is_empty() {
            preserve_original(path, &mut warnings);
        }
        return report(Vec::new(), warnings);
    };

    let total = raw.len();
    let mut items = Vec::with_capacity(total);
    for (position, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<R>(value) {
            Ok(record) => items.extend(convert(record, &mut warnings)),
            Err(err) => warnings.push(format!(
                "record {} in `{}` skipped: {err}",
                position + 1,
                path.display()
            )),
        }
    }
    if items.len() < total {
        preserve_original(path, &mut warnings);
    }
    report(items, warnings)
}

fn read_legacy_checkpoint(path: &Path) -> LoadReport<Option<YearMonth>> {
    let mut warnings = Vec::new();
    let period = match fs::read_to_string(path) {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => match raw.trim().parse::<YearMonth>() {
            Ok(period) => Some(period),
            Err(err) => {
                warnings.push(format!("`{}` was ignored: {err}", path.display()));
                None
            }
        },
        Err(err) => {
            warnings.push(format!("could not read `{}`: {err}", path.display()));
            None
        }
    };
    report(period, warnings)
}

/// Copies `path` to `<name>.corrupt-<timestamp>` next to it.
fn preserve_original(path: &Path, warnings: &mut Vec<String>) {
    let Some(name) = path.file_name() else {
        return;
    };
    let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
    let mut backup_name = name.to_os_string();
    backup_name.push(format!(".{CORRUPT_SUFFIX}-{timestamp}"));
    let backup_path = path.with_file_name(backup_name);
    match fs::copy(path, &backup_path) {
        Ok(_) => warnings.push(format!(
            "the original contents were kept in `{}`",
            backup_path.display()
        )),
        Err(err) => warnings.push(format!(
            "could not keep a copy of `{}`: {err}",
            path.display()
        )),
    }
}

fn report<T>(value: T, warnings: Vec<String>) -> LoadReport<T> {
    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    LoadReport { value, warnings }
}

/// Reads a JSON document. A missing file is silently `None`; an unreadable or
/// malformed one is `None` plus a warning.
fn read_json<T: DeserializeOwned>(path: &Path) -> LoadReport<Option<T>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no data file yet");
            return LoadReport::clean(None);
        }
        Err(err) => {
            return LoadReport {
                value: None,
                warnings: vec![format!("could not read `{}`: {err}", path.display())],
            }
        }
    };
    match serde_json::from_str(&data) {
        Ok(value) => LoadReport::clean(Some(value)),
        Err(err) => LoadReport {
            value: None,
            warnings: vec![format!(
                "`{}` is corrupt and was ignored: {err}",
                path.display()
            )],
        },
    }
}

/// Writes every file to a temporary sibling first and only then renames them
/// into place, so a failed write leaves all previous files intact.
fn commit(staged: &[(PathBuf, String)]) -> Result<()> {
    let mut written = Vec::with_capacity(staged.len());
    for (path, data) in staged {
        let tmp = tmp_path(path);
        if let Err(err) = write_atomic(&tmp, data) {
            for leftover in &written {
                let _ = fs::remove_file(leftover);
            }
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        written.push(tmp);
    }
    for ((path, _), tmp) in staged.iter().zip(&written) {
        fs::rename(tmp, path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Amount, Category};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().join("data"))).expect("json storage");
        (storage, temp)
    }

    fn sample_entry() -> Entry {
        Entry::new(
            1,
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            "Groceries",
            Category::Food,
            Amount::expense(8_990),
        )
    }

    fn corrupt_copies(storage: &JsonStorage) -> Vec<PathBuf> {
        let dir = storage.entries_path().parent().unwrap();
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|item| item.ok())
            .map(|item| item.path())
            .filter(|path| {
                path.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .starts_with("entries.json.corrupt-")
            })
            .collect()
    }

    #[test]
    fn missing_files_load_empty_without_warnings() {
        let (storage, _guard) = storage_with_temp_dir();
        let entries = storage.load_entries();
        assert!(entries.value.is_empty());
        assert!(entries.warnings.is_empty());
        assert_eq!(storage.load_checkpoint(), LoadReport::clean(None));
    }

    #[test]
    fn corrupt_file_loads_empty_with_warning() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(storage.entries_path(), "{ not json").unwrap();
        let entries = storage.load_entries();
        assert!(entries.value.is_empty());
        assert_eq!(entries.warnings.len(), 2);
        assert!(entries.warnings[0].contains("corrupt"));
        assert!(entries.warnings[1].contains("entries.json.corrupt-"));
        assert_eq!(corrupt_copies(&storage).len(), 1);
    }

    #[test]
    fn corrupt_checkpoint_is_copied_aside() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(&storage.checkpoint_file, "2025-01").unwrap();
        let checkpoint = storage.load_checkpoint();
        assert_eq!(checkpoint.value, None);
        assert_eq!(checkpoint.warnings.len(), 2);
        let kept = fs::read_dir(storage.checkpoint_file.parent().unwrap())
            .unwrap()
            .filter_map(|item| item.ok())
            .filter(|item| {
                item.file_name()
                    .to_string_lossy()
                    .starts_with("checkpoint.json.corrupt-")
            })
            .count();
        assert_eq!(kept, 1);
    }

    #[test]
    fn one_malformed_record_does_not_drop_its_neighbours() {
        let (storage, _guard) = storage_with_temp_dir();
        let raw = r#"[
            {"id": 1, "date": "2025-01-02", "description": "Groceries",
             "category": "Food", "outgoing": 89.90},
            {"id": 2, "date": "not a date", "description": "Broken",
             "category": "Food", "outgoing": 1.00}
        ]"#;
        fs::write(storage.entries_path(), raw).unwrap();

        let entries = storage.load_entries();
        assert_eq!(entries.value, vec![sample_entry()]);
        assert!(entries.warnings[0].starts_with("record 2 in"));
        let copies = corrupt_copies(&storage);
        assert_eq!(copies.len(), 1);
        assert_eq!(fs::read_to_string(&copies[0]).unwrap(), raw);
    }

    #[test]
    fn clean_file_is_not_copied_aside() {
        let (storage, _guard) = storage_with_temp_dir();
        storage
            .save_all(&[sample_entry()], &[], None)
            .expect("save ledger");
        assert!(storage.load_entries().warnings.is_empty());
        assert!(corrupt_copies(&storage).is_empty());
    }

    #[test]
    fn older_file_names_are_read_until_current_files_exist() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(
            &storage.legacy_entries_file,
            r#"[{"id": 1, "data": "2025-01-02", "descricao": "Groceries",
                 "categoria": "Alimentação", "saida": 89.90}]"#,
        )
        .unwrap();
        fs::write(&storage.legacy_checkpoint_file, "2025-01\n").unwrap();

        assert_eq!(storage.load_entries().value, vec![sample_entry()]);
        assert_eq!(
            storage.load_checkpoint().value,
            YearMonth::new(2025, 1)
        );

        storage.save_all(&[], &[], None).expect("save ledger");
        assert!(storage.load_entries().value.is_empty());
        assert!(storage.legacy_entries_file.exists());
    }

    #[test]
    fn save_without_checkpoint_leaves_marker_untouched() {
        let (storage, _guard) = storage_with_temp_dir();
        let period = YearMonth::new(2025, 1).unwrap();
        storage.save_checkpoint(period).expect("save checkpoint");
        storage
            .save_all(&[sample_entry()], &[], None)
            .expect("save ledger");
        assert_eq!(storage.load_checkpoint().value, Some(period));
        assert_eq!(storage.load_entries().value, vec![sample_entry()]);
        assert!(!tmp_path(storage.entries_path()).exists());
    }
}
