use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".pocket_ledger";
const DATA_DIR: &str = "data";
const CONFIG_FILE: &str = "config.json";
const ENTRIES_FILE: &str = "entries.json";
const FIXED_BILLS_FILE: &str = "fixed_bills.json";
const CHECKPOINT_FILE: &str = "checkpoint.json";
// File names written by the earlier single-file application.
const LEGACY_ENTRIES_FILE: &str = "dados_financeiros.json";
const LEGACY_FIXED_BILLS_FILE: &str = "contas_fixas.json";
const LEGACY_CHECKPOINT_FILE: &str = "ultimo_mes_contas_fixas.txt";

pub const HOME_ENV: &str = "POCKET_LEDGER_HOME";

/// Resolves every on-disk location used by the application.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application directory, defaulting to `~/.pocket_ledger`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn data_dir_in(base: &Path) -> PathBuf {
        base.join(DATA_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    pub fn entries_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(ENTRIES_FILE)
    }

    pub fn fixed_bills_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(FIXED_BILLS_FILE)
    }

    pub fn checkpoint_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CHECKPOINT_FILE)
    }

    pub fn legacy_entries_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(LEGACY_ENTRIES_FILE)
    }

    pub fn legacy_fixed_bills_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(LEGACY_FIXED_BILLS_FILE)
    }

    pub fn legacy_checkpoint_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(LEGACY_CHECKPOINT_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
