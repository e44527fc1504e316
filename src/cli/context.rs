use std::path::{Path, PathBuf};

use crate::{
    config::{Config, ConfigManager},
    core::{
        utils::{data_dir_in, export_dir_in},
        TransactionStore,
    },
    storage::JsonFileStorage,
};

use crate::errors::CliError;

/// State shared by every subcommand of one CLI invocation.
pub struct CliContext {
    pub base_dir: PathBuf,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: TransactionStore,
}

impl CliContext {
    /// Opens the config file and the transaction slot under `base_dir`.
    pub fn open(base_dir: &Path) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base_dir)?;
        let config = config_manager.load()?;
        let storage = JsonFileStorage::new(data_dir_in(base_dir))?;
        let store = TransactionStore::open(Box::new(storage))?;
        tracing::debug!(
            base = %base_dir.display(),
            transactions = store.len(),
            "cli context opened"
        );
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            config_manager,
            config,
            store,
        })
    }

    pub fn export_dir(&self) -> PathBuf {
        export_dir_in(&self.base_dir)
    }

    pub fn symbol(&self) -> &str {
        &self.config.currency_symbol
    }

    pub fn save_config(&self) -> Result<(), CliError> {
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}
