//! Keeps a local list of transactions in step with the API, falling back to
//! a cache file and to local changes when the API cannot be reached.

use std::{collections::HashSet, path::PathBuf, time::Duration};

use crate::{
    NewTransaction, Summary, Transaction, TransactionId,
    client::{
        ApiClient, CacheContents, CategoryList, ClientError, FallbackCache, SyncWarning,
        sample_transactions,
    },
};

/// What to do with a create, update or delete when the server cannot be
/// reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DivergencePolicy {
    /// Apply the change to the local list only and show a warning. The local
    /// list may then differ from the server until the next refresh.
    #[default]
    LocalFallback,
    /// Return the error and leave the local list unchanged.
    Strict,
}

/// Settings for [TransactionSync].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// The base URL of the API, e.g. `http://localhost:3001`.
    pub api_url: String,
    /// How long to wait for each request.
    pub timeout: Duration,
    /// Where to keep the fallback cache.
    pub cache_path: PathBuf,
    /// What to do with mutations when the server cannot be reached.
    pub policy: DivergencePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3001".to_owned(),
            timeout: Duration::from_secs(5),
            cache_path: PathBuf::from("ahorrapp-cache.json"),
            policy: DivergencePolicy::default(),
        }
    }
}

/// Where the result of an operation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSource {
    /// The server handled the request.
    Server,
    /// The server could not be reached and the local list was used instead.
    Local,
}

/// The client's view of the user's transactions.
///
/// The list is only replaced by a successful fetch. Failed fetches keep
/// whatever was shown before, seeding [sample_transactions] only when
/// nothing has ever been loaded.
#[derive(Debug)]
pub struct TransactionSync {
    api: ApiClient,
    cache: FallbackCache,
    policy: DivergencePolicy,
    transactions: Vec<Transaction>,
    categories: CategoryList,
    populated: bool,
    warning: Option<SyncWarning>,
}

impl TransactionSync {
    /// Create the sync layer described by `config` and load the cache file.
    ///
    /// # Errors
    /// Returns an error if `config.api_url` is not a valid URL.
    pub async fn new(config: SyncConfig) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config.api_url, config.timeout)?;

        Ok(Self::with_parts(api, FallbackCache::new(config.cache_path), config.policy).await)
    }

    /// Create the sync layer from its parts and load the cache file.
    ///
    /// An unreadable cache is reported as a warning and otherwise ignored.
    pub async fn with_parts(api: ApiClient, cache: FallbackCache, policy: DivergencePolicy) -> Self {
        let mut sync = Self {
            api,
            cache,
            policy,
            transactions: Vec::new(),
            categories: CategoryList::default(),
            populated: false,
            warning: None,
        };

        match sync.cache.load().await {
            Ok(Some(contents)) => {
                tracing::debug!(
                    "Loaded {} cached transactions from {}",
                    contents.transactions.len(),
                    sync.cache.path().display()
                );
                sync.transactions = contents.transactions;
                sync.categories = CategoryList::from_saved(contents.categories);
                sync.populated = true;
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!("Could not load cache: {error}");
                sync.warning = Some(SyncWarning::new("Could not load the local cache", error));
            }
        }

        sync
    }

    /// The API client used by this sync layer.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The current list of transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Up to `count` of the newest transactions.
    pub fn recent(&self, count: usize) -> &[Transaction] {
        &self.transactions[..count.min(self.transactions.len())]
    }

    /// The balance, income and expense totals of the current list.
    pub fn summary(&self) -> Summary {
        Summary::from_transactions(&self.transactions)
    }

    /// The user's category names.
    pub fn categories(&self) -> &[String] {
        self.categories.names()
    }

    /// The warning from the most recent fallback, if it has not been
    /// dismissed.
    pub fn warning(&self) -> Option<&SyncWarning> {
        self.warning.as_ref()
    }

    /// Clear the current warning.
    pub fn dismiss_warning(&mut self) {
        self.warning = None;
    }

    /// Add a category to the local list and save it to the cache.
    ///
    /// # Errors
    /// Returns an error if the name is blank or already taken.
    pub async fn add_category(&mut self, name: &str) -> Result<(), ClientError> {
        self.categories.add(name)?;
        self.save_cache().await;

        Ok(())
    }

    /// Fetch the transactions from the server.
    ///
    /// On success the local list and the cache are replaced. On failure the
    /// current list is kept, or seeded with sample data if it was never
    /// populated, and a warning is set.
    pub async fn refresh(&mut self) -> SyncSource {
        match self.api.list_transactions().await {
            Ok(transactions) => {
                tracing::debug!("Fetched {} transactions", transactions.len());
                self.transactions = transactions;
                self.populated = true;
                self.save_cache().await;
                SyncSource::Server
            }
            Err(error) => {
                tracing::warn!("Could not fetch transactions: {error}");

                if !self.populated {
                    self.transactions = sample_transactions();
                    self.populated = true;
                }

                self.warning = Some(SyncWarning::new(
                    "Could not load transactions from the server, showing local data",
                    error,
                ));
                SyncSource::Local
            }
        }
    }

    /// Create a transaction, locally if the server cannot be reached and the
    /// policy allows it.
    ///
    /// # Errors
    /// Returns an error if the server rejects the transaction, or if it
    /// cannot be reached under [DivergencePolicy::Strict].
    pub async fn create(
        &mut self,
        transaction: NewTransaction,
    ) -> Result<(Transaction, SyncSource), ClientError> {
        match self.api.create_transaction(&transaction).await {
            Ok(created) => {
                self.transactions.insert(0, created.clone());
                self.save_cache().await;
                Ok((created, SyncSource::Server))
            }
            Err(error) if self.should_fall_back(&error) => {
                let id = self.next_local_id();
                let created = transaction.into_transaction(id);
                tracing::warn!(
                    "Could not create transaction on the server, saved locally as {id}: {error}"
                );

                self.transactions.insert(0, created.clone());
                self.warning = Some(SyncWarning::new(
                    "Could not reach the server, the transaction was saved locally",
                    error,
                ));
                self.save_cache().await;
                Ok((created, SyncSource::Local))
            }
            Err(error) => Err(error),
        }
    }

    /// Replace the transaction with `id`, locally if the server cannot be
    /// reached and the policy allows it.
    ///
    /// # Errors
    /// Returns [ClientError::NotFound] if the server does not have the
    /// transaction, or if the local fallback does not have it either.
    pub async fn update(
        &mut self,
        id: TransactionId,
        transaction: NewTransaction,
    ) -> Result<(Transaction, SyncSource), ClientError> {
        match self.api.update_transaction(id, &transaction).await {
            Ok(updated) => {
                self.replace_local(updated.clone());
                self.save_cache().await;
                Ok((updated, SyncSource::Server))
            }
            Err(error) if self.should_fall_back(&error) => {
                let position = self
                    .transactions
                    .iter()
                    .position(|existing| existing.id == id)
                    .ok_or(ClientError::NotFound)?;
                let updated = transaction.into_transaction(id);
                tracing::warn!(
                    "Could not update transaction {id} on the server, updated locally: {error}"
                );

                self.transactions[position] = updated.clone();
                self.warning = Some(SyncWarning::new(
                    "Could not reach the server, the transaction was updated locally",
                    error,
                ));
                self.save_cache().await;
                Ok((updated, SyncSource::Local))
            }
            Err(error) => Err(error),
        }
    }

    /// Delete the transaction with `id`, locally if the server cannot be
    /// reached and the policy allows it.
    ///
    /// # Errors
    /// Returns [ClientError::NotFound] if the server does not have the
    /// transaction, or if the local fallback does not have it either.
    pub async fn delete(&mut self, id: TransactionId) -> Result<SyncSource, ClientError> {
        match self.api.delete_transaction(id).await {
            Ok(()) => {
                self.transactions.retain(|existing| existing.id != id);
                self.save_cache().await;
                Ok(SyncSource::Server)
            }
            Err(error) if self.should_fall_back(&error) => {
                let count_before = self.transactions.len();
                self.transactions.retain(|existing| existing.id != id);

                if self.transactions.len() == count_before {
                    return Err(ClientError::NotFound);
                }

                tracing::warn!(
                    "Could not delete transaction {id} on the server, deleted locally: {error}"
                );
                self.warning = Some(SyncWarning::new(
                    "Could not reach the server, the transaction was deleted locally",
                    error,
                ));
                self.save_cache().await;
                Ok(SyncSource::Local)
            }
            Err(error) => Err(error),
        }
    }

    /// Refresh up to `attempts` times, waiting `interval` before each
    /// attempt, and return the transactions that were not in the list when
    /// polling started.
    ///
    /// Polling stops at the first refresh that finds new transactions. An
    /// empty result means nothing new arrived in time.
    pub async fn poll_for_new_transactions(
        &mut self,
        attempts: u32,
        interval: Duration,
    ) -> Vec<Transaction> {
        let known: HashSet<TransactionId> = self.transactions.iter().map(|t| t.id).collect();

        for attempt in 1..=attempts {
            tokio::time::sleep(interval).await;

            if self.refresh().await == SyncSource::Local {
                tracing::debug!("Poll attempt {attempt} of {attempts} could not reach the server");
                continue;
            }

            let new_transactions: Vec<Transaction> = self
                .transactions
                .iter()
                .filter(|transaction| !known.contains(&transaction.id))
                .cloned()
                .collect();

            if !new_transactions.is_empty() {
                return new_transactions;
            }
        }

        Vec::new()
    }

    fn should_fall_back(&self, error: &ClientError) -> bool {
        self.policy == DivergencePolicy::LocalFallback && error.is_connectivity()
    }

    fn next_local_id(&self) -> TransactionId {
        self.transactions
            .iter()
            .map(|transaction| transaction.id)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn replace_local(&mut self, transaction: Transaction) {
        match self
            .transactions
            .iter_mut()
            .find(|existing| existing.id == transaction.id)
        {
            Some(existing) => *existing = transaction,
            None => {
                self.transactions.push(transaction);
                self.transactions.sort_by(|a, b| b.id.cmp(&a.id));
            }
        }
    }

    async fn save_cache(&mut self) {
        let contents = CacheContents {
            transactions: self.transactions.clone(),
            categories: self.categories.names().to_vec(),
        };

        if let Err(error) = self.cache.save(&contents).await {
            tracing::warn!("Could not save cache: {error}");
            self.warning = Some(SyncWarning::new("Could not save the local cache", error));
        }
    }
}
