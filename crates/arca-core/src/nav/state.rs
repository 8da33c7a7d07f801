//! Navigation state machine coordinating listings, searches and file
//! operations.
//!
//! The [`Navigator`] owns the session state and publishes it as
//! [`NavSnapshot`] values over a `watch` channel. Every intent bumps a
//! generation counter and cancels whatever was running, so exactly one
//! result stream is live at a time; completions from superseded intents
//! are discarded, never merged into the current view.
//!
//! All filesystem work runs on tokio's blocking pool — the dispatching
//! task only awaits.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::command::Command;
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::fs::entry::{FileEntry, FileKind};
use crate::fs::ops;
use crate::nav::breadcrumb::{self, Segment};
use crate::nav::search::{self, CancelFlag};
use crate::nav::sort::{filter_hidden, sort_entries, SortKey};
use crate::store::RecentStore;

/// What the frontend should be rendering right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Nothing loaded yet.
    #[default]
    Idle,
    /// An intent is in flight.
    Loading,
    /// A directory listing is on screen.
    Listed,
    /// Search results are on screen.
    SearchResults,
    /// The last intent failed; `error` holds the message.
    Error,
}

/// One immutable view of the session, published after every state change.
#[derive(Debug, Clone, Default)]
pub struct NavSnapshot {
    /// The directory on screen (or being loaded).
    pub dir: PathBuf,
    /// Entries to display: a listing or search results, never both.
    pub entries: Vec<FileEntry>,
    /// Breadcrumb segments for `dir`, root first.
    pub breadcrumbs: Vec<Segment>,
    /// Current sort key.
    pub sort_key: SortKey,
    /// The active search query, `None` while listing.
    pub search_query: Option<String>,
    /// Whether dot-prefixed entries are shown.
    pub show_hidden: bool,
    pub state: ViewState,
    /// Human-readable message of the last failure, until acknowledged.
    pub error: Option<String>,
}

/// A file the user opened, handed to the frontend's viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    pub path: PathBuf,
    pub kind: FileKind,
}

/// Session coordinator. One per open browsing session.
pub struct Navigator {
    store: Arc<RecentStore>,
    generation: AtomicU64,
    cancel: Mutex<CancelFlag>,
    snapshot_tx: watch::Sender<NavSnapshot>,
}

impl Navigator {
    /// Creates a navigator rooted at the configured start directory.
    ///
    /// The snapshot starts `Idle`; dispatch [`Command::Refresh`] to list
    /// the root.
    pub fn new(config: &Config, store: Arc<RecentStore>) -> Self {
        let snapshot = NavSnapshot {
            dir: config.storage.root.clone(),
            sort_key: SortKey::parse(&config.general.default_sort),
            show_hidden: config.general.show_hidden,
            ..NavSnapshot::default()
        };
        let (snapshot_tx, _) = watch::channel(snapshot);

        Self {
            store,
            generation: AtomicU64::new(0),
            cancel: Mutex::new(CancelFlag::new()),
            snapshot_tx,
        }
    }

    /// Subscribes to snapshot updates. The receiver holds the current
    /// snapshot immediately.
    pub fn subscribe(&self) -> watch::Receiver<NavSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Returns a clone of the current snapshot.
    pub fn snapshot(&self) -> NavSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Applies one UI intent. Errors are published into the snapshot's
    /// error slot rather than returned; the only value handed back is the
    /// file to open when the intent was [`Command::Open`] on a file.
    pub async fn dispatch(&self, command: Command) -> Option<OpenedFile> {
        match command {
            Command::Navigate(dir) => self.navigate(dir).await,
            Command::GoUp => self.go_up().await,
            Command::Refresh => {
                let dir = self.snapshot_tx.borrow().dir.clone();
                self.navigate(dir).await;
            }
            Command::Open(path) => return self.open(path).await,
            Command::Search(query) => self.search(query).await,
            Command::CancelSearch => {
                self.current_cancel().cancel();
                let dir = self.snapshot_tx.borrow().dir.clone();
                self.navigate(dir).await;
            }
            Command::SetSort(key) => self.set_sort(key),
            Command::ToggleHidden => {
                self.snapshot_tx
                    .send_modify(|s| s.show_hidden = !s.show_hidden);
                let dir = self.snapshot_tx.borrow().dir.clone();
                self.navigate(dir).await;
            }
            Command::Create { name, is_dir } => self.create(name, is_dir).await,
            Command::Rename { path, new_name } => self.rename(path, new_name).await,
            Command::Delete(path) => self.delete(path).await,
            Command::Copy { src, target_dir } => self.copy(src, target_dir).await,
            Command::Move { src, target_dir } => self.mv(src, target_dir).await,
            Command::SetFavorite { path, favorite } => {
                self.publish_store_result(self.store.set_favorite(&path, favorite).map(|_| ()));
            }
            Command::RemoveRecent(path) => {
                self.publish_store_result(self.store.remove(&path));
            }
            Command::ClearHistory => {
                self.publish_store_result(self.store.clear_history());
            }
            Command::AcknowledgeError => {
                self.snapshot_tx.send_modify(|s| {
                    s.error = None;
                    if s.state == ViewState::Error {
                        s.state = ViewState::Listed;
                    }
                });
            }
        }
        None
    }

    async fn navigate(&self, dir: PathBuf) {
        let generation = self.begin(None);
        let result = self.list_blocking(dir.clone()).await;
        self.apply_listing(generation, dir, result);
    }

    async fn go_up(&self) {
        let current = self.snapshot_tx.borrow().dir.clone();
        match current.parent() {
            Some(parent) => self.navigate(parent.to_path_buf()).await,
            // Already at the filesystem root.
            None => {}
        }
    }

    /// Opens an entry: directories navigate, files are recorded as
    /// recently used and returned for the frontend's viewer to render.
    async fn open(&self, path: PathBuf) -> Option<OpenedFile> {
        if path.is_dir() {
            self.navigate(path).await;
            return None;
        }

        let entry = match run_blocking(move || {
            let metadata = std::fs::symlink_metadata(&path)
                .map_err(|e| CoreError::from_io(e, &path))?;
            Ok(FileEntry::new(path, &metadata))
        })
        .await
        {
            Ok(entry) => entry,
            Err(e) => {
                self.publish_error(e);
                return None;
            }
        };

        if let Err(e) = self.store.record_access(&entry) {
            // The file still opens; only the history write failed.
            tracing::warn!("failed to record access: {e}");
        }

        Some(OpenedFile {
            path: entry.path().to_path_buf(),
            kind: entry.kind(),
        })
    }

    async fn search(&self, query: String) {
        let generation = self.begin(Some(query.clone()));
        let cancel = self.current_cancel();
        let root = self.snapshot_tx.borrow().dir.clone();

        let result = run_blocking(move || search::search(&root, &query, &cancel)).await;

        if !self.is_current(generation) {
            return;
        }
        match result {
            Ok(entries) => self.snapshot_tx.send_modify(|s| {
                let visible = filter_hidden(&entries, s.show_hidden);
                s.entries = sort_entries(&visible, s.sort_key);
                s.state = ViewState::SearchResults;
                s.error = None;
            }),
            // A cancelled search was superseded or abandoned; the next
            // intent owns the terminal state.
            Err(CoreError::Cancelled) => {}
            Err(e) => self.publish_error(e),
        }
    }

    fn set_sort(&self, key: SortKey) {
        self.snapshot_tx.send_modify(|s| {
            s.sort_key = key;
            s.entries = sort_entries(&s.entries, key);
        });
    }

    async fn create(&self, name: String, is_dir: bool) {
        let parent = self.snapshot_tx.borrow().dir.clone();
        self.mutate(move || ops::create_entry(&parent, &name, is_dir).map(|_| ()))
            .await;
    }

    async fn rename(&self, path: PathBuf, new_name: String) {
        self.mutate(move || ops::rename_entry(&path, &new_name).map(|_| ()))
            .await;
    }

    async fn delete(&self, path: PathBuf) {
        self.mutate(move || ops::delete_entry(&path)).await;
    }

    async fn copy(&self, src: PathBuf, target_dir: PathBuf) {
        self.mutate(move || ops::copy_entry(&src, &target_dir).map(|_| ()))
            .await;
    }

    async fn mv(&self, src: PathBuf, target_dir: PathBuf) {
        self.mutate(move || ops::move_entry(&src, &target_dir).map(|_| ()))
            .await;
    }

    /// Runs a mutating operation, then re-lists the directory on screen
    /// so a change to it becomes visible without a manual refresh. The
    /// terminal state is always a fresh listing; search results do not
    /// survive a mutation.
    async fn mutate<F>(&self, op: F)
    where
        F: FnOnce() -> CoreResult<()> + Send + 'static,
    {
        let generation = self.begin(None);

        if let Err(e) = run_blocking(op).await {
            if self.is_current(generation) {
                self.publish_error(e);
            }
            return;
        }

        let dir = self.snapshot_tx.borrow().dir.clone();
        let result = self.list_blocking(dir.clone()).await;
        self.apply_listing(generation, dir, result);
    }

    /// Starts a new intent: bumps the generation, cancels the superseded
    /// operation and enters `Loading` synchronously.
    fn begin(&self, query: Option<String>) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut cancel = self.lock_cancel();
        cancel.cancel();
        *cancel = CancelFlag::new();
        drop(cancel);

        self.snapshot_tx.send_modify(|s| {
            s.state = ViewState::Loading;
            s.search_query = query;
        });

        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn current_cancel(&self) -> CancelFlag {
        self.lock_cancel().clone()
    }

    fn lock_cancel(&self) -> std::sync::MutexGuard<'_, CancelFlag> {
        self.cancel
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn list_blocking(
        &self,
        dir: PathBuf,
    ) -> CoreResult<(Vec<FileEntry>, Vec<Segment>)> {
        run_blocking(move || {
            let entries = ops::read_directory(&dir)?;
            let crumbs = breadcrumb::segments(&dir)?;
            Ok((entries, crumbs))
        })
        .await
    }

    fn apply_listing(
        &self,
        generation: u64,
        dir: PathBuf,
        result: CoreResult<(Vec<FileEntry>, Vec<Segment>)>,
    ) {
        if !self.is_current(generation) {
            return;
        }
        match result {
            Ok((entries, breadcrumbs)) => self.snapshot_tx.send_modify(|s| {
                let visible = filter_hidden(&entries, s.show_hidden);
                s.entries = sort_entries(&visible, s.sort_key);
                s.dir = dir;
                s.breadcrumbs = breadcrumbs;
                s.state = ViewState::Listed;
                s.search_query = None;
                s.error = None;
            }),
            Err(CoreError::Cancelled) => {}
            Err(e) => self.publish_error(e),
        }
    }

    fn publish_error(&self, error: CoreError) {
        self.snapshot_tx.send_modify(|s| {
            s.state = ViewState::Error;
            s.error = Some(error.to_string());
        });
    }

    fn publish_store_result(&self, result: CoreResult<()>) {
        if let Err(e) = result {
            self.publish_error(e);
        }
    }
}

/// Runs `f` on the blocking pool, folding a panicked worker into an I/O
/// error instead of propagating the panic.
async fn run_blocking<T, F>(f: F) -> CoreResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> CoreResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => Err(CoreError::Io(std::io::Error::other(e))),
    }
}
