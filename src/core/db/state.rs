use sqlx::{
    Sqlite,
    pool::PoolConnection,
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
    },
};
use tempdir::TempDir;
use tokio::sync::{RwLock, RwLockReadGuard};

use std::{
    fs::{self, File},
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};
use anyhow::Context;

use tar::{Archive, Builder};
use zstd::stream::{read::Decoder as ZstdDecoder, write::Encoder as ZstdEncoder};

const DB_FILE_NAME: &str = "workspace.db";
const MAX_CONNECTIONS: u32 = 5;

pub(super) struct WorkspaceState {
    workspace_file: PathBuf,
    working_dir: TempDir,
    pool: RwLock<SqlitePool>,
}

impl std::fmt::Debug for WorkspaceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceState")
            .field("workspace_file", &self.workspace_file)
            .field("working_dir", &self.working_dir.path())
            .finish()
    }
}

async fn open_pool(db_file: &Path) -> anyhow::Result<SqlitePool> {
    let connect_opts = SqliteConnectOptions::new()
        .filename(db_file)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(connect_opts)
        .await
        .with_context(|| format!("Failed to open workspace database {:?}", db_file))?;
    Ok(pool)
}

/// Write an empty tar.zst archive to `path`.
fn write_empty_archive(path: &Path) -> anyhow::Result<()> {
    let out = File::create(path)
        .with_context(|| format!("Failed to create workspace archive {:?}", path))?;
    let encoder = ZstdEncoder::new(out, 3)
        .with_context(|| format!("Failed to create zstd encoder for {:?}", path))?;
    let tar = Builder::new(encoder);
    let encoder = tar
        .into_inner()
        .with_context(|| format!("Failed to finalize empty tar {:?}", path))?;
    encoder
        .finish()
        .with_context(|| format!("Failed to finalize empty zstd stream {:?}", path))?;
    Ok(())
}

impl WorkspaceState {
    /// Acquire a pooled connection and hold the pool read lock for the entire lifetime
    /// of the returned guard.
    pub(super) async fn conn(&self) -> anyhow::Result<DbConnGuard<'_>> {
        let pool_guard = self.pool.read().await;

        // The read lock stays held inside the guard, so a concurrent save
        // cannot close the pool under an active query.
        let conn = pool_guard.acquire().await?;

        Ok(DbConnGuard {
            _pool_guard: pool_guard,
            conn,
        })
    }

    /// Pack the working directory into the workspace archive.
    fn save_tar_zstd(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.workspace_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let out = File::create(&self.workspace_file).with_context(|| {
            format!("Failed to create workspace archive {:?}", self.workspace_file)
        })?;

        let encoder = ZstdEncoder::new(out, 3).with_context(|| {
            format!("Failed to create zstd encoder for {:?}", self.workspace_file)
        })?;

        let mut tar = Builder::new(encoder);
        tar.append_dir_all(".", self.working_dir.path())
            .with_context(|| format!("Failed to add {:?} to tar", self.working_dir.path()))?;

        let encoder = tar
            .into_inner()
            .with_context(|| format!("Failed to finalize tar for {:?}", self.workspace_file))?;

        encoder.finish().with_context(|| {
            format!("Failed to finalize zstd stream for {:?}", self.workspace_file)
        })?;

        Ok(())
    }

    /// Exclusive close+pack:
    /// - waits for all in-flight queries (takes the WRITE lock)
    /// - checkpoints the WAL so the database file is current
    /// - closes the pool to release file handles
    /// - archives the working dir
    pub(super) async fn internal_close_and_pack(&self, reopen: bool) -> anyhow::Result<()> {
        let mut pool_guard = self.pool.write().await;

        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE);")
            .execute(&*pool_guard)
            .await?;

        pool_guard.close().await;

        self.save_tar_zstd()?;
        tracing::debug!(workspace = ?self.workspace_file, "workspace archive written");

        if reopen {
            let db_file = self.working_dir.path().join(DB_FILE_NAME);
            *pool_guard = open_pool(&db_file).await?;
        }
        Ok(())
    }

    pub(super) async fn save_workspace(&self) -> anyhow::Result<()> {
        self.internal_close_and_pack(true).await
    }

    pub(super) async fn new<P: AsRef<Path>>(workspace_file: P) -> anyhow::Result<Self> {
        let workspace_file = workspace_file.as_ref().to_path_buf();

        if !workspace_file.is_file() {
            if workspace_file.parent().map(|p| p.is_dir()).unwrap_or(false) {
                tracing::info!(workspace = ?workspace_file, "creating new workspace");
                write_empty_archive(&workspace_file)?;
            } else {
                anyhow::bail!("Workspace file parent does not exist: {:?}", workspace_file);
            }
        }

        let working_dir = TempDir::new("tagkeeper_workspace")?;

        {
            let f = File::open(&workspace_file)
                .with_context(|| format!("Failed to open workspace archive {:?}", workspace_file))?;

            let decoder = ZstdDecoder::new(f)
                .with_context(|| format!("Invalid zstd stream in {:?}", workspace_file))?;

            let mut archive = Archive::new(decoder);
            archive.unpack(working_dir.path()).with_context(|| {
                format!(
                    "Failed to extract archive {:?} into {:?}",
                    workspace_file,
                    working_dir.path()
                )
            })?;
        }

        let db_file = working_dir.path().join(DB_FILE_NAME);
        if !db_file.is_file() {
            File::create(&db_file)?;
        }

        let pool = open_pool(&db_file).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(workspace = ?workspace_file, "workspace opened");
        Ok(Self {
            workspace_file,
            working_dir,
            pool: RwLock::new(pool),
        })
    }
}

pub struct DbConnGuard<'a> {
    _pool_guard: RwLockReadGuard<'a, SqlitePool>,
    conn: PoolConnection<Sqlite>,
}

impl<'a> Deref for DbConnGuard<'a> {
    type Target = PoolConnection<Sqlite>;
    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl<'a> DerefMut for DbConnGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl Drop for WorkspaceState {
    fn drop(&mut self) {
        // block_on is not allowed inside a runtime; callers there must save explicitly.
        if tokio::runtime::Handle::try_current().is_ok() {
            return;
        }
        let result = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(async { self.internal_close_and_pack(false).await }),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::warn!("failed to save workspace on drop: {e:#}");
        }
    }
}
