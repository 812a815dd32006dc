use crate::clock::{Clock, SystemClock, TimestampResolver};
use crate::config::EngineConfig;
use crate::core::{DbError, Result, TableSchema};
use crate::executor::{ExecutionContext, ExecutorPipeline, Statement};
use crate::mutation::{MutationProcessor, MutationRequest};
use crate::read::{ReadRequest, RowSelector};
use crate::result::{MutationOutcome, Projection, QueryResult, ReadResult};
use crate::storage::InMemoryStorage;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;
use tracing::Instrument;

struct Shared {
    storage: RwLock<InMemoryStorage>,
    executor_pipeline: ExecutorPipeline,
    processor: MutationProcessor,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    /// Последний выданный номер сессии (0 занят сессией по умолчанию)
    last_session: AtomicU32,
    default_resolver: TimestampResolver,
}

/// The public entry point: owns the tables and hands out sessions.
///
/// Cloning is cheap and every clone sees the same tables.
#[derive(Clone)]
pub struct Database {
    shared: Arc<Shared>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub name: String,
    pub column_count: usize,
    /// Stored row entries, visible or not
    pub row_count: usize,
}

impl Database {
    /// Database on the system clock.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Database on a caller-supplied clock, typically a `ManualClock` in tests.
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let default_resolver = TimestampResolver::new(clock.clone(), origin(config.node_id, 0));
        let shared = Shared {
            storage: RwLock::new(InMemoryStorage::new()),
            executor_pipeline: ExecutorPipeline::with_default_executors(),
            processor: MutationProcessor::new(config.max_ttl_seconds),
            config,
            clock,
            last_session: AtomicU32::new(0),
            default_resolver,
        };

        tracing::info!(
            node_id = shared.config.node_id,
            max_ttl_seconds = shared.config.max_ttl_seconds,
            "database opened"
        );

        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// A new session with its own monotonic timestamp sequence.
    pub fn session(&self) -> Session {
        let number = self.shared.last_session.fetch_add(1, Ordering::AcqRel) + 1;
        let resolver = TimestampResolver::new(
            self.shared.clock.clone(),
            origin(self.shared.config.node_id, number),
        );
        tracing::debug!(session = number, origin = resolver.origin(), "session opened");

        Session {
            db: self.clone(),
            resolver: Arc::new(resolver),
        }
    }

    pub async fn create_table(&self, schema: TableSchema) -> Result<()> {
        let name = schema.name().to_string();
        self.shared.storage.write().await.create_table(schema)?;
        tracing::info!(table = %name, "table created");
        Ok(())
    }

    pub async fn drop_table(&self, name: &str) -> Result<()> {
        self.shared.storage.write().await.drop_table(name)?;
        tracing::info!(table = %name, "table dropped");
        Ok(())
    }

    pub async fn table_exists(&self, name: &str) -> bool {
        self.shared.storage.read().await.table_exists(name)
    }

    pub async fn list_tables(&self) -> Vec<String> {
        self.shared.storage.read().await.list_tables()
    }

    pub async fn table_stats(&self, name: &str) -> Result<TableStats> {
        let storage = self.shared.storage.read().await;
        let schema = storage.get_schema(name)?;
        let row_count = storage.row_count(name).await?;

        Ok(TableStats {
            name: name.to_string(),
            column_count: schema.columns().len(),
            row_count,
        })
    }

    /// Runs a statement on the default session.
    pub async fn execute(&self, statement: impl Into<Statement>) -> Result<QueryResult> {
        let statement = statement.into();
        self.run(&self.shared.default_resolver, &statement).await
    }

    pub async fn mutate(&self, request: MutationRequest) -> Result<MutationOutcome> {
        self.execute(request).await.and_then(expect_mutation)
    }

    pub async fn read(&self, request: ReadRequest) -> Result<ReadResult> {
        self.execute(request).await.and_then(expect_rows)
    }

    async fn run(&self, resolver: &TimestampResolver, statement: &Statement) -> Result<QueryResult> {
        let span = tracing::info_span!(
            "statement",
            table = %statement.table(),
            origin = resolver.origin()
        );

        async {
            let storage = self.shared.storage.read().await;
            let ctx = ExecutionContext::new(&storage, resolver, &self.shared.processor);
            let result = self.shared.executor_pipeline.execute(statement, &ctx).await;
            if let Err(err) = &result {
                tracing::debug!(error = %err, "statement rejected");
            }
            result
        }
        .instrument(span)
        .await
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.shared.config)
            .field("clock", &self.shared.clock)
            .finish_non_exhaustive()
    }
}

/// An independent execution context.
///
/// Implicit timestamps issued by one session strictly increase, even when
/// the clock stands still. Two sessions never issue equal stamps.
#[derive(Debug, Clone)]
pub struct Session {
    db: Database,
    resolver: Arc<TimestampResolver>,
}

impl Session {
    pub fn origin(&self) -> u64 {
        self.resolver.origin()
    }

    /// The session clock's current reading, the default read time.
    pub fn now(&self) -> i64 {
        self.resolver.now()
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn execute(&self, statement: impl Into<Statement>) -> Result<QueryResult> {
        let statement = statement.into();
        self.db.run(&self.resolver, &statement).await
    }

    pub async fn mutate(&self, request: MutationRequest) -> Result<MutationOutcome> {
        self.execute(request).await.and_then(expect_mutation)
    }

    pub async fn read(&self, request: ReadRequest) -> Result<ReadResult> {
        self.execute(request).await.and_then(expect_rows)
    }

    /// Reads one row by full primary key.
    pub async fn project(&self, request: ReadRequest) -> Result<Projection> {
        if !matches!(request.selector, RowSelector::Key(_)) {
            return Err(DbError::InvalidRequest(
                "Projecting a single row requires a full primary key".into(),
            ));
        }

        let mut result = self.read(request).await?;
        Ok(match result.rows.pop() {
            Some(row) => Projection::Row(row),
            None => Projection::Absent,
        })
    }
}

fn origin(node_id: u32, session: u32) -> u64 {
    (u64::from(node_id) << 32) | u64::from(session)
}

fn expect_mutation(result: QueryResult) -> Result<MutationOutcome> {
    result
        .into_mutation()
        .ok_or_else(|| DbError::UnsupportedOperation("Statement did not mutate".into()))
}

fn expect_rows(result: QueryResult) -> Result<ReadResult> {
    result
        .into_rows()
        .ok_or_else(|| DbError::UnsupportedOperation("Statement returned no rows".into()))
}
