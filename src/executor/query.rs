use super::{ExecutionContext, Executor, Statement};
use crate::core::{DbError, Result};
use crate::read::{ReadProjector, ReadRequest, RowSelector};
use crate::result::{Projection, QueryResult, ReadResult};

use async_trait::async_trait;

/// Reads rows at a single read time. Every row and column of one request is
/// judged against the same instant, so a scan never mixes two clock readings.
pub struct SelectExecutor;

#[async_trait]
impl Executor for SelectExecutor {
    fn name(&self) -> &'static str {
        "SELECT"
    }

    fn can_handle(&self, stmt: &Statement) -> bool {
        matches!(stmt, Statement::Read(_))
    }

    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult> {
        let Statement::Read(request) = stmt else {
            return Err(DbError::UnsupportedOperation(
                "SELECT executor cannot run a mutation".into(),
            ));
        };

        self.execute_select(request, ctx).await.map(QueryResult::Rows)
    }
}

impl SelectExecutor {
    async fn execute_select(
        &self,
        request: &ReadRequest,
        ctx: &ExecutionContext<'_>,
    ) -> Result<ReadResult> {
        let read_time = request.read_time.unwrap_or_else(|| ctx.resolver.now());

        // Read lock только на одну таблицу
        let table_handle = ctx.storage.get_table(&request.table)?;
        let table = table_handle.read().await;
        let projector = ReadProjector::new(table.schema(), request, read_time)?;

        let mut rows = Vec::new();
        let mut push = |projection: Projection| {
            if let Projection::Row(row) = projection {
                rows.push(row);
            }
        };

        match &request.selector {
            RowSelector::Key(parts) => {
                let key = table.schema().row_key(parts)?;
                push(projector.project(&key, table.row(&key))?);
            }
            RowSelector::Partition(parts) => {
                let partition = table.schema().partition_key(parts)?;
                for (key, cells) in table.partition(&partition) {
                    push(projector.project(key, Some(cells))?);
                }
            }
            RowSelector::All => {
                for (key, cells) in table.rows() {
                    push(projector.project(key, Some(cells))?);
                }
            }
        }

        tracing::debug!(
            table = %request.table,
            read_time,
            rows = rows.len(),
            "select evaluated"
        );

        Ok(ReadResult {
            columns: projector.column_names(),
            rows,
            read_time,
        })
    }
}
