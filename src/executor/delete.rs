use super::dml::{apply_mutation, expect_mutation};
use super::{ExecutionContext, Executor, Statement};
use crate::core::Result;
use crate::mutation::StatementKind;
use crate::result::QueryResult;

use async_trait::async_trait;

/// Row deletes and column deletes. Both write tombstones; neither removes
/// anything from storage.
pub struct DeleteExecutor;

#[async_trait]
impl Executor for DeleteExecutor {
    fn name(&self) -> &'static str {
        "DELETE"
    }

    fn can_handle(&self, stmt: &Statement) -> bool {
        matches!(stmt, Statement::Mutation(m) if m.kind == StatementKind::Delete)
    }

    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult> {
        let request = expect_mutation(stmt, self.name())?;
        apply_mutation(request, ctx).await
    }
}
