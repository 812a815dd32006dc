use super::dml::{apply_mutation, expect_mutation};
use super::{ExecutionContext, Executor, Statement};
use crate::core::Result;
use crate::mutation::StatementKind;
use crate::result::QueryResult;

use async_trait::async_trait;

pub struct UpdateExecutor;

#[async_trait]
impl Executor for UpdateExecutor {
    fn name(&self) -> &'static str {
        "UPDATE"
    }

    fn can_handle(&self, stmt: &Statement) -> bool {
        matches!(stmt, Statement::Mutation(m) if m.kind == StatementKind::Update)
    }

    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult> {
        let request = expect_mutation(stmt, self.name())?;
        apply_mutation(request, ctx).await
    }
}
