use super::{ExecutionContext, Executor, Statement};
use crate::core::{DbError, Result};
use crate::mutation::{MutationRequest, StatementKind};
use crate::result::{MutationOutcome, QueryResult};

use async_trait::async_trait;

pub struct InsertExecutor;

#[async_trait]
impl Executor for InsertExecutor {
    fn name(&self) -> &'static str {
        "INSERT"
    }

    fn can_handle(&self, stmt: &Statement) -> bool {
        matches!(stmt, Statement::Mutation(m) if m.kind == StatementKind::Insert)
    }

    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult> {
        let request = expect_mutation(stmt, self.name())?;
        apply_mutation(request, ctx).await
    }
}

pub(super) fn expect_mutation<'s>(stmt: &'s Statement, executor: &str) -> Result<&'s MutationRequest> {
    match stmt {
        Statement::Mutation(request) => Ok(request),
        Statement::Read(_) => Err(DbError::UnsupportedOperation(format!(
            "{} executor cannot run a read",
            executor
        ))),
    }
}

/// Validate, stamp and merge one mutation. Nothing reaches storage unless
/// validation and timestamp resolution both succeed.
pub(super) async fn apply_mutation(
    request: &MutationRequest,
    ctx: &ExecutionContext<'_>,
) -> Result<QueryResult> {
    let schema = ctx.storage.get_schema(&request.table)?;
    let validated = ctx.processor.validate(request, &schema)?;
    let resolved = ctx.resolver.resolve(validated.timestamp)?;
    let mutation = ctx.processor.translate(&validated, &resolved);

    let stats = ctx.storage.apply(&request.table, &mutation).await?;
    tracing::debug!(
        table = %request.table,
        kind = %request.kind,
        key = %validated.key,
        write_time = resolved.write_time(),
        applied = stats.applied,
        discarded = stats.discarded,
        "mutation merged"
    );

    Ok(QueryResult::Mutation(MutationOutcome {
        write_time: resolved.write_time(),
        stats,
    }))
}
