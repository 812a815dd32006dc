use super::{ExecutionContext, Statement};
use crate::core::{DbError, Result};
use crate::result::QueryResult;

use async_trait::async_trait;

#[async_trait]
pub trait Executor: Send + Sync {
    /// Имя executor'а для отладки
    fn name(&self) -> &'static str;

    fn can_handle(&self, stmt: &Statement) -> bool;
    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult>;
}

pub struct ExecutorPipeline {
    pub executors: Vec<Box<dyn Executor>>,
}

impl ExecutorPipeline {
    pub fn new() -> Self {
        Self {
            executors: Vec::new(),
        }
    }

    /// Pipeline with every built-in statement executor registered.
    pub fn with_default_executors() -> Self {
        use super::delete::DeleteExecutor;
        use super::dml::InsertExecutor;
        use super::query::SelectExecutor;
        use super::update::UpdateExecutor;

        let mut pipeline = Self::new();
        pipeline.register(Box::new(InsertExecutor));
        pipeline.register(Box::new(UpdateExecutor));
        pipeline.register(Box::new(DeleteExecutor));
        pipeline.register(Box::new(SelectExecutor));
        pipeline
    }

    pub fn register(&mut self, executor: Box<dyn Executor>) {
        self.executors.push(executor);
    }

    pub async fn execute(
        &self,
        stmt: &Statement,
        ctx: &ExecutionContext<'_>,
    ) -> Result<QueryResult> {
        for executor in &self.executors {
            if executor.can_handle(stmt) {
                tracing::trace!(executor = executor.name(), "dispatching statement");
                return executor.execute(stmt, ctx).await;
            }
        }

        Err(DbError::UnsupportedOperation(
            "No executor found for statement".into(),
        ))
    }
}

impl Default for ExecutorPipeline {
    fn default() -> Self {
        Self::with_default_executors()
    }
}
