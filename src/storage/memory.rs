use super::{Catalog, RowMutation, Table};
use super::table::MergeStats;
use crate::core::{DbError, Result, TableSchema};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryStorage {
    /// Таблицы с индивидуальными блокировками
    tables: HashMap<String, Arc<RwLock<Table>>>,
    catalog: Catalog,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            catalog: Catalog::new(),
        }
    }

    /// Создать таблицу
    pub fn create_table(&mut self, schema: TableSchema) -> Result<()> {
        let name = schema.name().to_string();
        self.catalog = self.catalog.clone().with_table(schema.clone())?;
        self.tables
            .insert(name, Arc::new(RwLock::new(Table::new(schema))));
        Ok(())
    }

    /// Удалить таблицу
    pub fn drop_table(&mut self, table_name: &str) -> Result<()> {
        self.catalog = self.catalog.clone().without_table(table_name)?;
        self.tables.remove(table_name);
        Ok(())
    }

    /// Получить handle на таблицу для конкурентного доступа
    pub fn get_table(&self, name: &str) -> Result<Arc<RwLock<Table>>> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    /// Снимок каталога: схемы без блокировки таблиц
    pub fn catalog(&self) -> Catalog {
        self.catalog.clone()
    }

    pub fn get_schema(&self, table_name: &str) -> Result<Arc<TableSchema>> {
        self.catalog.get_table(table_name)
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.catalog.table_exists(name)
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.catalog.list_tables()
    }

    /// Apply a resolved row mutation under the table's write lock.
    pub async fn apply(&self, table_name: &str, mutation: &RowMutation) -> Result<MergeStats> {
        let table_handle = self.get_table(table_name)?;
        let mut table = table_handle.write().await;
        Ok(table.apply(mutation))
    }

    /// Количество хранимых строк (включая невидимые)
    pub async fn row_count(&self, table_name: &str) -> Result<usize> {
        let table_handle = self.get_table(table_name)?;
        let table = table_handle.read().await;
        Ok(table.row_count())
    }
}
