use crate::core::{DbError, Result, TableSchema};
use std::collections::HashMap;
use std::sync::Arc;

/// Catalog хранит только метаданные (схемы таблиц).
/// Immutable после создания - можно клонировать без блокировок.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: Arc<HashMap<String, Arc<TableSchema>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить таблицу - возвращает НОВЫЙ Catalog, старый остается неизменным.
    pub fn with_table(self, schema: TableSchema) -> Result<Self> {
        let name = schema.name().to_string();
        if self.tables.contains_key(&name) {
            return Err(DbError::TableExists(name));
        }

        let mut tables = (*self.tables).clone();
        tables.insert(name, Arc::new(schema));
        Ok(Self {
            tables: Arc::new(tables),
        })
    }

    pub fn without_table(self, name: &str) -> Result<Self> {
        if !self.tables.contains_key(name) {
            return Err(DbError::TableNotFound(name.to_string()));
        }

        let mut tables = (*self.tables).clone();
        tables.remove(name);
        Ok(Self {
            tables: Arc::new(tables),
        })
    }

    /// Схема таблицы - без блокировок.
    pub fn get_table(&self, name: &str) -> Result<Arc<TableSchema>> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }
}
