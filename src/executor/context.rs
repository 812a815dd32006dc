use crate::clock::TimestampResolver;
use crate::mutation::MutationProcessor;
use crate::storage::InMemoryStorage;

pub struct ExecutionContext<'a> {
    pub storage: &'a InMemoryStorage,
    /// Session resolver: implicit timestamps and default read times.
    pub resolver: &'a TimestampResolver,
    pub processor: &'a MutationProcessor,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        storage: &'a InMemoryStorage,
        resolver: &'a TimestampResolver,
        processor: &'a MutationProcessor,
    ) -> Self {
        Self {
            storage,
            resolver,
            processor,
        }
    }
}
