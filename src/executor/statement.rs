use crate::mutation::MutationRequest;
use crate::read::ReadRequest;
use serde::{Deserialize, Serialize};

/// A structured statement handed to the executor pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Mutation(MutationRequest),
    Read(ReadRequest),
}

impl Statement {
    pub fn table(&self) -> &str {
        match self {
            Self::Mutation(request) => &request.table,
            Self::Read(request) => &request.table,
        }
    }
}

impl From<MutationRequest> for Statement {
    fn from(request: MutationRequest) -> Self {
        Self::Mutation(request)
    }
}

impl From<ReadRequest> for Statement {
    fn from(request: ReadRequest) -> Self {
        Self::Read(request)
    }
}
