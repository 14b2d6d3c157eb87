use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
    pub has_more: bool,
}

/// Envelope of every list endpoint: `{data: [...], pagination: {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Offset the next page starts at.
    pub fn next_offset(&self) -> usize {
        self.pagination.offset + self.data.len()
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}
