//! Offset pagination for the listing endpoint

/// Items requested per page by default
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// One page of the listing, addressed by offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    /// First page with the given size
    pub fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }

    /// The page directly after this one
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }

    /// A full page means the server may have more after it
    pub fn is_full(&self, returned: usize) -> bool {
        returned == self.limit
    }

    /// Query string parameters for `/api/airdrops`
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}
