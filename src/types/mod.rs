//! Shared response and query types.

mod pagination;
mod response;

pub use pagination::PaginationParams;
pub use response::{ApiResponse, Created};
