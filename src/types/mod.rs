//! Response and query types shared by the list and create endpoints.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use response::{Created, MessageResponse, NoContent};
