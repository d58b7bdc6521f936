//! Infrastructure layer: storage and command orchestration.

pub mod command_dispatcher;
pub mod pagination;
pub mod repository;

pub use command_dispatcher::{CommandDispatcher, DispatchError};
pub use pagination::{Page, PageRequest, PaginationMeta};
pub use repository::{InMemoryRepository, Repository, RepositoryError};
