//! Bookmark domain module.

mod repository;

pub use repository::BookmarkRepository;
