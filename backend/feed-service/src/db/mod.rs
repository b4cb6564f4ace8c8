/// Database access layer
///
/// This module provides:
/// - `AccountStore`: account lookups by id, by address, and by address set
/// - `FeedRepository`: the filtered, newest-first, paginated post query
/// - `PostStore`: single-post reads, post creation, and like insertion
///
/// Each seam is a trait with a PostgreSQL implementation.
pub mod account_repo;
pub mod post_repo;

#[cfg(test)]
pub(crate) mod fixtures;

pub use account_repo::{AccountStore, PgAccountStore};
pub use post_repo::{FeedRepository, FeedSlice, PgPostRepository, PostFilter, PostStore};

/// `%query%` with LIKE metacharacters escaped, for use with `ESCAPE '\'`.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
