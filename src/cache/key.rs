//! Cache key construction
//!
//! Keys are a prefix followed by parameter parts, joined with `_`.
//! Callers name every parameter (`"skip", 0` rather than just `0`) so
//! different queries do not produce the same string.

use std::fmt::{Display, Write};

/// Separator between the prefix and each part.
pub const KEY_DELIMITER: char = '_';

/// Incremental key builder.
///
/// ```
/// use logitrack::cache::CacheKey;
///
/// let key = CacheKey::new("inventory").part("skip").part(0).part("take").part(50).build();
/// assert_eq!(key, "inventory_skip_0_take_50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    buf: String,
}

impl CacheKey {
    pub fn new(prefix: &str) -> Self {
        Self {
            buf: prefix.to_string(),
        }
    }

    /// Appends one part.
    pub fn part(mut self, part: impl Display) -> Self {
        self.buf.push(KEY_DELIMITER);
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{}", part);
        self
    }

    pub fn build(self) -> String {
        self.buf
    }
}

/// Joins `prefix` and `parts` with [`KEY_DELIMITER`].
pub fn build_key(prefix: &str, parts: &[&dyn Display]) -> String {
    parts
        .iter()
        .fold(CacheKey::new(prefix), |key, part| key.part(part))
        .build()
}

/// Key of one page of an unfiltered listing: `prefix_skip_{skip}_take_{take}`.
///
/// Invalidation guesses these keys, so list endpoints must use this form.
pub fn paginated_key(prefix: &str, skip: u64, take: u32) -> String {
    build_key(prefix, &[&"skip", &skip, &"take", &take])
}

/// Part that starts every total-count key.
pub const COUNT_PART: &str = "count";

/// Key of a total count: `prefix_count`, followed by the filter parts.
///
/// Writes drop every key of this form under their prefix, so totals
/// never lag behind the pages they describe.
pub fn count_key(prefix: &str, parts: &[&dyn Display]) -> String {
    parts
        .iter()
        .fold(CacheKey::new(prefix).part(COUNT_PART), |key, part| key.part(part))
        .build()
}

/// Key of a single record: `prefix_{id}`.
pub fn entity_key(prefix: &str, id: impl Display) -> String {
    CacheKey::new(prefix).part(id).build()
}

/// Builds a cache key from a prefix and any number of displayable parts.
///
/// ```
/// use logitrack::cache_key;
///
/// assert_eq!(cache_key!("order_data", 7), "order_data_7");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr $(, $part:expr)* $(,)?) => {
        $crate::cache::CacheKey::new($prefix)$(.part($part))*.build()
    };
}
