//! Key encoding utilities for `RocksDB`.

/// Create the `tables` column family key for a logical table.
#[must_use]
pub fn table_key(table: &str) -> Vec<u8> {
    table.as_bytes().to_vec()
}

/// The fixed key holding the scope's live session.
#[must_use]
pub const fn session_key() -> &'static [u8] {
    b"current"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_key_is_the_name_bytes() {
        assert_eq!(table_key("profiles"), b"profiles".to_vec());
    }

    #[test]
    fn session_key_is_stable() {
        assert_eq!(session_key(), b"current");
    }
}
