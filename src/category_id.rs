//! Client category ids are 0-based, the store numbers categories from 1.
//! Every path that accepts a category id from the client goes through here.

/// Translates a client category id into the string key stored on questions.
/// `None` when the id has no store counterpart.
pub fn to_store(client_id: i64) -> Option<String> {
    client_id.checked_add(1).map(|id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts_by_one() {
        assert_eq!(to_store(0).as_deref(), Some("1"));
        assert_eq!(to_store(2).as_deref(), Some("3"));
    }

    #[test]
    fn negative_client_id_maps_below_first_category() {
        assert_eq!(to_store(-1).as_deref(), Some("0"));
    }

    #[test]
    fn largest_id_has_no_store_key() {
        assert_eq!(to_store(i64::MAX), None);
        assert_eq!(to_store(i64::MAX - 1), Some(i64::MAX.to_string()));
    }
}
