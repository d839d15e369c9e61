//! Tolerant extraction of item ids from free-text oracle replies.

use data_loader::ItemId;

/// Pull up to `max` positive integer ids out of `text`, in the order they
/// appear.
///
/// A token is a maximal run of ASCII digits. A `-` directly in front of it
/// marks it negative unless the `-` itself follows a letter or digit
/// (`"sci-fi 12"`, `"1-3"` and `"book-7"` are not negatives). Zero,
/// negatives and values that overflow `ItemId` are discarded. Repeats are
/// kept.
pub fn extract_item_ids(text: &str, max: usize) -> Vec<ItemId> {
    let bytes = text.as_bytes();
    let mut ids = Vec::new();
    let mut i = 0;

    while i < bytes.len() && ids.len() < max {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }

        if is_negative(bytes, start) {
            continue;
        }
        // Digits are ASCII, so the slice is on char boundaries
        match text[start..i].parse::<ItemId>() {
            Ok(id) if id > 0 => ids.push(id),
            _ => {}
        }
    }

    ids
}

fn is_negative(bytes: &[u8], start: usize) -> bool {
    if start == 0 || bytes[start - 1] != b'-' {
        return false;
    }
    start < 2 || !bytes[start - 2].is_ascii_alphanumeric()
}
