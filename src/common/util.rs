use std::sync::{Mutex, MutexGuard};

// ===============================================================================================
// Text
// ===============================================================================================
pub(crate) fn decode_text(bytes: &[u8], charset: Option<&str>) -> String {
    match charset {
        None | Some("utf-8") | Some("utf8") | Some("us-ascii") | Some("ascii") => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        Some("iso-8859-1") | Some("latin1") | Some("latin-1") => {
            bytes.iter().map(|&b| char::from(b)).collect()
        }
        Some(other) => {
            tracing::warn!(
                "Unsupported charset '{}', decoding request body as UTF-8",
                other
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

pub(crate) fn join_header_values(values: &[String]) -> String {
    values.join(", ")
}

// ===============================================================================================
// Sync
// ===============================================================================================
/// Locks the mutex, recovering the data if another test thread panicked while holding it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ===============================================================================================
// Similarity
// ===============================================================================================
pub(crate) fn string_distance(left: &str, right: &str) -> u32 {
    stringmetrics::levenshtein(left, right)
}
