use std::path::{Path, PathBuf};

/// Load a `.env` file without overriding variables already present in the
/// process environment (CI secrets always win).
///
/// Looks in the working directory first, then at the crate root. Returns the
/// file that was loaded, if any.
pub fn ensure_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenv::dotenv() {
        return Some(path);
    }
    let candidate = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    dotenv::from_path(&candidate).ok().map(|_| candidate)
}
