use std::path::{Path, PathBuf};

const CSV_EXT: &str = "csv";

/// The path with a `.csv` extension added when it has none.
pub fn csv_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(CSV_EXT)
    }
}
