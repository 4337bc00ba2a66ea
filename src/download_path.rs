use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use uuid::Uuid;

const MAX_NAME_ATTEMPTS: u32 = 1_000;

/// Splits `report.final.pdf` into `("report.final", Some("pdf"))`.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// `name`, then `name (1)`, `name (2)`, ... with the suffix before the extension.
fn candidate_names(name: &str) -> impl Iterator<Item = String> + '_ {
    let (stem, extension) = split_extension(name);
    std::iter::once(name.to_string())
        .chain((1..=MAX_NAME_ATTEMPTS).map(move |n| match extension {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        }))
        .chain(std::iter::once(format!("{stem}-{}", Uuid::new_v4())))
}

/// Reserves the first free path for `name` in `dir` by creating an empty
/// file there. The reservation is atomic, so concurrent callers never get
/// the same path and an existing file is never reused.
pub async fn claim_destination(dir: &Path, name: &str) -> io::Result<PathBuf> {
    for candidate in candidate_names(name) {
        let path = dir.join(candidate);
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {name}"),
    ))
}

/// Hidden temporary path the bytes are written to before the final rename.
pub fn partial_path(dir: &Path, operation_id: &Uuid) -> PathBuf {
    dir.join(format!(".{operation_id}.part"))
}
