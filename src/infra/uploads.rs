use anyhow::Result;
use rand::Rng;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Local-disk store for uploaded images, served statically under `/uploads`.
#[derive(Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.root
    }

    /// Write an uploaded file under a fresh unique name and return the
    /// externally addressable reference (`/uploads/{name}`).
    ///
    /// Names are `{epoch_millis}-{random}-{original}`, so two uploads of the
    /// same original filename never collide and nothing is ever overwritten.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        let filename = format!("{}-{}-{}", millis, suffix, sanitize_name(original_name));

        tokio::fs::write(self.root.join(&filename), data).await?;

        Ok(format!("/uploads/{}", filename))
    }
}

// Client-supplied filenames may carry path separators; keep only the final
// component so the write stays inside the upload root.
fn sanitize_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|component| component.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}
