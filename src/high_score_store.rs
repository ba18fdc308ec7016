use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The single persisted high score: one little-endian `i32` on disk.
pub struct HighScoreStore {
    file_path: PathBuf,
    value: i32,
}

impl HighScoreStore {
    /// Reads the stored value, creating the file with 0 when it does not exist.
    /// Any failure is logged and treated as 0.
    pub fn open(file_path: PathBuf) -> Self {
        let value = match load_value(&file_path) {
            Ok(value) => value,
            Err(error) => {
                eprintln!(
                    "[high-score] failed to load {}: {error}",
                    file_path.display()
                );
                0
            }
        };
        Self { file_path, value }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn save(&mut self, value: i32) {
        self.value = value.max(0);
        if let Err(error) = write_value(&self.file_path, self.value) {
            eprintln!(
                "[high-score] failed to write {}: {error}",
                self.file_path.display()
            );
        }
    }
}

fn load_value(path: &Path) -> io::Result<i32> {
    if !path.exists() {
        write_value(path, 0)?;
    }
    let bytes = fs::read(path)?;
    let raw: [u8; 4] = bytes
        .get(..4)
        .and_then(|head| head.try_into().ok())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected 4 bytes, found {}", bytes.len()),
            )
        })?;
    Ok(i32::from_le_bytes(raw).max(0))
}

fn write_value(path: &Path, value: i32) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, value.to_le_bytes())
}
