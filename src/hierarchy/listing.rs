//! Доступ к каталогам для builder'а и каталога событий.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;

use crate::error::PrismError;

/// Порядок записей каталога.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingOrder {
    /// Как вернула файловая система (порядок не гарантирован).
    Native,
    /// По имени файла, побайтно.
    #[default]
    Sorted,
}

impl FromStr for ListingOrder {
    type Err = PrismError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(ListingOrder::Native),
            "sorted" => Ok(ListingOrder::Sorted),
            _ => Err(PrismError::InvalidConfig {
                key: "listing_order",
                value: s.to_string(),
            }),
        }
    }
}

/// Сервис существования/перечисления каталогов.
pub trait DirectoryListing {
    fn is_dir(&self, path: &Path) -> bool;

    /// Обычные файлы непосредственно в `dir` (без рекурсии).
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, PrismError>;

    /// Подкаталоги непосредственно в `dir`.
    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>, PrismError>;

    /// Найти подкаталог `name` без учёта регистра ASCII.
    fn find_dir_ignore_case(&self, dir: &Path, name: &str) -> Result<Option<PathBuf>, PrismError> {
        let exact = dir.join(name);
        if self.is_dir(&exact) {
            return Ok(Some(exact));
        }
        if !self.is_dir(dir) {
            return Ok(None);
        }
        Ok(self.list_dirs(dir)?.into_iter().find(|candidate| {
            candidate
                .file_name()
                .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(name))
        }))
    }
}

/// Реализация поверх `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsListing {
    order: ListingOrder,
}

impl FsListing {
    pub fn new(order: ListingOrder) -> Self {
        Self { order }
    }

    fn entries(&self, dir: &Path, want_dirs: bool) -> Result<Vec<PathBuf>, PrismError> {
        let mut out = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!("Skipping unreadable entry in {}: {err}", dir.display());
                    continue;
                }
            };
            // Симлинки разрешаются: метаданные цели, а не ссылки.
            let path = entry.path();
            let Ok(meta) = fs::metadata(&path) else {
                warn!("Skipping entry without metadata: {}", path.display());
                continue;
            };
            if (want_dirs && meta.is_dir()) || (!want_dirs && meta.is_file()) {
                out.push(path);
            }
        }
        if self.order == ListingOrder::Sorted {
            out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        }
        Ok(out)
    }
}

impl DirectoryListing for FsListing {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, PrismError> {
        self.entries(dir, false)
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>, PrismError> {
        self.entries(dir, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn lists_only_regular_files_sorted() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        File::create(temp.path().join("b.v1")).unwrap();
        File::create(temp.path().join("a.v1")).unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();

        let files = FsListing::new(ListingOrder::Sorted)
            .list_files(temp.path())
            .unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.v1", "b.v1"]);
    }

    #[test]
    fn lists_only_directories() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp.path().join("STA1")).unwrap();
        File::create(temp.path().join("notes.txt")).unwrap();

        let dirs = FsListing::default().list_dirs(temp.path()).unwrap();
        assert_eq!(dirs, vec![temp.path().join("STA1")]);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let err = FsListing::default()
            .list_files(&temp.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, PrismError::Io(_)));
    }

    #[test]
    fn finds_directory_ignoring_case() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp.path().join("TROUBLE")).unwrap();

        let listing = FsListing::default();
        let found = listing
            .find_dir_ignore_case(temp.path(), "Trouble")
            .unwrap()
            .expect("Trouble folder should be found");
        assert!(found
            .file_name()
            .unwrap()
            .to_string_lossy()
            .eq_ignore_ascii_case("trouble"));
        assert_eq!(listing.find_dir_ignore_case(temp.path(), "V1").unwrap(), None);
    }

    #[test]
    fn listing_order_parses() {
        assert_eq!("Native".parse::<ListingOrder>().unwrap(), ListingOrder::Native);
        assert!("random".parse::<ListingOrder>().is_err());
    }
}
