//! File-based storage for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::project::Project;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each project as a pretty-printed JSON file in one directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Use `base_path`, creating it if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Storage in the platform data directory.
    ///
    /// On Linux: `~/.local/share/peerdraw/projects/`
    /// On Windows: `%LOCALAPPDATA%\peerdraw\projects\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("peerdraw").join("projects"))
    }

    /// File path for a project name. Anything outside `[A-Za-z0-9_-]` is
    /// replaced with `_` so names cannot escape the directory. Names that
    /// differ only in replaced characters (`a/b`, `a_b`) share one file.
    fn project_path(&self, name: &str) -> PathBuf {
        let safe_name: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_name))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, name: &str, project: &Project) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(name);
        let json = project.to_json();

        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            log::debug!("Saved project to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, name: &str) -> BoxFuture<'_, StorageResult<Project>> {
        let path = self.project_path(name);
        let name = name.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(name));
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            Project::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, name: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(name);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut names: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            names.sort();
            Ok(names)
        })
    }

    fn exists(&self, name: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.project_path(name);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PanOffset;
    use crate::shapes::{Rectangle, Shape};
    use crate::storage::block_on;
    use kurbo::Point;
    use tempfile::tempdir;

    fn sample_project() -> Project {
        Project {
            zoom: 1.25,
            pan: PanOffset { x: 4.0, y: -8.0 },
            shapes: vec![Shape::Rectangle(Rectangle::new(Point::new(5.0, 5.0), 10.0, 20.0)).to_record()],
            ..Project::default()
        }
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let project = sample_project();

        block_on(storage.save("board", &project)).unwrap();
        let loaded = block_on(storage.load("board")).unwrap();

        assert_eq!(loaded, project);
        assert!(dir.path().join("board.json").exists());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_list_ignores_other_files() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save("doc2", &Project::default())).unwrap();
        block_on(storage.save("doc1", &Project::default())).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let list = block_on(storage.list()).unwrap();
        assert_eq!(list, vec!["doc1".to_string(), "doc2".to_string()]);
    }

    #[test]
    fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save("test", &Project::default())).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());

        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_name() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save("../escape:me", &sample_project())).unwrap();
        assert!(dir.path().join("___escape_me.json").exists());
        assert_eq!(block_on(storage.load("../escape:me")).unwrap(), sample_project());
    }

    #[test]
    fn test_file_storage_names_are_ascii() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save("plan-é", &sample_project())).unwrap();
        assert!(dir.path().join("plan-_.json").exists());
        assert_eq!(
            storage.project_path("a/b"),
            storage.project_path("a_b"),
        );
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let result = block_on(storage.load("broken"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
