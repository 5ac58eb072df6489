pub mod errors;

use std::{
  collections::HashMap,
  fmt, fs,
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::{PoisonError, RwLock},
};

use crate::store::storage::errors::{StorageError, StorageErrorType, handle_io_error};

/// Key-value string store that keeps the cart alive across page reloads.
pub trait KeyValueStore: fmt::Debug + Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
  fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
  fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
  entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
    Ok(entries.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    entries.remove(key);
    Ok(())
  }
}

/// One file per key under `dir`, named `<key>.json`.
#[derive(Debug)]
pub struct FileStorage {
  dir: PathBuf,
}

#[derive(Debug)]
pub struct FileStorageArgs {
  pub dir: PathBuf,
}

impl FileStorage {
  pub fn new(args: FileStorageArgs) -> Result<Self, StorageError> {
    fs::create_dir_all(&args.dir)
      .map_err(|err| handle_io_error(err, "storefront.store.file_storage.new", ""))?;
    Ok(Self { dir: args.dir })
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  fn file_for(&self, key: &str, path: &str) -> Result<PathBuf, StorageError> {
    let valid = !key.is_empty()
      && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
      && !key.starts_with('.');

    if !valid {
      return Err(StorageError::new(
        StorageErrorType::InvalidKey,
        None,
        "storage keys may only contain ascii letters, digits, '-', '_' and '.'",
        path,
        format!("key: {}", key),
      ));
    }

    Ok(self.dir.join(format!("{}.json", key)))
  }
}

impl KeyValueStore for FileStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    let path = "storefront.store.file_storage.get";
    let file = self.file_for(key, path)?;

    match fs::read_to_string(&file) {
      Ok(value) => Ok(Some(value)),
      Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
      Err(err) => Err(handle_io_error(err, path, key)),
    }
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    let path = "storefront.store.file_storage.set";
    let file = self.file_for(key, path)?;

    // Write aside then rename so a crash never leaves half a cart behind.
    let tmp = file.with_extension("json.tmp");
    fs::write(&tmp, value).map_err(|err| handle_io_error(err, path, key))?;
    fs::rename(&tmp, &file).map_err(|err| handle_io_error(err, path, key))
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    let path = "storefront.store.file_storage.remove";
    let file = self.file_for(key, path)?;

    match fs::remove_file(&file) {
      Ok(()) => Ok(()),
      Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
      Err(err) => Err(handle_io_error(err, path, key)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_memory_storage() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get("cart").unwrap(), None);

    storage.set("cart", "[]").unwrap();
    assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));

    storage.remove("cart").unwrap();
    storage.remove("cart").unwrap();
    assert_eq!(storage.get("cart").unwrap(), None);
  }

  #[test]
  fn test_file_storage_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(FileStorageArgs { dir: dir.path().join("carts") }).unwrap();

    assert_eq!(storage.get("storefront.cart").unwrap(), None);
    storage.set("storefront.cart", r#"[{"a":1}]"#).unwrap();
    assert_eq!(storage.get("storefront.cart").unwrap().as_deref(), Some(r#"[{"a":1}]"#));
    assert!(storage.dir().join("storefront.cart.json").exists());

    storage.remove("storefront.cart").unwrap();
    assert_eq!(storage.get("storefront.cart").unwrap(), None);
  }

  #[test]
  fn test_file_storage_rejects_path_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(FileStorageArgs { dir: dir.path().to_path_buf() }).unwrap();

    for key in ["", "../escape", "a/b", ".hidden"] {
      let err = storage.set(key, "x").unwrap_err();
      assert_eq!(err.err_type, StorageErrorType::InvalidKey, "key {:?}", key);
    }
  }
}
