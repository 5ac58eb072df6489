use std::error::Error;
use std::fmt;
use std::io::{Error as IoError, ErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub enum StorageErrorType {
  InvalidKey,
  JsonMarshal,
  JsonUnmarshal,
  Privileges,
  Io,
}

impl fmt::Display for StorageErrorType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StorageErrorType::InvalidKey => write!(f, "invalid_key"),
      StorageErrorType::JsonMarshal => write!(f, "json_marshal"),
      StorageErrorType::JsonUnmarshal => write!(f, "json_unmarshal"),
      StorageErrorType::Privileges => write!(f, "insufficient_privilege"),
      StorageErrorType::Io => write!(f, "io_error"),
    }
  }
}

#[derive(Debug)]
pub struct StorageError {
  pub err_type: StorageErrorType,
  pub err: Option<Box<dyn Error + Send + Sync>>,
  pub msg: String,
  pub path: String,
  pub details: String,
}

impl fmt::Display for StorageError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut parts = Vec::new();

    if !self.path.is_empty() {
      parts.push(format!("path: {}", self.path));
    }

    parts.push(format!("err_type: {}", self.err_type));

    if !self.msg.is_empty() {
      parts.push(format!("msg: {}", self.msg));
    }

    if !self.details.is_empty() {
      parts.push(format!("details: {}", self.details));
    }

    if let Some(ref err) = self.err {
      parts.push(format!("err: {}", err));
    }

    write!(f, "{}", parts.join(", "))
  }
}

impl Error for StorageError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    self.err.as_ref().map(|e| &**e as &dyn Error)
  }
}

impl StorageError {
  pub fn new(
    err_type: StorageErrorType,
    err: Option<Box<dyn Error + Send + Sync>>,
    msg: impl Into<String>,
    path: impl Into<String>,
    details: impl Into<String>,
  ) -> Self {
    Self { err_type, err, msg: msg.into(), path: path.into(), details: details.into() }
  }
}

pub fn handle_io_error(err: IoError, path: &str, key: &str) -> StorageError {
  let (err_type, msg) = match err.kind() {
    ErrorKind::PermissionDenied => {
      (StorageErrorType::Privileges, "insufficient permissions to access the cart storage")
    }
    ErrorKind::InvalidData => (StorageErrorType::JsonUnmarshal, "stored value is not valid utf-8"),
    _ => (StorageErrorType::Io, "cart storage is unavailable"),
  };

  StorageError::new(err_type, Some(Box::new(err)), msg, path, format!("key: {}", key))
}

pub fn handle_json_error(err: serde_json::Error, path: &str, key: &str) -> StorageError {
  let err_type = match err.classify() {
    serde_json::error::Category::Io => StorageErrorType::Io,
    _ => StorageErrorType::JsonUnmarshal,
  };

  StorageError::new(
    err_type,
    Some(Box::new(err)),
    "stored cart is malformed",
    path,
    format!("key: {}", key),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_lists_parts() {
    let err = StorageError::new(StorageErrorType::InvalidKey, None, "bad key", "store.set", "");
    assert_eq!(err.to_string(), "path: store.set, err_type: invalid_key, msg: bad key");
  }

  #[test]
  fn test_io_error_mapping() {
    let err = handle_io_error(IoError::from(ErrorKind::PermissionDenied), "p", "cart");
    assert_eq!(err.err_type, StorageErrorType::Privileges);
    assert_eq!(err.details, "key: cart");

    let err = handle_io_error(IoError::from(ErrorKind::Other), "p", "cart");
    assert_eq!(err.err_type, StorageErrorType::Io);
  }

  #[test]
  fn test_json_error_mapping() {
    let json_err = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err();
    let err = handle_json_error(json_err, "p", "cart");
    assert_eq!(err.err_type, StorageErrorType::JsonUnmarshal);
  }
}
