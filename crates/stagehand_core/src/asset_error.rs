//! Asset error types

use std::fmt;
use std::io;

/// Error type for asset loading
#[derive(Debug)]
pub enum AssetError {
    /// The file could not be read
    Io(io::Error),
    /// The file was read but its contents are not a usable asset
    Parse(String),
    /// A named item is missing from a loaded asset
    NotFound(String),
    /// The glTF document could not be decoded
    Gltf(gltf::Error),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(err) => write!(f, "Asset IO error: {}", err),
            AssetError::Parse(msg) => write!(f, "Asset parse error: {}", msg),
            AssetError::NotFound(name) => write!(f, "Asset not found: {}", name),
            AssetError::Gltf(err) => write!(f, "glTF error: {}", err),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(err) => Some(err),
            AssetError::Gltf(err) => Some(err),
            AssetError::Parse(_) | AssetError::NotFound(_) => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(err: io::Error) -> Self {
        AssetError::Io(err)
    }
}

impl From<gltf::Error> for AssetError {
    fn from(err: gltf::Error) -> Self {
        AssetError::Gltf(err)
    }
}

impl From<ron::error::SpannedError> for AssetError {
    fn from(err: ron::error::SpannedError) -> Self {
        AssetError::Parse(err.to_string())
    }
}
