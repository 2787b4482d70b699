mod filesystem;
mod loader;
mod locator;
mod model;
mod names;

#[cfg(test)]
pub(crate) mod mock_fs;

pub use filesystem::{FileSystem, RealFileSystem};
pub use loader::{ConfigLoader, FileConfigLoader, LOCAL_CONFIG_NAME};
pub use locator::{RootLocator, resolve_encoding};
pub use model::{
    Config, DEFAULT_ENCODING, DEFAULT_TIMEOUT_SECS, ExpectedConfig, InspectionConfig, PLACEHOLDER,
    RunnerConfig, SourceConfig, is_unset,
};
pub use names::{decode_names_file, parse_expected_names, read_names_file, validate_names};
