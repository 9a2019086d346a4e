//! Configuration for parcelier.
//!
//! Two layers live here:
//!
//! - [`ConfigFile`]: the user's `~/.parcelier/config.ini`, parsed with
//!   defaults for anything left out
//! - [`FetchConfig`]: the immutable value the fetch engine runs with, built
//!   from the file and then overlaid by command-line flags
//!
//! # Example
//!
//! ```
//! use parcelier::config::{FetchConfig, Verbosity};
//! use std::time::Duration;
//!
//! let config = FetchConfig::new("https://example.com/arcgis/rest/services/Parcels/FeatureServer/0")
//!     .with_parcel_limit(500)
//!     .with_wait(Duration::from_millis(250))
//!     .with_verbosity(Verbosity::Verbose);
//!
//! assert_eq!(config.parcel_limit(), 500);
//! assert!(config.verbosity().is_verbose());
//! ```

mod defaults;
mod fetch;
mod file;
mod parser;
mod settings;

pub use defaults::*;
pub use fetch::{FetchConfig, Verbosity};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, FetchSettings, LoggingSettings, OutputSettings, ServiceSettings};
