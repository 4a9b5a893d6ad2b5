//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (MANIP_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parameter file {0:?}: {1}")]
    FileLoadError(PathBuf, std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the full path to a file in the params directory.
pub fn param_path(param_file_path: &str) -> Result<PathBuf, LoadError> {
    let mut path = crate::host::get_sw_root().map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);
    Ok(path)
}

/// Load a parameter file
///
/// The file path is relative to the `$MANIP_SW_ROOT/params` directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    load_from_path(param_path(param_file_path)?)
}

/// Load a parameter file from an explicit path.
pub fn load_from_path<P, F>(path: F) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    F: AsRef<Path>,
{
    let params_str = read_to_string(path.as_ref())
        .map_err(|e| LoadError::FileLoadError(path.as_ref().to_path_buf(), e))?;

    from_str(&params_str)
}

/// Parse parameters from a TOML string.
pub fn from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestParams {
        settle_delay_s: f64,
        end_link: String,
        lift_limits_m: [f64; 2],
    }

    #[test]
    fn test_from_str() {
        let p: TestParams = from_str(
            r#"
            settle_delay_s = 0.7
            end_link = "link_grasp_center"
            lift_limits_m = [0.0, 1.1]
            "#,
        )
        .unwrap();

        assert_eq!(
            p,
            TestParams {
                settle_delay_s: 0.7,
                end_link: "link_grasp_center".into(),
                lift_limits_m: [0.0, 1.1],
            }
        );
    }

    #[test]
    fn test_bad_params() {
        let r: Result<TestParams, _> = from_str("settle_delay_s = \"slow\"");
        assert!(matches!(r, Err(LoadError::DeserialiseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let r: Result<TestParams, _> = load_from_path("/definitely/not/here.toml");
        assert!(matches!(r, Err(LoadError::FileLoadError(_, _))));
    }
}
