use crate::error::CliError;
use std::path::Path;

/// Loads `.env`-style `KEY=VALUE` files into the process environment.
///
/// Lines starting with `#` and blank lines are skipped. A key already
/// present from an earlier file is overridden, not silently discarded — the
/// override is logged at debug level so a surprising value can be traced
/// back to the file that set it.
pub struct EnvManager;

impl EnvManager {
    /// Applies every `--env-file` path in the order given on the command
    /// line. Later files win on key collisions.
    pub fn load_all(paths: &[String]) -> Result<(), CliError> {
        for path in paths {
            Self::load_from_file(path)?;
        }
        Ok(())
    }

    fn load_from_file(path: impl AsRef<Path>) -> Result<(), CliError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            if std::env::var(key).is_ok() {
                tracing::debug!(file = %path.display(), key, "env-file override of existing value");
            }
            // SAFETY: single-threaded at this point in startup, before any
            // worker or connector task reads the environment.
            unsafe {
                std::env::set_var(key, value);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_simple_key_value_pairs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# a comment").unwrap();
        writeln!(file, "STRATUM_TEST_KEY=hello").unwrap();
        writeln!(file).unwrap();

        EnvManager::load_all(&[file.path().to_string_lossy().to_string()]).unwrap();
        assert_eq!(std::env::var("STRATUM_TEST_KEY").unwrap(), "hello");
    }

    #[test]
    fn later_file_overrides_earlier_one() {
        let mut first = tempfile::NamedTempFile::new().unwrap();
        writeln!(first, "STRATUM_TEST_ORDER=first").unwrap();
        let mut second = tempfile::NamedTempFile::new().unwrap();
        writeln!(second, "STRATUM_TEST_ORDER=second").unwrap();

        EnvManager::load_all(&[
            first.path().to_string_lossy().to_string(),
            second.path().to_string_lossy().to_string(),
        ])
        .unwrap();
        assert_eq!(std::env::var("STRATUM_TEST_ORDER").unwrap(), "second");
    }
}
