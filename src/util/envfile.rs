//! Minimal `.env` support for the CLI.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Result;

/// Parse KEY=VALUE lines from a .env-style file. Missing file yields an
/// empty map; blank lines and `#` comments are skipped; surrounding quotes
/// on values are stripped. Does not modify the process environment.
pub fn parse_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    if !path.exists() {
        return Ok(map);
    }
    let content = fs::read_to_string(path)?;
    for (idx, line) in content.lines().enumerate() {
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        match s.split_once('=') {
            Some((key, value)) => {
                let mut value = value.to_string();
                if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
                    || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
                {
                    value = value[1..value.len() - 1].to_string();
                }
                map.insert(key.trim().to_string(), value);
            }
            None => log::warn!(
                "ignoring {} line {} without '=': {}",
                path.display(),
                idx + 1,
                line
            ),
        }
    }
    Ok(map)
}

/// Load `.env` from the current working directory into the process
/// environment, without overriding variables that are already set. Must
/// run before clap parses env-backed arguments.
pub fn load_dotenv_if_present() -> Result<()> {
    for (key, value) in parse_env_file(Path::new(".env"))? {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, &value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_skips_comments_and_strips_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "# comment").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "GEO_MATCHER_OUT=\"out dir/result.csv\"").unwrap();
        writeln!(f, "GEO_MATCHER_FORMAT=both").unwrap();
        writeln!(f, "not a pair").unwrap();
        drop(f);

        let map = parse_env_file(&path).unwrap();
        assert_eq!(
            map.get("GEO_MATCHER_OUT").map(String::as_str),
            Some("out dir/result.csv")
        );
        assert_eq!(
            map.get("GEO_MATCHER_FORMAT").map(String::as_str),
            Some("both")
        );
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let map = parse_env_file(Path::new("/nonexistent/.env")).unwrap();
        assert!(map.is_empty());
    }
}
