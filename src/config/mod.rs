use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::from_file(default_config_path())
    }

    /// Defaults, then `path` (if present), then environment overrides.
    pub fn from_file(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    if let Some((k, v)) = parse_line(&line) {
                        map.insert(k, v);
                    }
                }
            }
        }

        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from)
    }

    pub fn python_bin(&self) -> String {
        self.get("PYTHON_BIN").unwrap_or_else(|| "python3".into())
    }

    pub fn preload_modules(&self) -> String {
        self.get("PRELOAD_MODULES").unwrap_or_default()
    }

    pub fn workdir(&self) -> Option<PathBuf> {
        self.get_path("INTERP_WORKDIR")
    }

    pub fn log_level(&self) -> String {
        self.get("LOG_LEVEL").unwrap_or_else(|| "warn".into())
    }

    pub fn default_color(&self) -> String {
        self.get("DEFAULT_COLOR").unwrap_or_else(|| "green".into())
    }
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (k, v) = line.split_once('=')?;
    Some((k.trim().to_string(), v.trim().to_string()))
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "PYTHON_BIN",
        "PRELOAD_MODULES",
        "INTERP_WORKDIR",
        "LOG_LEVEL",
        "DEFAULT_COLOR",
    ];

    KEYS.contains(&k) || k.starts_with("AUTODS_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("autods").join(".autodsrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("PYTHON_BIN".into(), "python3".into());
    m.insert("PRELOAD_MODULES".into(), "pd=pandas".into());
    m.insert("LOG_LEVEL".into(), "warn".into());
    m.insert("DEFAULT_COLOR".into(), "green".into());
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_line_skips_comments_and_blanks() {
        assert_eq!(parse_line("# comment"), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("no equals sign"), None);
        assert_eq!(
            parse_line(" PYTHON_BIN = /usr/bin/python3 "),
            Some(("PYTHON_BIN".into(), "/usr/bin/python3".into()))
        );
    }

    #[test]
    fn rc_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# interpreter settings").unwrap();
        writeln!(file, "AUTODS_TEST_ONLY_KEY=from-file").unwrap();
        writeln!(file, "DEFAULT_COLOR=cyan").unwrap();

        let cfg = Config::from_file(file.path());
        assert_eq!(cfg.get("AUTODS_TEST_ONLY_KEY").as_deref(), Some("from-file"));
        if env::var("DEFAULT_COLOR").is_err() {
            assert_eq!(cfg.get("DEFAULT_COLOR").as_deref(), Some("cyan"));
        }
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::from_file(dir.path().join(".autodsrc"));
        if env::var("PRELOAD_MODULES").is_err() {
            assert_eq!(cfg.preload_modules(), "pd=pandas");
        }
        if env::var("INTERP_WORKDIR").is_err() {
            assert!(cfg.workdir().is_none());
        }
    }
}
