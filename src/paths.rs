//! Per-user location of `config.toml`
use std::path::PathBuf;

/// `{config_dir}/repoqa/config.toml`, where `config_dir` is `%APPDATA%` on Windows,
/// `~/Library/Application Support` on macOS and `$XDG_CONFIG_HOME` or `~/.config` elsewhere
pub fn default_config_path() -> PathBuf {
    config_dir(|key| std::env::var(key).ok())
        .join("repoqa")
        .join("config.toml")
}

fn config_dir(var: impl Fn(&str) -> Option<String>) -> PathBuf {
    let dir = if cfg!(target_os = "windows") {
        var("APPDATA").map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        var("HOME").map(|home| PathBuf::from(home).join("Library/Application Support"))
    } else {
        var("XDG_CONFIG_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(".config")))
    };
    dir.unwrap_or_else(|| PathBuf::from("."))
}
