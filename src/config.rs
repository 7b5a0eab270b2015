/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD), or from an
/// explicit `--config` path. Falls back to defaults if the file is missing,
/// incomplete or unparseable.
///
/// ```toml
/// [general]
/// levels_dir = "levels"
/// level = "Urban Block"
/// log_file = "tilechase.log"
/// log_level = "info"
///
/// [speed]            # overrides the level's own pacing when present
/// tick_period_ms = 20
/// enemy_throttle = 5
///
/// [display]
/// backend = "native" # or "ansi"
/// player_glyph = "@"
/// enemy_glyph = "E"
/// status_line = true
///
/// [game]
/// on_capture = "continue" # or "end"
/// ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::sim::world::CapturePolicy;
use crate::ui::backend::BackendKind;

const APP_NAME: &str = "tilechase";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub display: DisplayConfig,
    pub capture: CapturePolicy,
    pub levels_dir: PathBuf,
    /// Level to start when `--level` is not given.
    pub level: Option<String>,
    pub log_file: PathBuf,
    pub log_level: String,
}

/// `None` keeps the value the level declares.
#[derive(Clone, Debug, Default)]
pub struct SpeedConfig {
    pub tick_period_ms: Option<u64>,
    pub enemy_throttle: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub backend: BackendKind,
    pub player_glyph: char,
    pub enemy_glyph: char,
    pub status_line: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    game: TomlGame,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default)]
    level: Option<String>,
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Deserialize, Debug, Default)]
struct TomlSpeed {
    #[serde(default)]
    tick_period_ms: Option<u64>,
    #[serde(default)]
    enemy_throttle: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default)]
    backend: BackendKind,
    #[serde(default = "default_player_glyph")]
    player_glyph: char,
    #[serde(default = "default_enemy_glyph")]
    enemy_glyph: char,
    #[serde(default = "default_status_line")]
    status_line: bool,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGame {
    #[serde(default)]
    on_capture: CapturePolicy,
}

// ── Defaults ──

fn default_levels_dir() -> String { "levels".into() }
fn default_log_file() -> String { format!("{APP_NAME}.log") }
fn default_log_level() -> String { "info".into() }
fn default_player_glyph() -> char { '@' }
fn default_enemy_glyph() -> char { 'E' }
fn default_status_line() -> bool { true }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            level: None,
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            backend: BackendKind::default(),
            player_glyph: default_player_glyph(),
            enemy_glyph: default_enemy_glyph(),
            status_line: default_status_line(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, CWD, `~/.local/share/tilechase`,
    /// `/usr/share/tilechase`. Missing file or missing keys fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    /// Load an explicitly named config file. Relative paths inside it resolve
    /// against the file's own directory first.
    pub fn load_from(path: &Path) -> Self {
        let toml_cfg = read_toml(path).unwrap_or_default();
        let mut dirs = vec![];
        if let Some(parent) = path.parent() {
            dirs.push(parent.to_path_buf());
        }
        GameConfig::from_toml(toml_cfg, &dirs)
    }

    /// Parse config text, resolving nothing against the filesystem.
    #[cfg(test)]
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(toml_cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let TomlConfig { general, speed, display, game } = toml_cfg;

        GameConfig {
            speed: SpeedConfig {
                tick_period_ms: speed.tick_period_ms,
                enemy_throttle: speed.enemy_throttle,
            },
            display: DisplayConfig {
                backend: display.backend,
                player_glyph: display.player_glyph,
                enemy_glyph: display.enemy_glyph,
                status_line: display.status_line,
            },
            capture: game.on_capture,
            levels_dir: resolve_levels_dir(&general.levels_dir, search_dirs),
            level: general.level.filter(|l| !l.trim().is_empty()),
            log_file: PathBuf::from(general.log_file),
            log_level: general.log_level,
        }
    }

    /// `log_level` as a filter; unknown names mean `info`.
    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

/// Absolute paths are taken as-is; relative ones are looked up in each
/// candidate directory, defaulting to CWD-relative.
fn resolve_levels_dir(levels_dir: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = PathBuf::from(levels_dir);
    if path.is_absolute() {
        return path;
    }
    search_dirs.iter()
        .map(|d| d.join(levels_dir))
        .find(|p| p.is_dir())
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so an installed link still finds data next to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share").join(APP_NAME);
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    let sys = PathBuf::from("/usr/share").join(APP_NAME);
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First `config.toml` found in the candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    search_dirs.iter()
        .map(|dir| dir.join("config.toml"))
        .find(|path| path.exists())
        .and_then(|path| read_toml(&path))
        .unwrap_or_default()
}

/// Logging is not up yet when config loads, so problems go to stderr.
fn read_toml(path: &Path) -> Option<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                eprintln!("Warning: {} parse error: {e}", path.display());
                eprintln!("Using default settings.");
                None
            }
        },
        Err(e) => {
            eprintln!("Warning: could not read {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.speed.tick_period_ms, None);
        assert_eq!(cfg.speed.enemy_throttle, None);
        assert_eq!(cfg.display.backend, BackendKind::Native);
        assert_eq!(cfg.display.player_glyph, '@');
        assert_eq!(cfg.display.enemy_glyph, 'E');
        assert!(cfg.display.status_line);
        assert_eq!(cfg.capture, CapturePolicy::Continue);
        assert_eq!(cfg.levels_dir, PathBuf::from("levels"));
        assert_eq!(cfg.level, None);
        assert_eq!(cfg.log_file, PathBuf::from("tilechase.log"));
        assert_eq!(cfg.log_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            r#"
            [speed]
            enemy_throttle = 3

            [display]
            backend = "ansi"
            enemy_glyph = "Z"

            [game]
            on_capture = "end"

            [general]
            level = "Urban Block"
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.speed.tick_period_ms, None);
        assert_eq!(cfg.speed.enemy_throttle, Some(3));
        assert_eq!(cfg.display.backend, BackendKind::Ansi);
        assert_eq!(cfg.display.enemy_glyph, 'Z');
        assert_eq!(cfg.display.player_glyph, '@');
        assert_eq!(cfg.capture, CapturePolicy::End);
        assert_eq!(cfg.level.as_deref(), Some("Urban Block"));
        assert_eq!(cfg.log_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn bad_values_are_parse_errors() {
        assert!(GameConfig::parse("[display]\nbackend = \"curses\"").is_err());
        assert!(GameConfig::parse("[game]\non_capture = \"explode\"").is_err());
        assert!(GameConfig::parse("[display]\nplayer_glyph = \"ab\"").is_err());
    }

    #[test]
    fn unknown_log_level_means_info() {
        let cfg = GameConfig::parse("[general]\nlog_level = \"chatty\"").unwrap();
        assert_eq!(cfg.log_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn explicit_file_resolves_levels_dir_next_to_it() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("maps")).unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[general]\nlevels_dir = \"maps\"\n[speed]\ntick_period_ms = 40\n").unwrap();

        let cfg = GameConfig::load_from(&path);
        assert_eq!(cfg.levels_dir, dir.path().join("maps"));
        assert_eq!(cfg.speed.tick_period_ms, Some(40));
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[speed\ntick_period_ms = ").unwrap();
        let cfg = GameConfig::load_from(&path);
        assert_eq!(cfg.speed.tick_period_ms, None);
        assert_eq!(cfg.display.player_glyph, '@');
    }
}
