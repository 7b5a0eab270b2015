/// Level descriptors: loading, lookup, and building a `GameState`.
///
/// ## Sources (lookup order):
///   1. A path to a `.txt` level file
///   2. Built-in embedded levels (by name)
///   3. `levels/` directory (by level name or file stem)
///
/// ## Level file format (`.txt`):
///   ```
///   # Garden Path
///   @ size 60x40
///   @ ruleset urban
///   @ obstacles #+|-XT
///   @ policy reject
///   @ player 5,5
///   @ enemy 10,10
///   @ tick 50
///   @ throttle 5
///   <exactly H rows of exactly W characters>
///   ```
///
/// The name line is optional and only recognized as the very first line
/// (a `#` followed by at least one letter, so a wall row never reads as a
/// name). `@` lines are only read before the first map row. `size` is
/// required; every other key has a default. `obstacles` overrides `ruleset`.
/// `enemy` may repeat up to the roster capacity.

use std::path::Path;
use std::time::Duration;

use crate::config::GameConfig;
use crate::domain::entity::{NpcRoster, Player, Pos, MAX_ENEMIES};
use crate::domain::grid::Grid;
use crate::domain::movement::{self, MovePolicy};
use crate::domain::tile::{ObstacleSet, Ruleset, Tile};
use crate::error::{EngineError, LevelError};
use crate::sim::world::{GameState, Phase};

pub const DEFAULT_TICK_MS: u64 = 5;
pub const DEFAULT_THROTTLE: u32 = 5;

/// Everything one level needs: map, rules, pacing, spawns.
#[derive(Clone, Debug)]
pub struct LevelDef {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub rows: Vec<String>,
    pub obstacles: ObstacleSet,
    pub policy: MovePolicy,
    /// `None` spawns the player at the grid center.
    pub player_spawn: Option<Pos>,
    pub enemy_spawns: Vec<Pos>,
    pub tick_period_ms: u64,
    pub enemy_throttle: u32,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Build the running state for a level. Validates the grid and every spawn;
/// config values override the level's pacing and glyphs.
pub fn build_state(def: &LevelDef, config: &GameConfig) -> Result<GameState, LevelError> {
    let grid = Grid::load(def.width, def.height, &def.rows, def.obstacles.clone())?;

    if def.enemy_spawns.len() > MAX_ENEMIES {
        return Err(LevelError::TooManyEnemies { found: def.enemy_spawns.len(), max: MAX_ENEMIES });
    }

    let player_spawn = def
        .player_spawn
        .unwrap_or(Pos::new(def.width / 2, def.height / 2));
    check_spawn(&grid, def.policy, "player", player_spawn)?;
    for &spawn in &def.enemy_spawns {
        check_spawn(&grid, def.policy, "enemy", spawn)?;
    }

    let tick_ms = config.speed.tick_period_ms.unwrap_or(def.tick_period_ms);
    let throttle = config.speed.enemy_throttle.unwrap_or(def.enemy_throttle);

    log::info!(
        "level `{}`: {}x{}, {} obstacle glyphs, {:?} policy, {} enemies, tick {} ms, throttle {}",
        def.name, def.width, def.height, grid.obstacles().len(), def.policy,
        def.enemy_spawns.len(), tick_ms, throttle,
    );

    Ok(GameState {
        level_name: def.name.clone(),
        player: Player::new(player_spawn, config.display.player_glyph),
        npcs: NpcRoster::new(&def.enemy_spawns, config.display.enemy_glyph),
        grid,
        policy: def.policy,
        enemy_throttle: throttle.max(1),
        frame_counter: 0,
        tick_period: Duration::from_millis(tick_ms),
        tick: 0,
        capture: config.capture,
        phase: Phase::Running,
        catches: 0,
        message: String::new(),
        message_timer: 0,
    })
}

/// Resolve `--level`: a file path, else a level name. `None` picks the first
/// embedded level.
pub fn find_level(query: Option<&str>, levels_dir: &Path) -> Result<LevelDef, EngineError> {
    let query = match query {
        Some(q) => q,
        None => return Ok(embedded_levels().remove(0)),
    };

    let path = Path::new(query);
    if path.is_file() {
        let content = std::fs::read_to_string(path).map_err(LevelError::from)?;
        return Ok(parse_level_file(&content)?);
    }

    if let Some(def) = embedded_levels()
        .into_iter()
        .find(|l| l.name.eq_ignore_ascii_case(query))
    {
        return Ok(def);
    }

    load_from_directory(levels_dir)
        .into_iter()
        .find(|(file, def)| {
            def.name.eq_ignore_ascii_case(query)
                || Path::new(file).file_stem().map_or(false, |s| s.eq_ignore_ascii_case(query))
        })
        .map(|(_, def)| def)
        .ok_or_else(|| EngineError::UnknownLevel(query.to_string()))
}

/// Names of every level reachable by name, embedded first.
pub fn level_names(levels_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = embedded_levels().into_iter().map(|l| l.name).collect();
    names.extend(load_from_directory(levels_dir).into_iter().map(|(_, def)| def.name));
    names
}

fn check_spawn(grid: &Grid, policy: MovePolicy, what: &'static str, pos: Pos) -> Result<(), LevelError> {
    if !grid.in_bounds(pos.x as i64, pos.y as i64) {
        return Err(LevelError::SpawnOutOfBounds {
            what,
            x: pos.x,
            y: pos.y,
            width: grid.width(),
            height: grid.height(),
        });
    }
    if policy == MovePolicy::Clamp && !movement::within_clamp_inset(grid, pos) {
        return Err(LevelError::SpawnOutsideInset { what, x: pos.x, y: pos.y });
    }
    if grid.is_obstacle(grid.tile_at(pos)) {
        log::warn!("{what} spawn ({}, {}) sits on an obstacle", pos.x, pos.y);
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Single-level file parsing
// ══════════════════════════════════════════════════════════════

pub fn parse_level_file(content: &str) -> Result<LevelDef, LevelError> {
    let mut name = String::new();
    let mut size: Option<(usize, usize)> = None;
    let mut ruleset = Ruleset::Boundary;
    let mut explicit_obstacles: Option<ObstacleSet> = None;
    let mut policy = MovePolicy::Reject;
    let mut player_spawn = None;
    let mut enemy_spawns = vec![];
    let mut tick_period_ms = DEFAULT_TICK_MS;
    let mut enemy_throttle = DEFAULT_THROTTLE;
    let mut rows: Vec<String> = vec![];
    let mut in_header = true;

    for (i, line) in content.lines().enumerate() {
        let lineno = i + 1;
        if in_header {
            if i == 0 && is_name_line(line) {
                name = line[1..].trim().to_string();
                continue;
            }
            if let Some(meta) = line.strip_prefix("@ ") {
                let (key, value) = meta.trim().split_once(char::is_whitespace).unwrap_or((meta.trim(), ""));
                let value = value.trim();
                let bad = |reason: String| LevelError::Parse { line: lineno, reason };
                match key {
                    "size" => size = Some(parse_size(value).ok_or_else(|| bad(format!("bad size `{value}`, expected WxH")))?),
                    "ruleset" => {
                        ruleset = Ruleset::from_name(value)
                            .ok_or_else(|| bad(format!("unknown ruleset `{value}`")))?;
                    }
                    "obstacles" => explicit_obstacles = Some(ObstacleSet::from_glyphs(value)),
                    "policy" => {
                        policy = MovePolicy::from_name(value)
                            .ok_or_else(|| bad(format!("unknown policy `{value}`")))?;
                    }
                    "player" => player_spawn = Some(parse_pos(value).ok_or_else(|| bad(format!("bad position `{value}`")))?),
                    "enemy" => enemy_spawns.push(parse_pos(value).ok_or_else(|| bad(format!("bad position `{value}`")))?),
                    "tick" => tick_period_ms = value.parse().map_err(|_| bad(format!("bad tick period `{value}`")))?,
                    "throttle" => {
                        enemy_throttle = value
                            .parse()
                            .ok()
                            .filter(|&t: &u32| t > 0)
                            .ok_or_else(|| bad(format!("bad throttle `{value}`")))?;
                    }
                    other => return Err(bad(format!("unknown key `{other}`"))),
                }
                continue;
            }
            if line.is_empty() {
                continue;
            }
            in_header = false;
        }
        rows.push(line.to_string());
    }

    while rows.last().map_or(false, |r| r.is_empty()) {
        rows.pop();
    }

    let (width, height) = size.ok_or(LevelError::MissingSize)?;
    if name.is_empty() {
        name = "Unnamed Level".to_string();
    }

    Ok(LevelDef {
        name,
        width,
        height,
        rows,
        obstacles: explicit_obstacles.unwrap_or_else(|| ruleset.into()),
        policy,
        player_spawn,
        enemy_spawns,
        tick_period_ms,
        enemy_throttle,
    })
}

/// Distinguish `# Level Name` from `########` (level data).
fn is_name_line(line: &str) -> bool {
    line.starts_with('#') && line[1..].chars().any(|c| c.is_alphabetic())
}

fn parse_size(s: &str) -> Option<(usize, usize)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let (w, h) = (w.trim().parse().ok()?, h.trim().parse().ok()?);
    // Cells are addressed as u16 on the terminal, and the status line sits below row H-1.
    (w > 0 && h > 0 && w <= u16::MAX as usize && h < u16::MAX as usize).then_some((w, h))
}

fn parse_pos(s: &str) -> Option<Pos> {
    let (x, y) = s.split_once(',')?;
    Some(Pos::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

// ══════════════════════════════════════════════════════════════
// Directory loading (individual .txt files)
// ══════════════════════════════════════════════════════════════

/// Every parseable `.txt` level in `dir`, sorted by file name. Broken files
/// are logged and skipped here; naming one directly by path still fails loudly.
pub fn load_from_directory(dir: &Path) -> Vec<(String, LevelDef)> {
    let mut results = vec![];

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return results,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map_or(false, |e| e == "txt") {
            let filename = path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            match std::fs::read_to_string(&path).map_err(LevelError::from).and_then(|c| parse_level_file(&c)) {
                Ok(def) => results.push((filename, def)),
                Err(e) => log::warn!("skipping {}: {e}", path.display()),
            }
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

// ══════════════════════════════════════════════════════════════
// Embedded levels
// ══════════════════════════════════════════════════════════════

pub fn embedded_levels() -> Vec<LevelDef> {
    vec![open_field(), urban_block(), garden()]
}

/// 160x40 walled field, clamp policy, nothing inside.
fn open_field() -> LevelDef {
    let (w, h) = (160, 40);
    LevelDef {
        name: "Open Field".to_string(),
        width: w,
        height: h,
        rows: render_canvas(&walled_canvas(w, h)),
        obstacles: Ruleset::Boundary.into(),
        policy: MovePolicy::Clamp,
        player_spawn: None,
        enemy_spawns: vec![Pos::new(10, 10), Pos::new(50, 20), Pos::new(120, 35)],
        tick_period_ms: DEFAULT_TICK_MS,
        enemy_throttle: DEFAULT_THROTTLE,
    }
}

/// 60x40 city block: pavement strips, buildings, parked cars, lampposts.
fn urban_block() -> LevelDef {
    let (w, h) = (60, 40);
    let mut c = walled_canvas(w, h);

    for x in 1..w - 1 {
        c[3][x] = '.';
        c[20][x] = '.';
        c[36][x] = '.';
    }
    for y in 1..h - 1 {
        c[y][3] = '.';
        c[y][30] = '.';
    }

    building(&mut c, 6, 6, 18, 10);
    building(&mut c, 34, 6, 20, 10);
    building(&mut c, 6, 23, 18, 10);
    building(&mut c, 34, 24, 14, 9);

    for &(x, y) in &[(12, 18), (13, 18), (40, 18), (41, 18), (50, 34), (51, 34)] {
        c[y][x] = 'X';
    }
    for &(x, y) in &[(5, 2), (25, 2), (45, 2), (26, 21), (55, 21), (26, 37)] {
        c[y][x] = 'T';
    }

    LevelDef {
        name: "Urban Block".to_string(),
        width: w,
        height: h,
        rows: render_canvas(&c),
        obstacles: Ruleset::Urban.into(),
        policy: MovePolicy::Reject,
        player_spawn: Some(Pos::new(5, 5)),
        enemy_spawns: vec![Pos::new(30, 12), Pos::new(50, 20), Pos::new(20, 36)],
        tick_period_ms: 50,
        enemy_throttle: DEFAULT_THROTTLE,
    }
}

/// 160x40 garden: a pond, a row of trees, scattered boulders.
fn garden() -> LevelDef {
    let (w, h) = (160, 40);
    let mut c = walled_canvas(w, h);

    // Pond: rim of `_`, `/`, `\`, `{`, `}`, water inside.
    let (px, py, pw, ph) = (70, 14, 24, 10);
    for x in px + 1..px + pw - 1 {
        c[py][x] = '_';
        c[py + ph - 1][x] = '-';
    }
    for y in py + 1..py + ph - 1 {
        c[y][px] = '{';
        c[y][px + pw - 1] = '}';
        for x in px + 1..px + pw - 1 {
            c[y][x] = '~';
        }
    }
    c[py][px] = '/';
    c[py][px + pw - 1] = '\\';
    c[py + ph - 1][px] = '\\';
    c[py + ph - 1][px + pw - 1] = '/';

    // Trees: `(` `)` crown over a `|` trunk.
    for x in (20..150).step_by(16) {
        c[4][x] = '(';
        c[4][x + 1] = ')';
        c[5][x] = '|';
    }

    for &(x, y) in &[(30, 30), (31, 30), (100, 8), (140, 28), (60, 33)] {
        c[y][x] = 'B';
    }
    for x in 1..w - 1 {
        c[37][x] = '.';
    }

    LevelDef {
        name: "Garden".to_string(),
        width: w,
        height: h,
        rows: render_canvas(&c),
        obstacles: Ruleset::Garden.into(),
        policy: MovePolicy::Reject,
        player_spawn: Some(Pos::new(5, 5)),
        enemy_spawns: vec![Pos::new(10, 10), Pos::new(50, 20), Pos::new(120, 35)],
        tick_period_ms: DEFAULT_TICK_MS,
        enemy_throttle: DEFAULT_THROTTLE,
    }
}

fn walled_canvas(w: usize, h: usize) -> Vec<Vec<char>> {
    let wall = Tile::WALL.glyph();
    let floor = Tile::FLOOR.glyph();
    (0..h)
        .map(|y| {
            (0..w)
                .map(|x| if x == 0 || y == 0 || x == w - 1 || y == h - 1 { wall } else { floor })
                .collect()
        })
        .collect()
}

/// Outline a building: `+` corners, `-` top/bottom, `|` sides.
fn building(c: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    for bx in x..x + w {
        c[y][bx] = '-';
        c[y + h - 1][bx] = '-';
    }
    for by in y..y + h {
        c[by][x] = '|';
        c[by][x + w - 1] = '|';
    }
    for &(cx, cy) in &[(x, y), (x + w - 1, y), (x, y + h - 1), (x + w - 1, y + h - 1)] {
        c[cy][cx] = '+';
    }
}

fn render_canvas(c: &[Vec<char>]) -> Vec<String> {
    c.iter().map(|row| row.iter().collect()).collect()
}
