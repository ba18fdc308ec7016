use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::constants::{BOARD_COLS, BOARD_ROWS, TILE_SIZE};
use crate::types::{Direction, HunterKind, PelletKind, TraverseKind, WorldPos};

pub type TileId = usize;

/// Configuration errors raised while loading the board or its sprite map.
#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("board has no rows")]
    Empty,
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("board is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    Dimensions {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("unknown symbol {symbol:?} at row {row}, col {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
    #[error("teleport at row {row}, col {col} is not on the left or right edge")]
    DetachedTeleport { row: usize, col: usize },
    #[error("teleport at row {row}, col {col} has no partner on the opposite edge")]
    UnpairedTeleport { row: usize, col: usize },
    #[error("anchor {symbol:?} appears more than once")]
    DuplicateAnchor { symbol: char },
    #[error("anchor {symbol:?} is missing")]
    MissingAnchor { symbol: char },
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("sprite map line {line} is malformed: {text:?}")]
    MalformedSpriteLine { line: usize, text: String },
    #[error("symbol {symbol:?} has no sprite mapping")]
    MissingSprite { symbol: char },
}

#[derive(Clone, Debug)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub symbol: char,
    pub traverse: TraverseKind,
    pub pellet: PelletKind,
    pub collected: bool,
    pub position: WorldPos,
    neighbors: [Option<TileId>; 4],
}

impl Tile {
    pub fn neighbor(&self, dir: Direction) -> Option<TileId> {
        self.neighbors[dir.index()]
    }

    pub fn is_traversable(&self) -> bool {
        !matches!(self.traverse, TraverseKind::Blocked | TraverseKind::HunterOnly)
    }

    pub fn is_hunter_traversable(&self) -> bool {
        self.traverse != TraverseKind::Blocked
    }

    pub fn is_tunnel(&self) -> bool {
        matches!(self.traverse, TraverseKind::Tunnel | TraverseKind::Teleport)
    }

    pub fn is_teleport(&self) -> bool {
        self.traverse == TraverseKind::Teleport
    }

    pub fn has_pellet(&self) -> bool {
        self.pellet != PelletKind::None && !self.collected
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Anchors {
    pub home_area: Option<TileId>,
    pub corners: [Option<TileId>; 4],
    pub seeker_spawn: Option<TileId>,
    pub hunter_spawns: [Option<TileId>; 4],
    pub bonus: Option<TileId>,
}

/// Anchors of a board that passed `require_anchors`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedAnchors {
    pub home_area: TileId,
    pub corners: [TileId; 4],
    pub seeker_spawn: TileId,
    pub hunter_spawns: [TileId; 4],
    pub bonus: TileId,
}

impl ResolvedAnchors {
    pub fn corner(&self, kind: HunterKind) -> TileId {
        self.corners[kind.index()]
    }

    pub fn hunter_spawn(&self, kind: HunterKind) -> TileId {
        self.hunter_spawns[kind.index()]
    }
}

fn classify(symbol: char) -> Option<(TraverseKind, PelletKind)> {
    let entry = match symbol {
        '#' | '0'..='4' => (TraverseKind::Blocked, PelletKind::None),
        '.' | 'f' | '5'..='9' => (TraverseKind::Open, PelletKind::None),
        'o' => (TraverseKind::Open, PelletKind::Small),
        'O' => (TraverseKind::Open, PelletKind::Power),
        'x' => (TraverseKind::Intersection, PelletKind::None),
        'X' => (TraverseKind::Intersection, PelletKind::Small),
        's' => (TraverseKind::NoUpIntersection, PelletKind::None),
        'S' => (TraverseKind::NoUpIntersection, PelletKind::Small),
        '/' => (TraverseKind::HunterOnly, PelletKind::None),
        '^' => (TraverseKind::HomeExit, PelletKind::None),
        'v' => (TraverseKind::HomeEnter, PelletKind::None),
        'T' => (TraverseKind::Teleport, PelletKind::None),
        't' => (TraverseKind::Tunnel, PelletKind::None),
        _ => return None,
    };
    Some(entry)
}

#[derive(Clone, Debug)]
pub struct TileGraph {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
    anchors: Anchors,
    total_pellets: u32,
    remaining_pellets: u32,
}

impl TileGraph {
    pub fn build(rows: &[&str]) -> Result<Self, BoardError> {
        let Some(first) = rows.first() else {
            return Err(BoardError::Empty);
        };
        let cols = first.chars().count();
        if cols == 0 {
            return Err(BoardError::Empty);
        }

        let row_count = rows.len();
        let mut tiles = Vec::with_capacity(row_count * cols);
        let mut anchors = Anchors::default();
        let mut total_pellets = 0;

        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != cols {
                return Err(BoardError::RaggedRow {
                    row,
                    expected: cols,
                    actual,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let (traverse, pellet) =
                    classify(symbol).ok_or(BoardError::UnknownSymbol { symbol, row, col })?;
                let id = tiles.len();
                record_anchor(&mut anchors, symbol, id)?;
                if pellet != PelletKind::None {
                    total_pellets += 1;
                }
                tiles.push(Tile {
                    row,
                    col,
                    symbol,
                    traverse,
                    pellet,
                    collected: false,
                    position: WorldPos {
                        x: (col as f32 - (cols / 2) as f32) * TILE_SIZE,
                        y: -(row as f32 - (row_count / 2) as f32) * TILE_SIZE,
                    },
                    neighbors: [None; 4],
                });
            }
        }

        let mut graph = Self {
            rows: row_count,
            cols,
            tiles,
            anchors,
            total_pellets,
            remaining_pellets: total_pellets,
        };
        graph.connect()?;
        Ok(graph)
    }

    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect();
        Self::build(&rows)
    }

    /// Loads a board file, which must match the fixed 36x28 grid.
    pub fn load(path: &Path) -> Result<Self, BoardError> {
        let text = fs::read_to_string(path).map_err(|error| BoardError::Io {
            path: path.to_string_lossy().to_string(),
            message: error.to_string(),
        })?;
        let graph = Self::parse(&text)?;
        if graph.rows != BOARD_ROWS || graph.cols != BOARD_COLS {
            return Err(BoardError::Dimensions {
                rows: graph.rows,
                cols: graph.cols,
                expected_rows: BOARD_ROWS,
                expected_cols: BOARD_COLS,
            });
        }
        Ok(graph)
    }

    fn connect(&mut self) -> Result<(), BoardError> {
        for id in 0..self.tiles.len() {
            let (row, col) = (self.tiles[id].row, self.tiles[id].col);
            let mut neighbors = [
                (row > 0).then(|| self.id_of(row - 1, col)),
                (col > 0).then(|| self.id_of(row, col - 1)),
                (row + 1 < self.rows).then(|| self.id_of(row + 1, col)),
                (col + 1 < self.cols).then(|| self.id_of(row, col + 1)),
            ];

            if self.tiles[id].is_teleport() {
                let (outward, partner_col) = if col == 0 {
                    (Direction::Left, self.cols - 1)
                } else if col == self.cols - 1 {
                    (Direction::Right, 0)
                } else {
                    return Err(BoardError::DetachedTeleport { row, col });
                };
                let partner = self.id_of(row, partner_col);
                if partner == id || !self.tiles[partner].is_teleport() {
                    return Err(BoardError::UnpairedTeleport { row, col });
                }
                neighbors[outward.index()] = Some(partner);
            }

            self.tiles[id].neighbors = neighbors;
        }
        Ok(())
    }

    fn id_of(&self, row: usize, col: usize) -> TileId {
        row * self.cols + col
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id]
    }

    pub fn tile_at(&self, row: usize, col: usize) -> Option<TileId> {
        (row < self.rows && col < self.cols).then(|| self.id_of(row, col))
    }

    pub fn neighbor(&self, id: TileId, dir: Direction) -> Option<TileId> {
        self.tiles[id].neighbor(dir)
    }

    pub fn position(&self, id: TileId) -> WorldPos {
        self.tiles[id].position
    }

    /// Walks up to `count` links in `dir`, stopping early at the grid boundary.
    pub fn look_ahead(&self, id: TileId, dir: Direction, count: usize) -> TileId {
        let mut current = id;
        for _ in 0..count {
            match self.neighbor(current, dir) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    pub fn square_distance(&self, a: TileId, b: TileId) -> f32 {
        self.position(a).square_distance(self.position(b))
    }

    pub fn anchors(&self) -> &Anchors {
        &self.anchors
    }

    pub fn require_anchors(&self) -> Result<ResolvedAnchors, BoardError> {
        let need = |slot: Option<TileId>, symbol: char| {
            slot.ok_or(BoardError::MissingAnchor { symbol })
        };
        let a = &self.anchors;
        Ok(ResolvedAnchors {
            home_area: need(a.home_area, '0')?,
            corners: [
                need(a.corners[0], '1')?,
                need(a.corners[1], '2')?,
                need(a.corners[2], '3')?,
                need(a.corners[3], '4')?,
            ],
            seeker_spawn: need(a.seeker_spawn, '5')?,
            hunter_spawns: [
                need(a.hunter_spawns[0], '6')?,
                need(a.hunter_spawns[1], '7')?,
                need(a.hunter_spawns[2], '8')?,
                need(a.hunter_spawns[3], '9')?,
            ],
            bonus: need(a.bonus, 'f')?,
        })
    }

    /// Marks the pellet on `id` collected and returns its kind, if one was there.
    pub fn collect(&mut self, id: TileId) -> Option<PelletKind> {
        let tile = &mut self.tiles[id];
        if !tile.has_pellet() {
            return None;
        }
        tile.collected = true;
        self.remaining_pellets = self.remaining_pellets.saturating_sub(1);
        Some(tile.pellet)
    }

    pub fn has_pellet(&self, id: TileId) -> bool {
        self.tiles[id].has_pellet()
    }

    pub fn total_pellets(&self) -> u32 {
        self.total_pellets
    }

    pub fn remaining_pellets(&self) -> u32 {
        self.remaining_pellets
    }

    pub fn remaining_fraction(&self) -> f32 {
        if self.total_pellets == 0 {
            return 0.0;
        }
        self.remaining_pellets as f32 / self.total_pellets as f32
    }

    pub fn restore_pellets(&mut self) {
        for tile in &mut self.tiles {
            tile.collected = false;
        }
        self.remaining_pellets = self.total_pellets;
    }
}

fn record_anchor(anchors: &mut Anchors, symbol: char, id: TileId) -> Result<(), BoardError> {
    let slot = match symbol {
        '0' => &mut anchors.home_area,
        '1'..='4' => &mut anchors.corners[symbol as usize - '1' as usize],
        '5' => &mut anchors.seeker_spawn,
        '6'..='9' => &mut anchors.hunter_spawns[symbol as usize - '6' as usize],
        'f' => &mut anchors.bonus,
        _ => return Ok(()),
    };
    if slot.is_some() {
        return Err(BoardError::DuplicateAnchor { symbol });
    }
    *slot = Some(id);
    Ok(())
}

/// Sprite-sheet offsets per board symbol. Only the renderer reads the offsets;
/// loading it here makes a board with unmapped symbols fail at startup.
#[derive(Clone, Debug, Default)]
pub struct SpriteMap {
    offsets: HashMap<char, (u32, u32)>,
}

impl SpriteMap {
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let mut offsets = HashMap::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let malformed = || BoardError::MalformedSpriteLine {
                line: index + 1,
                text: raw.to_string(),
            };
            let mut parts = line.split_whitespace();
            let (Some(symbol), Some(col), Some(row), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(malformed());
            };
            let mut chars = symbol.chars();
            let (Some(symbol), None) = (chars.next(), chars.next()) else {
                return Err(malformed());
            };
            let col = col.parse::<u32>().map_err(|_| malformed())?;
            let row = row.parse::<u32>().map_err(|_| malformed())?;
            offsets.insert(symbol, (col, row));
        }
        Ok(Self { offsets })
    }

    pub fn load(path: &Path) -> Result<Self, BoardError> {
        let text = fs::read_to_string(path).map_err(|error| BoardError::Io {
            path: path.to_string_lossy().to_string(),
            message: error.to_string(),
        })?;
        Self::parse(&text)
    }

    pub fn offset(&self, symbol: char) -> Option<(u32, u32)> {
        self.offsets.get(&symbol).copied()
    }

    pub fn validate_covers(&self, graph: &TileGraph) -> Result<(), BoardError> {
        match graph
            .tiles()
            .iter()
            .find(|tile| !self.offsets.contains_key(&tile.symbol))
        {
            Some(tile) => Err(BoardError::MissingSprite {
                symbol: tile.symbol,
            }),
            None => Ok(()),
        }
    }
}
