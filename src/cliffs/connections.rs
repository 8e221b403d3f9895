//! Cliff connection table
//!
//! A cliff path is painted one tile per position. Which tile fits depends on
//! which sides of the position the path enters and leaves through:
//! - interior positions are keyed by `(entry, exit)`, the side facing the
//!   previous position and the side facing the next one (`"NE"` = previous is
//!   north, next is east);
//! - the first position has no previous and is keyed by its exit (`"_S"`);
//! - the last position has no next and is keyed by its entry (`"W_"`).
//!
//! Twelve interior pairs plus eight endpoint keys cover every shape a path
//! of orthogonal steps can take.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::geometry::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Connection {
    Interior { entry: Direction, exit: Direction },
    Start { exit: Direction },
    End { entry: Direction },
}

impl Connection {
    /// Tileset key for this connection.
    pub fn key(&self) -> String {
        match *self {
            Connection::Interior { entry, exit } => format!("{}{}", entry.letter(), exit.letter()),
            Connection::Start { exit } => format!("_{}", exit.letter()),
            Connection::End { entry } => format!("{}_", entry.letter()),
        }
    }

    pub fn parse(key: &str) -> Option<Connection> {
        let mut chars = key.chars();
        let (a, b) = (chars.next()?, chars.next()?);
        if chars.next().is_some() {
            return None;
        }
        match (a, b) {
            ('_', x) => Some(Connection::Start { exit: Direction::from_letter(x)? }),
            (x, '_') => Some(Connection::End { entry: Direction::from_letter(x)? }),
            (x, y) => {
                let entry = Direction::from_letter(x)?;
                let exit = Direction::from_letter(y)?;
                (entry != exit).then_some(Connection::Interior { entry, exit })
            }
        }
    }

    /// Every connection a path can produce.
    pub fn all() -> Vec<Connection> {
        let mut all = Vec::with_capacity(20);
        for entry in Direction::ALL {
            for exit in Direction::ALL {
                if entry != exit {
                    all.push(Connection::Interior { entry, exit });
                }
            }
        }
        for d in Direction::ALL {
            all.push(Connection::Start { exit: d });
            all.push(Connection::End { entry: d });
        }
        all
    }
}

/// On-disk shape of a connection table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionTableSource {
    tile_size: i32,
    connections: BTreeMap<String, Vec<u16>>,
}

/// Candidate cliff tiles per connection, for one tileset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConnectionTableSource", into = "ConnectionTableSource")]
pub struct ConnectionTable {
    /// Edge length of every cliff tile, in cells. Paths advance one tile per step.
    pub tile_size: i32,
    // [entry][exit]; the diagonal stays empty.
    interior: [[Vec<u16>; 4]; 4],
    start: [Vec<u16>; 4],
    end: [Vec<u16>; 4],
}

impl ConnectionTable {
    pub fn new(tile_size: i32) -> Self {
        Self {
            tile_size,
            interior: Default::default(),
            start: Default::default(),
            end: Default::default(),
        }
    }

    fn slot(&self, conn: Connection) -> &Vec<u16> {
        match conn {
            Connection::Interior { entry, exit } => &self.interior[entry.index()][exit.index()],
            Connection::Start { exit } => &self.start[exit.index()],
            Connection::End { entry } => &self.end[entry.index()],
        }
    }

    fn slot_mut(&mut self, conn: Connection) -> &mut Vec<u16> {
        match conn {
            Connection::Interior { entry, exit } => &mut self.interior[entry.index()][exit.index()],
            Connection::Start { exit } => &mut self.start[exit.index()],
            Connection::End { entry } => &mut self.end[entry.index()],
        }
    }

    pub fn insert(&mut self, conn: Connection, tiles: Vec<u16>) {
        *self.slot_mut(conn) = tiles;
    }

    /// Candidate tiles for `conn`, or `None` if the tileset has none.
    pub fn lookup(&self, conn: Connection) -> Option<&[u16]> {
        let tiles = self.slot(conn);
        (!tiles.is_empty()).then_some(tiles.as_slice())
    }

    /// Tiles painted when a position matches nothing: the first straight
    /// variant the tileset defines.
    pub fn default_straight(&self) -> &[u16] {
        use Direction::*;
        [(North, South), (South, North), (West, East), (East, West)]
            .into_iter()
            .find_map(|(entry, exit)| self.lookup(Connection::Interior { entry, exit }))
            .unwrap_or(&[])
    }

    /// Every tile id the table can paint.
    pub fn tile_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.interior
            .iter()
            .flatten()
            .chain(self.start.iter())
            .chain(self.end.iter())
            .flatten()
            .copied()
    }
}

impl TryFrom<ConnectionTableSource> for ConnectionTable {
    type Error = CatalogError;

    fn try_from(source: ConnectionTableSource) -> Result<Self, Self::Error> {
        if source.tile_size <= 0 {
            return Err(CatalogError::InvalidTileSize(source.tile_size));
        }
        let mut table = ConnectionTable::new(source.tile_size);
        for (key, tiles) in source.connections {
            let conn = Connection::parse(&key).ok_or(CatalogError::InvalidConnection(key))?;
            table.insert(conn, tiles);
        }
        Ok(table)
    }
}

impl From<ConnectionTable> for ConnectionTableSource {
    fn from(table: ConnectionTable) -> Self {
        let connections = Connection::all()
            .into_iter()
            .filter_map(|c| table.lookup(c).map(|t| (c.key(), t.to_vec())))
            .collect();
        Self {
            tile_size: table.tile_size,
            connections,
        }
    }
}
