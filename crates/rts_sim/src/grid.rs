//! Tile grid and occupancy model (§4.1).
//!
//! `walkable` and `buildable` are independent per-cell flags: a moving unit
//! clears `buildable` but leaves `walkable` set; a structure or mine clears
//! both.

/// A single map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub walkable: bool,
    pub buildable: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            walkable: true,
            buildable: true,
        }
    }
}

/// Dense two-dimensional tile grid, fixed size for the lifetime of a round.
#[derive(Clone, Debug)]
pub struct Map {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Map {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: (i32, i32)) -> bool {
        pos.0 >= 0 && pos.1 >= 0 && (pos.0 as u16) < self.width && (pos.1 as u16) < self.height
    }

    /// Cell id encoding fixed by spec.md §3: `x * H + y`.
    #[inline]
    pub fn cell_id(&self, x: u16, y: u16) -> usize {
        x as usize * self.height as usize + y as usize
    }

    #[inline]
    pub fn cell_id_from_signed(&self, pos: (i32, i32)) -> usize {
        self.cell_id(pos.0 as u16, pos.1 as u16)
    }

    pub fn id_to_pos(&self, id: usize) -> (u16, u16) {
        let x = (id / self.height as usize) as u16;
        let y = (id % self.height as usize) as u16;
        (x, y)
    }

    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Cell {
        self.cells[self.cell_id(x, y)]
    }

    pub fn is_walkable(&self, pos: (i32, i32)) -> bool {
        self.in_bounds(pos) && self.cells[self.cell_id_from_signed(pos)].walkable
    }

    pub fn is_buildable(&self, pos: (i32, i32)) -> bool {
        self.in_bounds(pos) && self.cells[self.cell_id_from_signed(pos)].buildable
    }

    pub fn set_walkable(&mut self, x: u16, y: u16, value: bool) {
        let id = self.cell_id(x, y);
        self.cells[id].walkable = value;
    }

    pub fn set_buildable(&mut self, x: u16, y: u16, value: bool) {
        let id = self.cell_id(x, y);
        self.cells[id].buildable = value;
    }

    /// All tiles of a `width x height` footprint rooted at `anchor`, per
    /// spec.md §4.1: offsets `(i, -j)` for `i in [0, w)`, `j in [0, h)`.
    pub fn footprint_tiles(anchor: (u16, u16), footprint: (u16, u16)) -> Vec<(i32, i32)> {
        let (ax, ay) = (anchor.0 as i32, anchor.1 as i32);
        let mut tiles = Vec::with_capacity(footprint.0 as usize * footprint.1 as usize);
        for i in 0..footprint.0 as i32 {
            for j in 0..footprint.1 as i32 {
                tiles.push((ax + i, ay - j));
            }
        }
        tiles
    }

    /// All tiles are in-bounds and buildable; tiles in `excluding` are
    /// treated as free regardless of their current flag (so a builder can
    /// site a structure on a tile it is itself standing on).
    pub fn area_buildable(&self, anchor: (u16, u16), footprint: (u16, u16), excluding: &[(i32, i32)]) -> bool {
        Self::footprint_tiles(anchor, footprint)
            .into_iter()
            .all(|tile| excluding.contains(&tile) || self.is_buildable(tile))
    }

    /// As `area_buildable`, plus a one-tile border around the footprint
    /// must also be in-bounds and buildable.
    pub fn bounded_area_buildable(
        &self,
        anchor: (u16, u16),
        footprint: (u16, u16),
        excluding: &[(i32, i32)],
    ) -> bool {
        if !self.area_buildable(anchor, footprint, excluding) {
            return false;
        }
        let (ax, ay) = (anchor.0 as i32, anchor.1 as i32);
        for i in -1..=footprint.0 as i32 {
            for j in -1..=footprint.1 as i32 {
                let tile = (ax + i, ay - j);
                let inside = i >= 0 && i < footprint.0 as i32 && j >= 0 && j < footprint.1 as i32;
                if inside {
                    continue;
                }
                if excluding.contains(&tile) {
                    continue;
                }
                if !self.is_buildable(tile) {
                    return false;
                }
            }
        }
        true
    }

    /// Set `buildable` (and optionally `walkable`, for immobile occupants)
    /// across a footprint. Out-of-bounds tiles are silently skipped (the
    /// caller is expected to have validated bounds already).
    pub fn set_area_flags(&mut self, anchor: (u16, u16), footprint: (u16, u16), buildable: bool, walkable: Option<bool>) {
        for (x, y) in Self::footprint_tiles(anchor, footprint) {
            if !self.in_bounds((x, y)) {
                continue;
            }
            let (x, y) = (x as u16, y as u16);
            self.set_buildable(x, y, buildable);
            if let Some(w) = walkable {
                self.set_walkable(x, y, w);
            }
        }
    }

    /// 8-connected in-bounds neighbors of `(x, y)`, N/NE/E/SE/S/SW/W/NW order.
    pub fn neighbors8(&self, pos: (u16, u16)) -> impl Iterator<Item = (u16, u16)> + '_ {
        const OFFSETS: [(i32, i32); 8] = [
            (0, -1),
            (1, -1),
            (1, 0),
            (1, 1),
            (0, 1),
            (-1, 1),
            (-1, 0),
            (-1, -1),
        ];
        let (x, y) = (pos.0 as i32, pos.1 as i32);
        OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let n = (x + dx, y + dy);
            if self.in_bounds(n) {
                Some((n.0 as u16, n.1 as u16))
            } else {
                None
            }
        })
    }

    /// Any walkable neighbor of a footprint rooted at `anchor`, scanning the
    /// footprint's border tiles in a fixed iteration order.
    pub fn walkable_neighbor_of_footprint(&self, anchor: (u16, u16), footprint: (u16, u16)) -> Option<(u16, u16)> {
        let (ax, ay) = (anchor.0 as i32, anchor.1 as i32);
        for i in -1..=footprint.0 as i32 {
            for j in -1..=footprint.1 as i32 {
                let inside = i >= 0 && i < footprint.0 as i32 && j >= 0 && j < footprint.1 as i32;
                if inside {
                    continue;
                }
                let tile = (ax + i, ay - j);
                if self.is_walkable(tile) {
                    return Some((tile.0 as u16, tile.1 as u16));
                }
            }
        }
        None
    }
}
