//! Durable tile storage, grounded on
//! `original_source/DDT/serializer/{No,File}_serializer.h`. `FileSerializer`
//! writes through a temp file and renames into place so a crash never
//! leaves a half-written tile on disk (spec.md §5: "atomic file writes via
//! write-then-rename are required").

use std::fs;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Serialize};

use crate::geometry::Bbox;
use crate::tile::Tile;
use crate::tile_id::TileId;

/// Durable storage for tiles (spec.md §4.5). Every operation is
/// idempotent and stateless across calls; concurrent `save_tile` calls
/// for distinct ids must be safe (§5 rule R3).
pub trait Serializer<Info, const D: usize> {
    fn has_tile(&self, id: TileId) -> bool;

    /// Cheap metadata-only load: just the bbox, without touching the
    /// triangulation.
    fn load_bbox(&self, id: TileId) -> std::io::Result<Option<Bbox<D>>>;

    /// Full load: replaces `tile`'s contents in place. Returns `false`
    /// (not an error) if no durable copy exists.
    fn load_tile(&self, tile: &mut Tile<Info, D>) -> std::io::Result<bool>;

    /// Persists `tile`. Returns `false` (not an error) if this serializer
    /// does not persist anything.
    fn save_tile(&self, tile: &Tile<Info, D>) -> std::io::Result<bool>;
}

/// Memory-only: never has anything durable, never evicts. Pair with an
/// unbounded (`None`) in-memory budget; see `DESIGN.md` for why pairing it
/// with a bounded budget is a caller error this type cannot itself detect.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSerializer;

impl<Info, const D: usize> Serializer<Info, D> for NoSerializer {
    fn has_tile(&self, _id: TileId) -> bool {
        false
    }

    fn load_bbox(&self, _id: TileId) -> std::io::Result<Option<Bbox<D>>> {
        Ok(None)
    }

    fn load_tile(&self, _tile: &mut Tile<Info, D>) -> std::io::Result<bool> {
        Ok(false)
    }

    fn save_tile(&self, _tile: &Tile<Info, D>) -> std::io::Result<bool> {
        Ok(true)
    }
}

/// One text file per tile under `prefix`, named `<id>.txt` (spec.md §6.3).
/// The file layout is `bbox`, newline, then the kernel's native
/// triangulation stream.
#[derive(Clone, Debug)]
pub struct FileSerializer {
    prefix: PathBuf,
}

impl FileSerializer {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        FileSerializer { prefix: prefix.into() }
    }

    fn path(&self, id: TileId) -> PathBuf {
        self.prefix.join(format!("{id}.txt"))
    }
}

#[cfg(feature = "serde")]
impl<Info, const D: usize> Serializer<Info, D> for FileSerializer
where
    Info: Clone + Default + Serialize + DeserializeOwned,
{
    fn has_tile(&self, id: TileId) -> bool {
        self.path(id).is_file()
    }

    fn load_bbox(&self, id: TileId) -> std::io::Result<Option<Bbox<D>>> {
        if !self.has_tile(id) {
            return Ok(None);
        }
        let content = fs::read_to_string(self.path(id))?;
        let bbox_line = content.lines().next().unwrap_or("");
        Bbox::from_text(bbox_line)
            .map(Some)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    fn load_tile(&self, tile: &mut Tile<Info, D>) -> std::io::Result<bool> {
        if !self.has_tile(tile.id()) {
            return Ok(false);
        }
        let content = fs::read_to_string(self.path(tile.id()))?;
        *tile = Tile::from_text(tile.id(), &content).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(true)
    }

    fn save_tile(&self, tile: &Tile<Info, D>) -> std::io::Result<bool> {
        fs::create_dir_all(&self.prefix)?;
        let text = tile
            .to_text()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let final_path = self.path(tile.id());
        let tmp_path = self.prefix.join(format!("{}.txt.tmp", tile.id()));
        fs::write(&tmp_path, text)?;
        fs::rename(&tmp_path, &final_path)?;
        Ok(true)
    }
}
