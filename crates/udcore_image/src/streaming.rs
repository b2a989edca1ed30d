//! Tiled, mip-mapped streaming image (component C10), grounded on
//! `original_source/Include/udImage.h`'s `udImageStreaming` family. Tiles are demand-loaded from
//! an open [`udcore_file::UdFile`] on sample and LRU-evicted by [`ImageStreaming::free_tiles`],
//! the same "touch on access, evict coldest past a budget" shape as
//! `udcore_chunked::VirtualChunkedArray`'s chunk spill, scaled to a byte budget instead of a
//! chunk count per spec §4.9.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

use udcore_config::ImageStreamConfig;
use udcore_file::{SeekWhence, UdFile};
use udcore_result::{ud_error_if, ud_error_null, UdResult, UdResultCode};

use crate::format::{self, MipGeometry, OnDiskHeader, HEADER_LEN, TILE_BYTES, TILE_SIZE};
use crate::image::Image;
use crate::sample::{self, SampleFlags};

type Tile = Box<[u32]>;

struct MipState {
    geometry: MipGeometry,
    /// Absolute file offset of this mip's first tile.
    base_offset: i64,
    cells: Vec<Option<Tile>>,
    last_access: Vec<u64>,
}

/// A streaming tiled, mip-mapped image backed by an open file.
pub struct ImageStreaming {
    header: OnDiskHeader,
    file: Mutex<UdFile>,
    mips: Mutex<Vec<MipState>>,
    current_reference: AtomicU64,
    resident_tiles: AtomicUsize,
    config: ImageStreamConfig,
}

/// Generate a full mip chain from `image` and write it (header + tile data) to `file` at
/// `offset`. Returns the on-disk header and the total number of bytes written.
pub fn save(
    image: &Image,
    file: &mut UdFile,
    offset: i64,
    name: Option<&str>,
) -> UdResult<(OnDiskHeader, u64)> {
    let mip_count = format::full_mip_chain_length(image.width(), image.height());
    let header = OnDiskHeader {
        width: image.width(),
        height: image.height(),
        mip_count,
        name: name.unwrap_or_default().chars().take(format::NAME_LEN).collect(),
        offset_to_mip0: HEADER_LEN as u16,
    };

    let encoded = header.encode()?;
    udcore_file::write(file, &encoded, offset, SeekWhence::Set)?;

    let mut write_pos = offset + header.offset_to_mip0 as i64;
    let mut current = image.clone();
    for level in 0..mip_count {
        let geometry = MipGeometry::for_level(image.width(), image.height(), level as u32);
        debug_assert_eq!((geometry.width, geometry.height), (current.width(), current.height()));
        for ty in 0..geometry.grid_h {
            for tx in 0..geometry.grid_w {
                let tile_bytes = encode_tile(&current, tx, ty);
                udcore_file::write(file, &tile_bytes, write_pos, SeekWhence::Set)?;
                write_pos += TILE_BYTES as i64;
            }
        }
        if level + 1 < mip_count {
            current = current.downsample_half();
        }
    }

    udcore_log::debug!(
        "saved streaming image '{}' ({}x{}, {} mips, {} bytes)",
        header.name,
        header.width,
        header.height,
        header.mip_count,
        write_pos - offset
    );
    Ok((header, (write_pos - offset) as u64))
}

fn encode_tile(image: &Image, tx: u32, ty: u32) -> [u8; TILE_BYTES] {
    let mut out = [0u8; TILE_BYTES];
    for row in 0..TILE_SIZE {
        let y = ty * TILE_SIZE + row;
        if y >= image.height() {
            break;
        }
        for col in 0..TILE_SIZE {
            let x = tx * TILE_SIZE + col;
            if x >= image.width() {
                continue;
            }
            let texel = image.pixels()[(y * image.width() + x) as usize];
            let base = ((row * TILE_SIZE + col) * 4) as usize;
            out[base..base + 4].copy_from_slice(&texel.to_le_bytes());
        }
    }
    out
}

fn decode_tile(bytes: &[u8]) -> Tile {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

impl ImageStreaming {
    /// Load a streamable image's header and mip geometry from `offset` in an already-open file.
    /// Tile data itself is loaded lazily on first [`Self::sample`] / [`Self::load_cell`].
    pub fn load(mut file: UdFile, offset: i64, config: ImageStreamConfig) -> UdResult<Self> {
        let mut buf = [0u8; HEADER_LEN];
        udcore_file::read(&mut file, &mut buf, offset, SeekWhence::Set)?;
        let header = OnDiskHeader::decode(&buf)?;

        let mut mips = Vec::with_capacity(header.mip_count as usize);
        let mut running_offset = offset + header.offset_to_mip0 as i64;
        for level in 0..header.mip_count as u32 {
            let geometry = MipGeometry::for_level(header.width, header.height, level);
            let tile_count = geometry.tile_count() as usize;
            mips.push(MipState {
                geometry,
                base_offset: running_offset,
                cells: (0..tile_count).map(|_| None).collect(),
                last_access: vec![0; tile_count],
            });
            running_offset += geometry.byte_len() as i64;
        }

        Ok(Self {
            header,
            file: Mutex::new(file),
            mips: Mutex::new(mips),
            current_reference: AtomicU64::new(0),
            resident_tiles: AtomicUsize::new(0),
            config,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.header.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.header.height
    }

    #[must_use]
    pub fn mip_count(&self) -> u16 {
        self.header.mip_count
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Release the underlying file handle, consuming this streamer.
    pub fn into_file(self) -> UdFile {
        self.file.into_inner()
    }

    fn touch(&self, mips: &mut [MipState], mip_level: usize, tile_index: usize) {
        let next = self.current_reference.fetch_add(1, Ordering::Relaxed) + 1;
        mips[mip_level].last_access[tile_index] = next;
    }

    fn ensure_tile_loaded(&self, mips: &mut [MipState], mip_level: usize, tile_index: usize) -> UdResult<()> {
        if mips[mip_level].cells[tile_index].is_some() {
            self.touch(mips, mip_level, tile_index);
            return Ok(());
        }
        let offset = mips[mip_level].base_offset + (tile_index * TILE_BYTES) as i64;
        let mut buf = vec![0u8; TILE_BYTES];
        {
            let mut file = self.file.lock();
            udcore_file::read(&mut file, &mut buf, offset, SeekWhence::Set)?;
        }
        mips[mip_level].cells[tile_index] = Some(decode_tile(&buf));
        self.resident_tiles.fetch_add(1, Ordering::Relaxed);
        self.touch(mips, mip_level, tile_index);
        Ok(())
    }

    /// Encode `(mip_level, flat_tile_index)` into the 32-bit index data returned by
    /// [`Self::sample`] under `SampleFlags::NO_STREAM`: low 24 bits are the flat tile index
    /// within the mip, the high 8 bits are the mip level (`mipCount <= 24` comfortably fits).
    fn pack_cell_index(mip_level: usize, tile_index: usize) -> u32 {
        ((mip_level as u32) << 24) | (tile_index as u32 & 0x00FF_FFFF)
    }

    fn unpack_cell_index(cell_index_data: u32) -> (usize, usize) {
        ((cell_index_data >> 24) as usize, (cell_index_data & 0x00FF_FFFF) as usize)
    }

    /// Sample a pixel with OpenGL-style (or top-left, per flags) UV coordinates against
    /// `mip_level`. With `SampleFlags::NO_STREAM`, a tile that isn't resident is not loaded:
    /// the return value instead carries that tile's packed index (see
    /// [`Self::pack_cell_index`]) with zero alpha, for the caller to resolve via
    /// [`Self::load_cell`].
    pub fn sample(&self, u: f32, v: f32, flags: SampleFlags, mip_level: u16) -> UdResult<u32> {
        let mip_level = mip_level as usize;
        let mut mips = self.mips.lock();
        ud_error_if!(mip_level >= mips.len(), UdResultCode::OutOfRange);

        let geometry = mips[mip_level].geometry;
        let (px, py) = ud_error_null!(
            sample::uv_to_pixel(u, v, geometry.width, geometry.height, flags),
            UdResultCode::OutOfRange
        );

        if flags.contains(SampleFlags::NO_STREAM) {
            let tile_index = tile_index_for(geometry, px, py);
            if mips[mip_level].cells[tile_index].is_none() {
                return Ok(Self::pack_cell_index(mip_level, tile_index));
            }
        }

        let texel = sample::sample_buffer(px, py, geometry.width, geometry.height, flags, |x, y| {
            let tx = x / TILE_SIZE;
            let ty = y / TILE_SIZE;
            let tile_index = (ty * geometry.grid_w + tx) as usize;
            if self.ensure_tile_loaded(&mut mips[..], mip_level, tile_index).is_err() {
                return 0;
            }
            let local_x = x % TILE_SIZE;
            let local_y = y % TILE_SIZE;
            mips[mip_level].cells[tile_index].as_ref().expect("just loaded")
                [(local_y * TILE_SIZE + local_x) as usize]
        });
        Ok(texel)
    }

    /// Load the tile referenced by index data previously returned from [`Self::sample`] under
    /// `SampleFlags::NO_STREAM`.
    pub fn load_cell(&self, cell_index_data: u32) -> UdResult<()> {
        let (mip_level, tile_index) = Self::unpack_cell_index(cell_index_data);
        let mut mips = self.mips.lock();
        ud_error_if!(mip_level >= mips.len(), UdResultCode::OutOfRange);
        ud_error_if!(
            tile_index >= mips[mip_level].cells.len(),
            UdResultCode::OutOfRange
        );
        self.ensure_tile_loaded(&mut mips[..], mip_level, tile_index)
    }

    /// Evict least-recently-touched resident tiles until resident tile memory is at or below
    /// `memory_usage_goal` bytes (or [`ImageStreamConfig::tile_cache_budget_bytes`] if
    /// `memory_usage_goal` is `0`).
    pub fn free_tiles(&self, memory_usage_goal: usize) {
        let goal = if memory_usage_goal == 0 {
            self.config.tile_cache_budget_bytes
        } else {
            memory_usage_goal
        };
        let mut mips = self.mips.lock();
        loop {
            let resident = self.resident_tiles.load(Ordering::Relaxed);
            if resident * TILE_BYTES <= goal {
                break;
            }
            let mut coldest: Option<(usize, usize, u64)> = None;
            for (mip_idx, mip) in mips.iter().enumerate() {
                for (tile_idx, cell) in mip.cells.iter().enumerate() {
                    if cell.is_some() {
                        let age = mip.last_access[tile_idx];
                        if coldest.map(|(_, _, best)| age < best).unwrap_or(true) {
                            coldest = Some((mip_idx, tile_idx, age));
                        }
                    }
                }
            }
            let Some((mip_idx, tile_idx, _)) = coldest else {
                break;
            };
            mips[mip_idx].cells[tile_idx] = None;
            self.resident_tiles.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Number of tiles currently resident in memory across all mip levels.
    #[must_use]
    pub fn resident_tile_count(&self) -> usize {
        self.resident_tiles.load(Ordering::Relaxed)
    }
}

fn tile_index_for(geometry: MipGeometry, px: f32, py: f32) -> usize {
    let x = (px.round().max(0.0) as u32).min(geometry.width.saturating_sub(1));
    let y = (py.round().max(0.0) as u32).min(geometry.height.saturating_sub(1));
    ((y / TILE_SIZE) * geometry.grid_w + (x / TILE_SIZE)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use udcore_file::{open, FileOpenFlags};

    fn solid_image(width: u32, height: u32, argb: u32) -> Image {
        Image::from_argb(width, height, 4, vec![argb; (width * height) as usize]).unwrap()
    }

    /// Writes the saved streaming image to a real temp file (the `raw://` handler is read-only,
    /// so round-tripping through it would fail the `save` write calls) and reopens it read-only.
    fn round_trip(image: &Image) -> ImageStreaming {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("streaming.udt0");
        let path_str = path.to_str().unwrap().to_string();

        let mut writer = open(
            &path_str,
            FileOpenFlags::WRITE | FileOpenFlags::CREATE,
        )
        .unwrap();
        save(image, &mut writer, 0, Some("t")).unwrap();
        udcore_file::close(writer).unwrap();

        let file = open(&path_str, FileOpenFlags::READ).unwrap();
        let streaming = ImageStreaming::load(file, 0, ImageStreamConfig::default()).unwrap();
        // Keep `dir` alive for the streamer's lifetime by leaking it; this is test-only scratch
        // space cleaned up when the process exits.
        std::mem::forget(dir);
        streaming
    }

    #[test]
    fn save_then_load_preserves_dimensions_and_mip_count() {
        let image = solid_image(130, 65, 0xFF112233);
        let streaming = round_trip(&image);
        assert_eq!((streaming.width(), streaming.height()), (130, 65));
        assert_eq!(streaming.name(), "t");
        assert!(streaming.mip_count() > 1);
    }

    #[test]
    fn sample_mip0_matches_solid_color() {
        let image = solid_image(128, 128, 0xFFAABBCC);
        let streaming = round_trip(&image);
        let texel = streaming.sample(0.5, 0.5, SampleFlags::TOP_LEFT, 0).unwrap();
        assert_eq!(texel, 0xFFAABBCC);
    }

    #[test]
    fn no_stream_returns_index_for_unloaded_tile() {
        let image = solid_image(256, 256, 0xFFFFFFFF);
        let streaming = round_trip(&image);
        let data = streaming
            .sample(0.9, 0.9, SampleFlags::NO_STREAM | SampleFlags::TOP_LEFT, 0)
            .unwrap();
        assert_eq!(data & 0xFF00_0000, 0); // zero alpha
        streaming.load_cell(data).unwrap();
        let texel = streaming
            .sample(0.9, 0.9, SampleFlags::NO_STREAM | SampleFlags::TOP_LEFT, 0)
            .unwrap();
        assert_eq!(texel, 0xFFFFFFFF);
    }

    #[test]
    fn free_tiles_evicts_coldest_first() {
        let image = solid_image(512, 512, 0xFF010203);
        let streaming = round_trip(&image);
        for i in 0..8 {
            let u = i as f32 / 8.0;
            streaming.sample(u, u, SampleFlags::TOP_LEFT, 0).unwrap();
        }
        let before = streaming.resident_tile_count();
        assert!(before > 0);
        streaming.free_tiles(1);
        assert!(streaming.resident_tile_count() < before);
    }
}
