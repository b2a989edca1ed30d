//! The on-disk layout of a streaming image, grounded on
//! `original_source/Include/udImage.h`'s `udImageStreamingOnDisk` and spec §9 (external
//! interfaces): `{fourcc 'UDT0', u32 width, u32 height, u16 mipCount, char[64] name, u16
//! offsetToMip0}` followed by per-mip grids of 64x64 ARGB tiles in insertion order.

use byteorder::{ByteOrder, LittleEndian};

use udcore_result::{ud_error_if, UdResult, UdResultCode};

/// `'U', 'D', 'T', '0'` packed little-endian, also doubling as a format version number.
pub const FOURCC: u32 = u32::from_le_bytes(*b"UDT0");
pub const TILE_SIZE: u32 = 64;
pub const TILE_BYTES: usize = (TILE_SIZE * TILE_SIZE * 4) as usize;
pub const MAX_MIP_LEVELS: usize = 24;
pub const NAME_LEN: usize = 64;
/// `fourcc(4) + width(4) + height(4) + mipCount(2) + name(64) + offsetToMip0(2)`.
pub const HEADER_LEN: usize = 4 + 4 + 4 + 2 + NAME_LEN + 2;

/// The fixed-size header preceding a streaming image's tile data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnDiskHeader {
    pub width: u32,
    pub height: u32,
    pub mip_count: u16,
    pub name: String,
    pub offset_to_mip0: u16,
}

impl OnDiskHeader {
    pub fn encode(&self) -> UdResult<[u8; HEADER_LEN]> {
        ud_error_if!(self.name.len() > NAME_LEN, UdResultCode::InvalidParameter);
        ud_error_if!(
            self.mip_count as usize > MAX_MIP_LEVELS,
            UdResultCode::InvalidParameter
        );

        let mut buf = [0u8; HEADER_LEN];
        LittleEndian::write_u32(&mut buf[0..4], FOURCC);
        LittleEndian::write_u32(&mut buf[4..8], self.width);
        LittleEndian::write_u32(&mut buf[8..12], self.height);
        LittleEndian::write_u16(&mut buf[12..14], self.mip_count);
        let name_bytes = self.name.as_bytes();
        buf[14..14 + name_bytes.len()].copy_from_slice(name_bytes);
        LittleEndian::write_u16(&mut buf[14 + NAME_LEN..HEADER_LEN], self.offset_to_mip0);
        Ok(buf)
    }

    pub fn decode(buf: &[u8; HEADER_LEN]) -> UdResult<Self> {
        let fourcc = LittleEndian::read_u32(&buf[0..4]);
        ud_error_if!(fourcc != FOURCC, UdResultCode::CorruptData);

        let width = LittleEndian::read_u32(&buf[4..8]);
        let height = LittleEndian::read_u32(&buf[8..12]);
        let mip_count = LittleEndian::read_u16(&buf[12..14]);
        ud_error_if!(
            mip_count as usize > MAX_MIP_LEVELS,
            UdResultCode::CorruptData
        );
        let name_bytes = &buf[14..14 + NAME_LEN];
        let name_end = name_bytes.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        let name = String::from_utf8_lossy(&name_bytes[..name_end]).into_owned();
        let offset_to_mip0 = LittleEndian::read_u16(&buf[14 + NAME_LEN..HEADER_LEN]);

        Ok(Self {
            width,
            height,
            mip_count,
            name,
            offset_to_mip0,
        })
    }
}

/// Dimensions and tile-grid shape for one mip level, derivable purely from `(width, height)`.
#[derive(Debug, Clone, Copy)]
pub struct MipGeometry {
    pub width: u32,
    pub height: u32,
    pub grid_w: u32,
    pub grid_h: u32,
}

impl MipGeometry {
    #[must_use]
    pub fn for_level(base_width: u32, base_height: u32, level: u32) -> Self {
        let width = (base_width >> level).max(1);
        let height = (base_height >> level).max(1);
        Self {
            width,
            height,
            grid_w: width.div_ceil(TILE_SIZE),
            grid_h: height.div_ceil(TILE_SIZE),
        }
    }

    #[must_use]
    pub fn tile_count(&self) -> u32 {
        self.grid_w * self.grid_h
    }

    #[must_use]
    pub fn byte_len(&self) -> u64 {
        self.tile_count() as u64 * TILE_BYTES as u64
    }
}

/// The number of mip levels a full chain from `(width, height)` down to 1x1 occupies, capped at
/// [`MAX_MIP_LEVELS`].
#[must_use]
pub fn full_mip_chain_length(width: u32, height: u32) -> u16 {
    let mut levels = 1u32;
    let mut w = width;
    let mut h = height;
    while (w > 1 || h > 1) && (levels as usize) < MAX_MIP_LEVELS {
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        levels += 1;
    }
    levels as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = OnDiskHeader {
            width: 512,
            height: 256,
            mip_count: 10,
            name: "terrain-albedo".to_string(),
            offset_to_mip0: HEADER_LEN as u16,
        };
        let encoded = header.encode().unwrap();
        let decoded = OnDiskHeader::decode(&encoded).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn decode_rejects_bad_fourcc() {
        let mut buf = [0u8; HEADER_LEN];
        LittleEndian::write_u32(&mut buf[0..4], 0xDEAD_BEEF);
        let err = OnDiskHeader::decode(&buf).unwrap_err();
        assert_eq!(err.code, UdResultCode::CorruptData);
    }

    #[test]
    fn mip_geometry_grid_covers_partial_edge_tiles() {
        let geom = MipGeometry::for_level(130, 65, 0);
        assert_eq!((geom.grid_w, geom.grid_h), (3, 2));
    }

    #[test]
    fn full_chain_length_reaches_1x1() {
        assert_eq!(full_mip_chain_length(256, 256), 9);
        assert_eq!(full_mip_chain_length(1, 1), 1);
    }

    #[test]
    fn full_chain_length_is_capped() {
        assert_eq!(full_mip_chain_length(1 << 30, 1 << 30), MAX_MIP_LEVELS as u16);
    }
}
