//! The `raw://` handler: an in-memory file whose content is base64-encoded directly in the path,
//! grounded on `original_source/udPlatform/Include/udFile.h`'s documented
//! `raw://[compression=NAME,size=N@]BASE64DATA` scheme (spec §6). `NAME` is one of
//! `RawDeflate`, `ZlibDeflate`, `GzipDeflate`; decompression is inflated on open.

use std::io::Read as _;

use base64::Engine;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};

use udcore_result::{ud_bail, UdResult, UdResultCode};

use crate::handle::FileOpenFlags;
use crate::registry::{FileBackend, FileHandler};

const PREFIX: &str = "raw://";

pub(crate) struct RawHandler;

impl FileHandler for RawHandler {
    fn prefix(&self) -> &'static str {
        PREFIX
    }

    fn open(&self, path: &str, _flags: FileOpenFlags) -> UdResult<Box<dyn FileBackend>> {
        let decoded = decode(path)?;
        Ok(Box::new(RawBackend { data: decoded.data }))
    }
}

struct Decoded {
    data: Vec<u8>,
    #[allow(dead_code)] // carried for parity with the source's filename hint, unused downstream
    original_filename: Option<String>,
}

struct Metadata<'a> {
    compression: Option<&'a str>,
    size: Option<usize>,
    filename: Option<&'a str>,
    base64: &'a str,
}

fn parse_metadata(body: &str) -> Metadata<'_> {
    let Some((header, base64)) = body.split_once('@') else {
        return Metadata { compression: None, size: None, filename: None, base64: body };
    };
    if !header.starts_with("compression=") {
        return Metadata { compression: None, size: None, filename: None, base64: body };
    }

    let mut compression = None;
    let mut size = None;
    let mut filename = None;
    for field in header.split(',') {
        if let Some(value) = field.strip_prefix("compression=") {
            compression = Some(value);
        } else if let Some(value) = field.strip_prefix("size=") {
            size = value.parse().ok();
        } else if let Some(value) = field.strip_prefix("filename=") {
            filename = Some(value);
        }
    }
    Metadata { compression, size, filename, base64 }
}

fn inflate(compressed: &[u8], expected_size: Option<usize>, kind: &str) -> UdResult<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_size.unwrap_or(compressed.len() * 4));
    let result = match kind {
        "RawDeflate" => DeflateDecoder::new(compressed).read_to_end(&mut out),
        "ZlibDeflate" => ZlibDecoder::new(compressed).read_to_end(&mut out),
        "GzipDeflate" => GzDecoder::new(compressed).read_to_end(&mut out),
        _ => unreachable!("checked by caller"),
    };
    result.map_err(|_| udcore_result::UdError::from(UdResultCode::CompressionError))?;
    Ok(out)
}

fn decode(path: &str) -> UdResult<Decoded> {
    let body = path.strip_prefix(PREFIX).unwrap_or(path);
    let meta = parse_metadata(body);

    let raw = base64::engine::general_purpose::STANDARD
        .decode(meta.base64)
        .map_err(|_| udcore_result::UdError::from(UdResultCode::ParseError))?;

    let data = match meta.compression {
        None => raw,
        Some(kind @ ("RawDeflate" | "ZlibDeflate" | "GzipDeflate")) => {
            inflate(&raw, meta.size, kind)?
        }
        Some(_) => ud_bail!(UdResultCode::FormatVariationNotSupported),
    };

    Ok(Decoded {
        data,
        original_filename: meta.filename.map(str::to_string),
    })
}

/// Encode `data` into a `raw://` path, optionally deflate-compressing it first. Mirrors
/// `udFile_GenerateRawFilename`; the `charsPerLine` line-breaking behaviour from the source is
/// dropped since the encoded string here is consumed programmatically, never printed for a human.
#[must_use]
pub fn generate_raw_filename(data: &[u8], compress: bool) -> String {
    if compress {
        use std::io::Write as _;
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).expect("writing to an in-memory Vec cannot fail");
        let compressed = encoder.finish().expect("finishing an in-memory Vec encoder cannot fail");
        let encoded = base64::engine::general_purpose::STANDARD.encode(compressed);
        format!("{PREFIX}compression=ZlibDeflate,size={}@{encoded}", data.len())
    } else {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        format!("{PREFIX}{encoded}")
    }
}

/// Whether `path` looks like a `raw://` path, per `udFile_IsRaw`.
#[must_use]
pub fn is_raw(path: &str) -> bool {
    path.starts_with(PREFIX)
}

struct RawBackend {
    data: Vec<u8>,
}

impl FileBackend for RawBackend {
    fn read(&mut self, buffer: &mut [u8], absolute_offset: i64) -> UdResult<usize> {
        if absolute_offset < 0 {
            ud_bail!(UdResultCode::InvalidParameter);
        }
        let offset = absolute_offset as usize;
        if offset >= self.data.len() {
            return Ok(0);
        }
        let available = &self.data[offset..];
        let n = available.len().min(buffer.len());
        buffer[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }

    fn length(&self) -> i64 {
        self.data.len() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_uncompressed() {
        let path = generate_raw_filename(b"hello raw world", false);
        assert!(is_raw(&path));
        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.data, b"hello raw world");
    }

    #[test]
    fn round_trips_zlib_compressed() {
        let payload = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaabbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
        let path = generate_raw_filename(payload, true);
        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.data, payload);
    }

    #[test]
    fn decodes_gzip_and_raw_deflate_too() {
        use std::io::Write as _;
        let payload = b"some payload bytes to compress for the self-test vector";

        let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        gz.write_all(payload).unwrap();
        let gz_bytes = gz.finish().unwrap();
        let gz_path = format!(
            "raw://compression=GzipDeflate,size={}@{}",
            payload.len(),
            base64::engine::general_purpose::STANDARD.encode(&gz_bytes)
        );
        assert_eq!(decode(&gz_path).unwrap().data, payload);

        let mut deflate =
            flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::fast());
        deflate.write_all(payload).unwrap();
        let deflate_bytes = deflate.finish().unwrap();
        let deflate_path = format!(
            "raw://compression=RawDeflate,size={}@{}",
            payload.len(),
            base64::engine::general_purpose::STANDARD.encode(&deflate_bytes)
        );
        assert_eq!(decode(&deflate_path).unwrap().data, payload);
    }

    #[test]
    fn preserves_original_filename_hint() {
        let payload = b"named payload";
        let encoded = base64::engine::general_purpose::STANDARD.encode(payload);
        let path = format!("raw://compression=RawDeflate,size=0,filename=scan.las@{encoded}");
        // Not actually deflate-compressed above, so this should fail to inflate rather than
        // silently accept garbage -- confirms the filename field doesn't bypass decompression.
        assert!(decode(&path).is_err());
    }

    #[test]
    fn rejects_unsupported_compression() {
        let err = decode("raw://compression=Lz4,size=4@AAAA").unwrap_err();
        assert_eq!(err.code, UdResultCode::FormatVariationNotSupported);
    }
}
