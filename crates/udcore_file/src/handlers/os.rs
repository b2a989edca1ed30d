//! The default `""`-prefix handler: a thin wrapper over `std::fs::File`, grounded on
//! `original_source/udPlatform/Source/udFile.cpp`'s CRT-`FILE` handler.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};

use udcore_result::{UdError, UdResult, UdResultCode};

use crate::handle::FileOpenFlags;
use crate::registry::{FileBackend, FileHandler};

pub(crate) struct OsHandler;

impl FileHandler for OsHandler {
    fn prefix(&self) -> &'static str {
        ""
    }

    fn open(&self, path: &str, flags: FileOpenFlags) -> UdResult<Box<dyn FileBackend>> {
        let mut options = OpenOptions::new();
        options.read(flags.contains(FileOpenFlags::READ) || !flags.contains(FileOpenFlags::WRITE));
        if flags.contains(FileOpenFlags::WRITE) {
            options.write(true);
        }
        if flags.contains(FileOpenFlags::CREATE) {
            options.create(true);
        }

        let file = options
            .open(path)
            .map_err(|e| UdError::new(UdResultCode::OpenFailure, file!(), line!()).with_source(e))?;
        let length = file
            .metadata()
            .map_err(|e| UdError::new(UdResultCode::OpenFailure, file!(), line!()).with_source(e))?
            .len() as i64;

        Ok(Box::new(OsBackend { file, length }))
    }
}

struct OsBackend {
    file: File,
    length: i64,
}

impl FileBackend for OsBackend {
    fn read(&mut self, buffer: &mut [u8], absolute_offset: i64) -> UdResult<usize> {
        self.file
            .seek(SeekFrom::Start(absolute_offset.max(0) as u64))
            .map_err(|e| UdError::new(UdResultCode::ReadFailure, file!(), line!()).with_source(e))?;
        // Fill as much of `buffer` as the file has remaining, short of an actual read error.
        let mut total = 0;
        loop {
            match self.file.read(&mut buffer[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) => {
                    return Err(UdError::new(UdResultCode::ReadFailure, file!(), line!()).with_source(e))
                }
            }
            if total == buffer.len() {
                break;
            }
        }
        Ok(total)
    }

    fn write(&mut self, buffer: &[u8], absolute_offset: i64) -> UdResult<usize> {
        self.file
            .seek(SeekFrom::Start(absolute_offset.max(0) as u64))
            .map_err(|e| UdError::new(UdResultCode::WriteFailure, file!(), line!()).with_source(e))?;
        self.file
            .write(buffer)
            .map_err(|e| UdError::new(UdResultCode::WriteFailure, file!(), line!()).with_source(e))
            .map(|n| {
                self.length = self.length.max(absolute_offset + n as i64);
                n
            })
    }

    fn length(&self) -> i64 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{close, open, read};

    #[test]
    fn round_trips_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.bin");
        std::fs::write(&path, b"hello udcore_file").unwrap();

        let mut file = open(
            path.to_str().unwrap(),
            FileOpenFlags::READ,
        )
        .unwrap();
        let mut buffer = [0u8; 5];
        let n = read(&mut file, &mut buffer, 0, crate::handle::SeekWhence::Set).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buffer, b"hello");
        close(file).unwrap();
    }
}
