use std::{fs, path::Path};

use crate::error::Chip8Error;

/// Read a program image in its entirety. The image has no header and is
/// copied verbatim to 0x200 by [`Chip8Builder::with_rom`](crate::Chip8Builder::with_rom).
pub fn read_program(path: impl AsRef<Path>) -> Result<Vec<u8>, Chip8Error> {
    let path = path.as_ref();
    let rom = fs::read(path).map_err(|source| Chip8Error::ReadProgram {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Loaded {} byte program image from {}", rom.len(), path.display());
    Ok(rom)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_program() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x00, 0xE0, 0x12, 0x00]).unwrap();

        let rom = read_program(file.path()).unwrap();

        assert_eq!(rom, vec![0x00, 0xE0, 0x12, 0x00]);
    }

    #[test]
    fn test_read_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ch8");

        let err = read_program(&path).unwrap_err();

        match err {
            Chip8Error::ReadProgram { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
        }
    }
}
