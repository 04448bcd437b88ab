use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{ClientError, ClientResult};

pub fn write_atomic(path: &Path, content: &str) -> ClientResult<()> {
    write_via_tmp(path, content).map_err(|source| ClientError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_via_tmp(path: &Path, content: &str) -> io::Result<()> {
    let tmp_path = unique_tmp_path(path);
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    Ok(())
}

fn unique_tmp_path(path: &Path) -> PathBuf {
    let mut counter = 0u32;
    loop {
        let candidate = if counter == 0 {
            path.with_extension("tmp")
        } else {
            path.with_extension(format!("tmp{counter}"))
        };

        if !candidate.exists() {
            return candidate;
        }

        counter += 1;
    }
}
