use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use trendscope_core::{ArtifactError, Stage};

const INDENT: &[u8] = b"    ";

/// Reads `path` as an untyped JSON value.
pub(crate) fn read_value(path: &Path, stage: Stage) -> Result<Value, ArtifactError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ArtifactError::Missing {
            path: path.to_path_buf(),
            stage,
        },
        _ => ArtifactError::Io {
            path: path.to_path_buf(),
            stage,
            source,
        },
    })?;

    serde_json::from_str(&contents).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        stage,
        source,
    })
}

/// Four-space indented JSON, non-ASCII written as-is.
fn to_pretty_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

pub(crate) fn write_pretty<T: Serialize + ?Sized>(
    path: &Path,
    stage: Stage,
    value: &T,
) -> Result<(), ArtifactError> {
    let bytes = to_pretty_bytes(value).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        stage,
        source,
    })?;
    write_bytes(path, stage, &bytes)
}

/// Writes to a sibling `.tmp` file, then renames it into place. The `.tmp`
/// file is removed again when any step fails.
pub(crate) fn write_bytes(path: &Path, stage: Stage, bytes: &[u8]) -> Result<(), ArtifactError> {
    let io_error = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        stage,
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let written = write_temp(temp_path, bytes).and_then(|()| fs::rename(temp_path, path));
    if let Err(source) = written {
        let _ = fs::remove_file(temp_path);
        return Err(io_error(source));
    }
    Ok(())
}

fn write_temp(temp_path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
