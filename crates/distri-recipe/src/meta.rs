// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! The `<fullname>.meta.textproto` file emitted alongside every image.

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::version::Version;

#[cfg(test)]
#[path = "./meta_test.rs"]
mod meta_test;

/// Metadata shipped alongside a package image.
///
/// `runtime_dep` is closed under transitive runtime dependencies modulo
/// self-references — that closure is computed by `distri-resolver::resolve`,
/// not by this type, which only carries whatever its caller already
/// computed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Meta {
    /// Fully-qualified runtime dependency names.
    pub runtime_dep: Vec<String>,
    pub source_pkg: String,
    pub version: Version,
    pub runtime_union: Vec<String>,
    /// Hex content hash over recipe text, source hash, and resolved dep full
    /// names (used for caching).
    pub input_digest: String,
}

impl Meta {
    /// Render as the line-oriented text format read back by `from_text`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("source_pkg: \"{}\"\n", self.source_pkg));
        out.push_str(&format!("version: \"{}\"\n", self.version));
        out.push_str(&format!("input_digest: \"{}\"\n", self.input_digest));
        for dep in &self.runtime_dep {
            out.push_str(&format!("runtime_dep: \"{dep}\"\n"));
        }
        for u in &self.runtime_union {
            out.push_str(&format!("runtime_union: \"{u}\"\n"));
        }
        out
    }

    pub fn from_text(path: impl AsRef<Path>, text: &str) -> Result<Self> {
        let path = path.as_ref();
        let invalid = |reason: &str| Error::InvalidMeta {
            path: path.display().to_string(),
            reason: reason.to_string(),
        };

        let mut source_pkg = None;
        let mut version = None;
        let mut input_digest = None;
        let mut runtime_dep = Vec::new();
        let mut runtime_union = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| invalid(&format!("malformed line {line:?}")))?;
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            match key {
                "source_pkg" => source_pkg = Some(value.to_string()),
                "version" => {
                    version = Some(
                        value
                            .parse::<Version>()
                            .map_err(|e| invalid(&format!("bad version: {e}")))?,
                    )
                }
                "input_digest" => input_digest = Some(value.to_string()),
                "runtime_dep" => runtime_dep.push(value.to_string()),
                "runtime_union" => runtime_union.push(value.to_string()),
                other => return Err(invalid(&format!("unknown field {other:?}"))),
            }
        }

        Ok(Meta {
            runtime_dep,
            source_pkg: source_pkg.ok_or_else(|| invalid("missing source_pkg"))?,
            version: version.ok_or_else(|| invalid("missing version"))?,
            runtime_union,
            input_digest: input_digest.ok_or_else(|| invalid("missing input_digest"))?,
        })
    }

    /// Write atomically: write to a temp file in the same directory, fsync,
    /// then rename over the destination. This is what lets "every emitted
    /// image has a matching meta file" hold even if the process is killed
    /// mid-write — readers never observe a half-written meta file.
    pub fn write_atomic(&self, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(self.to_text().as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(dest).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_text(path, &text)
    }
}
