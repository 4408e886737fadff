// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Source resolution and extraction.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[cfg(test)]
#[path = "./source_test.rs"]
mod source_test;

/// Download bytes for a URL. A trait so the build driver can be exercised
/// without a network, the same boundary `distri-sandbox::FuseControl` draws
/// around its own external collaborator.
pub trait Downloader {
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// A `Downloader` backed by a blocking `reqwest` client with transparent
/// response decompression disabled — some servers serve an already-gzipped
/// tarball with `Content-Encoding: gzip`, which must reach the caller
/// untouched or the subsequent hash check fails.
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .no_gzip()
                .build()
                .expect("building a blocking http client with fixed options cannot fail"),
        }
    }
}

impl Downloader for HttpDownloader {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self.client.get(url).send()?.error_for_status()?.bytes()?;
        Ok(bytes.to_vec())
    }
}

/// The cache file name for a downloaded URL: the final path segment, or
/// `"archive"` if the URL has no path component to take one from.
pub fn cache_file_name(url: &str) -> String {
    url.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("archive")
        .to_string()
}

fn strip_first_component(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    components.next()?;
    let rest: PathBuf = components.collect();
    if rest.as_os_str().is_empty() { None } else { Some(rest) }
}

/// Extract a (possibly gzip-compressed) tar archive into `dest`, dropping
/// the first path component of every entry (`--strip-components=1`).
pub fn extract_tar(reader: impl Read, dest: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        let Some(stripped) = strip_first_component(&path) else {
            continue;
        };
        let target = dest.join(stripped);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry.unpack(&target)?;
    }
    Ok(())
}

pub fn extract_tar_gz(bytes: &[u8], dest: &Path) -> Result<()> {
    extract_tar(flate2::read::GzDecoder::new(bytes), dest)
}

const AR_GLOBAL_HEADER: &[u8] = b"!<arch>\n";
const AR_HEADER_LEN: usize = 60;

/// Extract a `.deb` package's `data.tar(.gz)` member into `dest`. `.deb` is
/// an `ar` archive of `debian-binary`, `control.tar.*`, `data.tar.*`; only
/// the `data` member's content matters for a build's source tree. Only the
/// uncompressed and gzip-compressed forms are supported; anything else is
/// reported rather than silently skipped.
pub fn extract_deb(bytes: &[u8], dest: &Path) -> Result<()> {
    if !bytes.starts_with(AR_GLOBAL_HEADER) {
        return Err(Error::UnsupportedArchive("not an ar archive".into()));
    }
    let mut pos = AR_GLOBAL_HEADER.len();
    while pos + AR_HEADER_LEN <= bytes.len() {
        let header = &bytes[pos..pos + AR_HEADER_LEN];
        let name = std::str::from_utf8(&header[0..16]).unwrap_or("").trim_end().to_string();
        let size: usize = std::str::from_utf8(&header[48..58])
            .unwrap_or("0")
            .trim()
            .parse()
            .unwrap_or(0);
        let data_start = pos + AR_HEADER_LEN;
        let data_end = data_start + size;
        if data_end > bytes.len() {
            break;
        }
        let data = &bytes[data_start..data_end];

        if name.starts_with("data.tar.gz") {
            return extract_tar_gz(data, dest);
        }
        if name.starts_with("data.tar") {
            return extract_tar(data, dest);
        }

        pos = data_end + (data_end % 2);
    }
    Err(Error::UnsupportedArchive(
        "no data.tar(.gz) member found in .deb (or it uses an unsupported compression)".into(),
    ))
}
