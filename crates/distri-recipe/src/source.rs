// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};

/// Where a recipe's upstream source comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// `http://` or `https://` — downloaded to a cache file named from the
    /// URL path.
    Http { url: String },
    /// `distri+gomod://<import-path>@<version>` — fetched via the language
    /// module tool into a private module cache.
    DistriGomod { import_path: String, version: String },
    /// `distriroot://<path>` — synchronized from the in-tree source.
    DistriRoot { path: String },
    /// `empty://` — an empty source directory.
    Empty,
    /// `distri+source://<fullname>` — reuses another package's already
    /// published `src` image as this build's source tree.
    DistriSource { fullname: String },
}

impl Source {
    pub fn parse(url: &str) -> Result<Self> {
        if let Some(rest) = url.strip_prefix("https://") {
            return Ok(Source::Http {
                url: format!("https://{rest}"),
            });
        }
        if let Some(rest) = url.strip_prefix("http://") {
            return Ok(Source::Http {
                url: format!("http://{rest}"),
            });
        }
        if let Some(rest) = url.strip_prefix("distri+gomod://") {
            let (import_path, version) = rest
                .rsplit_once('@')
                .ok_or_else(|| Error::InvalidRecipe(format!("malformed gomod source {url:?}: missing @version")))?;
            return Ok(Source::DistriGomod {
                import_path: import_path.to_string(),
                version: version.to_string(),
            });
        }
        if let Some(rest) = url.strip_prefix("distriroot://") {
            return Ok(Source::DistriRoot { path: rest.to_string() });
        }
        if url == "empty://" {
            return Ok(Source::Empty);
        }
        if let Some(rest) = url.strip_prefix("distri+source://") {
            return Ok(Source::DistriSource {
                fullname: rest.to_string(),
            });
        }
        Err(Error::InvalidRecipe(format!("unsupported source scheme: {url:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schemes() {
        assert_eq!(
            Source::parse("https://example.com/foo.tar.gz").unwrap(),
            Source::Http {
                url: "https://example.com/foo.tar.gz".into()
            }
        );
        assert_eq!(
            Source::parse("distri+gomod://golang.org/x/net@v0.1.0").unwrap(),
            Source::DistriGomod {
                import_path: "golang.org/x/net".into(),
                version: "v0.1.0".into(),
            }
        );
        assert_eq!(
            Source::parse("distriroot://hello").unwrap(),
            Source::DistriRoot { path: "hello".into() }
        );
        assert_eq!(Source::parse("empty://").unwrap(), Source::Empty);
    }

    #[test]
    fn test_parse_rejects_unknown_scheme() {
        assert!(Source::parse("ftp://example.com/foo").is_err());
    }
}
