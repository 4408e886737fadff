// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! In-memory `Repo` fixture for tests, grounded on spk-storage's own
//! `fixtures.rs` test-setup module.

use std::collections::HashMap;

use distri_recipe::{Meta, PackageIdent};

use crate::error::{Error, Result};
use crate::repo::Repo;

#[derive(Default)]
pub struct FakeRepo {
    metas: HashMap<String, Meta>,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, full_name: impl Into<String>, meta: Meta) -> Self {
        self.metas.insert(full_name.into(), meta);
        self
    }
}

impl Repo for FakeRepo {
    fn has_meta(&self, full_name: &str) -> bool {
        self.metas.contains_key(full_name)
    }

    fn list_matches(&self, pkg: &str) -> Result<Vec<String>> {
        Ok(self
            .metas
            .keys()
            .filter(|name| {
                PackageIdent::parse(name)
                    .map(|parsed| parsed.pkg == pkg)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    fn read_meta(&self, full_name: &str) -> Result<Meta> {
        self.metas
            .get(full_name)
            .cloned()
            .ok_or_else(|| Error::MissingMeta(full_name.to_string()))
    }
}
