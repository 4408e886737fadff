// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! `#!/ro/...` shebang parsing: a script's
//! interpreter line names the fully-qualified package that owns it.

#[cfg(test)]
#[path = "./interpreter_test.rs"]
mod interpreter_test;

/// Parse the first line of a script for a `#!/ro/<fullname>/...` shebang and
/// return `<fullname>`. Returns `None` for scripts that don't use the `/ro`
/// convention (a bare `#!/bin/sh` points at the symlinked union, not a
/// specific package, and contributes no runtime dep here).
pub fn parse_shebang_package(first_line: &str) -> Option<String> {
    let rest = first_line.trim_end().strip_prefix("#!/ro/")?;
    let end = rest.find('/').unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some(rest[..end].to_string())
}
