// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! A hand-rolled reader for the line-oriented textual protocol buffer format
//! `distri-recipe::Meta` also emits. Real protobuf text format requires a `.proto` schema and
//! a `protoc` toolchain at build time; since `build.textproto` here has no
//! published `.proto` schema of its own, this module implements just enough
//! of the grammar it needs directly: `key: "string"`, `key: ["a", "b"]`, and
//! `key { ... }` nested blocks, with `#` line comments. This keeps the
//! dependency list honest rather than fabricating a `.proto` file to justify
//! pulling in `prost`.

use std::iter::Peekable;
use std::str::Chars;

use crate::builder::{Builder, CConfig, CMakeConfig, GoConfig, GomodConfig, MesonConfig, PerlConfig, PythonConfig};
use crate::cherry_pick::CherryPick;
use crate::error::{Error, Result};
use crate::install::InstallDirective;
use crate::recipe::Recipe;
use crate::source::Source;
use crate::split_package::{Claim, RuntimeUnion, SplitPackage};
use crate::version::Version;

#[cfg(test)]
#[path = "./parse_test.rs"]
mod parse_test;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Colon,
    Comma,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
}

fn lex(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars: Peekable<Chars> = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '#' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            ':' => {
                chars.next();
                tokens.push(Token::Colon);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '{' => {
                chars.next();
                tokens.push(Token::LBrace);
            }
            '}' => {
                chars.next();
                tokens.push(Token::RBrace);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => {
                            if let Some(escaped) = chars.next() {
                                s.push(escaped);
                            }
                        }
                        Some(c) => s.push(c),
                        None => return Err(Error::InvalidRecipe("unterminated string literal".into())),
                    }
                }
                tokens.push(Token::Str(s));
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' || c == '-' => {
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' || c == '-' {
                        s.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(s));
            }
            other => {
                return Err(Error::InvalidRecipe(format!("unexpected character {other:?}")));
            }
        }
    }
    Ok(tokens)
}

/// A parsed textproto value, loose enough to cover everything `build.textproto`
/// needs without a schema.
#[derive(Debug, Clone)]
enum Value {
    Str(String),
    List(Vec<String>),
    Block(Vec<(String, Value)>),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn parse_block(&mut self, terminator: Option<&Token>) -> Result<Vec<(String, Value)>> {
        let mut fields = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(t) if Some(t) == terminator => {
                    self.next();
                    break;
                }
                _ => {}
            }
            let key = match self.next() {
                Some(Token::Ident(name)) => name,
                other => return Err(Error::InvalidRecipe(format!("expected field name, got {other:?}"))),
            };
            let value = if self.peek() == Some(&Token::LBrace) {
                self.next();
                Value::Block(self.parse_block(Some(&Token::RBrace))?)
            } else {
                if self.peek() == Some(&Token::Colon) {
                    self.next();
                }
                if self.peek() == Some(&Token::LBracket) {
                    self.next();
                    let mut items = Vec::new();
                    loop {
                        match self.next() {
                            Some(Token::Str(s)) => items.push(s),
                            Some(Token::Ident(s)) => items.push(s),
                            Some(Token::RBracket) => break,
                            Some(Token::Comma) => continue,
                            other => {
                                return Err(Error::InvalidRecipe(format!(
                                    "expected string in list, got {other:?}"
                                )))
                            }
                        }
                    }
                    Value::List(items)
                } else {
                    match self.next() {
                        Some(Token::Str(s)) | Some(Token::Ident(s)) => Value::Str(s),
                        other => return Err(Error::InvalidRecipe(format!("expected scalar value, got {other:?}"))),
                    }
                }
            };
            fields.push((key, value));
        }
        Ok(fields)
    }
}

fn as_str(v: &Value) -> Result<&str> {
    match v {
        Value::Str(s) => Ok(s),
        _ => Err(Error::InvalidRecipe("expected a string value".into())),
    }
}

fn as_list(v: &Value) -> Result<Vec<String>> {
    match v {
        Value::List(items) => Ok(items.clone()),
        Value::Str(s) => Ok(vec![s.clone()]),
        _ => Err(Error::InvalidRecipe("expected a list value".into())),
    }
}

fn as_block(v: &Value) -> Result<&[(String, Value)]> {
    match v {
        Value::Block(fields) => Ok(fields),
        _ => Err(Error::InvalidRecipe("expected a nested block".into())),
    }
}

fn field<'a>(fields: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn all_fields<'a>(fields: &'a [(String, Value)], key: &str) -> Vec<&'a Value> {
    fields.iter().filter(|(k, _)| k == key).map(|(_, v)| v).collect()
}

const BUILDER_KEYS: &[&str] = &[
    "cbuilder",
    "cmakebuilder",
    "mesonbuilder",
    "perlbuilder",
    "pythonbuilder",
    "gobuilder",
    "gomodbuilder",
];

fn parse_builder(fields: &[(String, Value)]) -> Result<Builder> {
    let present: Vec<&str> = BUILDER_KEYS
        .iter()
        .copied()
        .filter(|k| field(fields, k).is_some())
        .collect();
    let has_steps = field(fields, "build_step").is_some();

    if present.len() + usize::from(has_steps) > 1 {
        return Err(Error::InvalidRecipe(
            "recipe declares more than one builder (builder fields are a one-of)".into(),
        ));
    }

    if has_steps {
        let steps: Vec<Vec<String>> = all_fields(fields, "build_step")
            .into_iter()
            .map(as_list)
            .collect::<Result<_>>()?;
        return Ok(Builder::Steps(steps));
    }

    let Some(kind) = present.first() else {
        return Err(Error::InvalidRecipe(
            "recipe declares no builder (one of cbuilder/.../build_step[] is required)".into(),
        ));
    };
    let block = as_block(field(fields, kind).unwrap())?;
    let args = |key: &str| -> Result<Vec<String>> {
        match field(block, key) {
            Some(v) => as_list(v),
            None => Ok(Vec::new()),
        }
    };
    let flag = |key: &str| -> bool { matches!(field(block, key), Some(Value::Str(s)) if s == "true") };

    Ok(match *kind {
        "cbuilder" => Builder::C(CConfig {
            copy_to_builddir: flag("copy_to_builddir"),
            autoreconf: flag("autoreconf"),
            configure_args: args("configure")?,
        }),
        "cmakebuilder" => Builder::CMake(CMakeConfig {
            configure_args: args("configure")?,
        }),
        "mesonbuilder" => Builder::Meson(MesonConfig {
            configure_args: args("configure")?,
        }),
        "perlbuilder" => Builder::Perl(PerlConfig {
            makefile_pl_args: args("args")?,
        }),
        "pythonbuilder" => Builder::Python(PythonConfig {
            setup_py_args: args("args")?,
        }),
        "gobuilder" => Builder::Go(GoConfig {
            import_path: field(block, "import_path").map(as_str).transpose()?.unwrap_or_default().to_string(),
        }),
        "gomodbuilder" => Builder::Gomod(GomodConfig {
            import_path: field(block, "import_path").map(as_str).transpose()?.unwrap_or_default().to_string(),
        }),
        other => unreachable!("unhandled builder kind {other}"),
    })
}

fn parse_install(fields: &[(String, Value)]) -> Result<Vec<InstallDirective>> {
    let Some(install) = field(fields, "install") else {
        return Ok(Vec::new());
    };
    let block = as_block(install)?;
    let mut out = Vec::new();
    for (key, value) in block {
        match key.as_str() {
            "systemd_unit" => out.push(InstallDirective::SystemdUnit {
                path: as_str(value)?.to_string(),
            }),
            "symlink" => {
                let pair = as_list(value)?;
                let [link, target] = <[String; 2]>::try_from(pair)
                    .map_err(|_| Error::InvalidRecipe("symlink requires [link, target]".into()))?;
                out.push(InstallDirective::Symlink { link, target });
            }
            "rename" => {
                let pair = as_list(value)?;
                let [from, to] = <[String; 2]>::try_from(pair)
                    .map_err(|_| Error::InvalidRecipe("rename requires [from, to]".into()))?;
                out.push(InstallDirective::Rename { from, to });
            }
            "chmod" => {
                let pair = as_list(value)?;
                let [path, mode] = <[String; 2]>::try_from(pair)
                    .map_err(|_| Error::InvalidRecipe("chmod requires [path, mode]".into()))?;
                out.push(InstallDirective::Chmod { path, mode });
            }
            "empty_dir" => out.push(InstallDirective::EmptyDir {
                path: as_str(value)?.to_string(),
            }),
            "delete" => out.push(InstallDirective::Delete {
                path: as_str(value)?.to_string(),
            }),
            "setcap" => {
                let pair = as_list(value)?;
                let [path, capability] = <[String; 2]>::try_from(pair)
                    .map_err(|_| Error::InvalidRecipe("setcap requires [path, capability]".into()))?;
                out.push(InstallDirective::SetCap { path, capability });
            }
            other => return Err(Error::InvalidRecipe(format!("unknown install directive {other:?}"))),
        }
    }
    Ok(out)
}

fn parse_split_packages(fields: &[(String, Value)]) -> Result<Vec<SplitPackage>> {
    all_fields(fields, "split_package")
        .into_iter()
        .map(|v| {
            let block = as_block(v)?;
            let name = as_str(field(block, "name").ok_or_else(|| Error::InvalidRecipe("split_package missing name".into()))?)?
                .to_string();
            let claims = all_fields(block, "claim")
                .into_iter()
                .map(|c| Ok(Claim { glob: as_str(c)?.to_string() }))
                .collect::<Result<Vec<_>>>()?;
            Ok(SplitPackage { name, claims })
        })
        .collect()
}

fn parse_runtime_unions(fields: &[(String, Value)]) -> Result<Vec<RuntimeUnion>> {
    all_fields(fields, "runtime_union")
        .into_iter()
        .map(|v| {
            let block = as_block(v)?;
            let name = as_str(field(block, "name").ok_or_else(|| Error::InvalidRecipe("runtime_union missing name".into()))?)?
                .to_string();
            let dirs = match field(block, "dir") {
                Some(v) => as_list(v)?,
                None => Vec::new(),
            };
            Ok(RuntimeUnion { name, dirs })
        })
        .collect()
}

fn parse_cherry_picks(fields: &[(String, Value)]) -> Result<Vec<CherryPick>> {
    all_fields(fields, "cherry_pick")
        .into_iter()
        .map(|v| {
            let s = as_str(v)?;
            if let Some(url) = s.strip_prefix("http://").or_else(|| s.strip_prefix("https://")) {
                Ok(CherryPick::Http {
                    url: format!("http{}", if s.starts_with("https") { "s" } else { "" })
                        + "://"
                        + url,
                })
            } else {
                Ok(CherryPick::Local { path: s.to_string() })
            }
        })
        .collect()
}

/// Parse a `build.textproto` document for the given source-package name.
///
/// Fails with `InvalidRecipe` on any unknown required field or malformed
/// version.
pub fn parse_recipe(pkg: &str, text: &str) -> Result<Recipe> {
    let tokens = lex(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    let fields = parser.parse_block(None)?;

    let source = Source::parse(as_str(
        field(&fields, "source").ok_or_else(|| Error::InvalidRecipe("recipe missing required field 'source'".into()))?,
    )?)?;
    let hash = as_str(field(&fields, "hash").ok_or_else(|| Error::InvalidRecipe("recipe missing required field 'hash'".into()))?)?
        .to_string();
    let version: Version = as_str(field(&fields, "version").ok_or_else(|| {
        Error::InvalidRecipe("recipe missing required field 'version'".into())
    })?)?
    .parse()
    .map_err(|e| Error::InvalidRecipe(format!("malformed version: {e}")))?;

    let builder = parse_builder(&fields)?;
    let dep = all_fields(&fields, "dep").into_iter().map(as_str).collect::<Result<Vec<_>>>()?
        .into_iter()
        .map(str::to_string)
        .collect();
    let runtime_dep = all_fields(&fields, "runtime_dep")
        .into_iter()
        .map(as_str)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .map(str::to_string)
        .collect();
    let extra_file = all_fields(&fields, "extra_file")
        .into_iter()
        .map(as_str)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .map(str::to_string)
        .collect();
    let cherry_pick = parse_cherry_picks(&fields)?;
    let install = parse_install(&fields)?;
    let split_package = parse_split_packages(&fields)?;
    let runtime_union = parse_runtime_unions(&fields)?;

    Ok(Recipe {
        pkg: pkg.to_string(),
        source,
        hash,
        version,
        builder,
        dep,
        runtime_dep,
        cherry_pick,
        extra_file,
        install,
        split_package,
        runtime_union,
    })
}
