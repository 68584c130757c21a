// SPDX-FileCopyrightText: 2026 nixstore contributors
// SPDX-License-Identifier: MIT

//! Reader for derivations in ATerm form, the format of `.drv` files:
//!
//! ```text
//! Derive([outputs],[input drvs],[input srcs],"system","builder",[args],[env])
//! ```
//!
//! Strings are double-quoted with `\"`, `\\`, `\n`, `\r` and `\t` escapes.

use std::collections::BTreeSet;

use crate::derivation::{Derivation, DerivationOutput};
use crate::store_path::{StoreDir, StorePath, StorePathError};

#[derive(Debug, thiserror::Error)]
pub enum ATermError {
    #[error("unexpected end of input at position {at}")]
    Eof { at: usize },
    #[error("at position {at}: expected {wanted}, found {found:?}")]
    Unexpected {
        at: usize,
        wanted: &'static str,
        found: char,
    },
    #[error("bad store path '{path}': {source}")]
    BadPath {
        path: String,
        #[source]
        source: StorePathError,
    },
    #[error("trailing data at position {at}")]
    Trailing { at: usize },
}

type Result<T> = std::result::Result<T, ATermError>;

/// Parse the contents of a `.drv` file.
///
/// `name` is the derivation name, which the file does not record.
pub fn parse(store_dir: &StoreDir, input: &str, name: &str) -> Result<Derivation> {
    let mut cur = Cursor::new(input);

    cur.header()?;
    let outputs = cur.seq(|c| output(c, store_dir))?.into_iter().collect();
    cur.punct(',')?;
    let input_drvs = cur.seq(|c| input_drv(c, store_dir))?.into_iter().collect();
    cur.punct(',')?;
    let input_srcs = cur.seq(|c| c.path(store_dir))?.into_iter().collect();
    cur.punct(',')?;
    let platform = cur.string()?;
    cur.punct(',')?;
    let builder = cur.string()?;
    cur.punct(',')?;
    let args = cur.seq(Cursor::string)?;
    cur.punct(',')?;
    let env = cur.seq(env_binding)?.into_iter().collect();
    cur.punct(')')?;
    cur.finish()?;

    Ok(Derivation {
        name: name.to_owned(),
        outputs,
        input_drvs,
        input_srcs,
        platform,
        builder,
        args,
        env,
    })
}

/// Quote `s` as an ATerm string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn output(cur: &mut Cursor<'_>, store_dir: &StoreDir) -> Result<(String, DerivationOutput)> {
    cur.punct('(')?;
    let id = cur.string()?;
    cur.punct(',')?;
    let path = cur.string()?;
    cur.punct(',')?;
    let hash_algo = cur.string()?;
    cur.punct(',')?;
    let hash = cur.string()?;
    cur.punct(')')?;

    // Floating content-addressed outputs have no path yet.
    let path = match path.as_str() {
        "" => None,
        p => Some(store_path(store_dir, p)?),
    };
    let non_empty = |s: String| (!s.is_empty()).then_some(s);
    Ok((
        id,
        DerivationOutput {
            path,
            hash_algo: non_empty(hash_algo),
            hash: non_empty(hash),
        },
    ))
}

fn input_drv(cur: &mut Cursor<'_>, store_dir: &StoreDir) -> Result<(StorePath, BTreeSet<String>)> {
    cur.punct('(')?;
    let drv = cur.path(store_dir)?;
    cur.punct(',')?;
    let outputs = cur.seq(Cursor::string)?.into_iter().collect();
    cur.punct(')')?;
    Ok((drv, outputs))
}

fn env_binding(cur: &mut Cursor<'_>) -> Result<(String, String)> {
    cur.punct('(')?;
    let key = cur.string()?;
    cur.punct(',')?;
    let value = cur.string()?;
    cur.punct(')')?;
    Ok((key, value))
}

fn store_path(store_dir: &StoreDir, path: &str) -> Result<StorePath> {
    store_dir
        .parse_absolute(path)
        .map_err(|source| ATermError::BadPath {
            path: path.to_owned(),
            source,
        })
}

struct Cursor<'a> {
    src: &'a str,
    at: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, at: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.at..]
    }

    fn unexpected(&self, wanted: &'static str) -> ATermError {
        match self.rest().chars().next() {
            Some(found) => ATermError::Unexpected {
                at: self.at,
                wanted,
                found,
            },
            None => ATermError::Eof { at: self.at },
        }
    }

    fn eat(&mut self, c: char) -> bool {
        let hit = self.rest().starts_with(c);
        if hit {
            self.at += c.len_utf8();
        }
        hit
    }

    fn punct(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            return Ok(());
        }
        Err(self.unexpected(match c {
            '(' => "'('",
            ')' => "')'",
            ',' => "','",
            '[' => "'['",
            _ => "'\"'",
        }))
    }

    fn header(&mut self) -> Result<()> {
        const HEADER: &str = "Derive(";
        if self.rest().starts_with(HEADER) {
            self.at += HEADER.len();
            return Ok(());
        }
        Err(self.unexpected("\"Derive(\""))
    }

    fn string(&mut self) -> Result<String> {
        self.punct('"')?;
        let mut value = String::new();
        loop {
            let rest = self.rest();
            let Some(stop) = rest.find(['"', '\\']) else {
                return Err(ATermError::Eof { at: self.src.len() });
            };
            value.push_str(&rest[..stop]);
            self.at += stop + 1;
            if rest.as_bytes()[stop] == b'"' {
                return Ok(value);
            }

            let Some(escaped) = self.rest().chars().next() else {
                return Err(ATermError::Eof { at: self.at });
            };
            self.at += escaped.len_utf8();
            value.push(match escaped {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                c => c,
            });
        }
    }

    fn path(&mut self, store_dir: &StoreDir) -> Result<StorePath> {
        let path = self.string()?;
        store_path(store_dir, &path)
    }

    /// `[item,item,...]`
    fn seq<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        self.punct('[')?;
        let mut items = Vec::new();
        if self.eat(']') {
            return Ok(items);
        }
        loop {
            items.push(item(self)?);
            if self.eat(']') {
                return Ok(items);
            }
            if !self.eat(',') {
                return Err(self.unexpected("',' or ']'"));
            }
        }
    }

    fn finish(self) -> Result<()> {
        // Hand-edited files sometimes end in a newline.
        if self.rest().trim_end().is_empty() {
            Ok(())
        } else {
            Err(ATermError::Trailing { at: self.at })
        }
    }
}
