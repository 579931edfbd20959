//! Loading a package of Rust source files.
//!
//! A package is either every `.rs` file directly inside one directory, or
//! an explicit list of files that all live in the same directory.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use syn::{Fields, Item};

use crate::{Error, Result};

/// What kind of item an identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// A struct with named fields, or a unit struct.
    Record,
    TupleStruct,
    Enum,
    Union,
    TypeAlias,
    Trait,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Record => "struct",
            Self::TupleStruct => "tuple struct",
            Self::Enum => "enum",
            Self::Union => "union",
            Self::TypeAlias => "type alias",
            Self::Trait => "trait",
        })
    }
}

/// A named type definition found in the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub kind: DefinitionKind,
    /// Index of the defining file in [`Package::files`].
    pub file: usize,
}

/// One parsed source file.
pub struct SourceFile {
    path: PathBuf,
    src: String,
    syntax: syn::File,
}

impl SourceFile {
    /// Parse `src`, using `path` for error reporting.
    pub fn parse(path: impl Into<PathBuf>, src: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let src = src.into();
        let syntax = syn::parse_file(&src)
            .map_err(|e| Error::parse(e, &src, &path.display().to_string()))?;
        Ok(Self { path, src, syntax })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn syntax(&self) -> &syn::File {
        &self.syntax
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("items", &self.syntax.items.len())
            .finish()
    }
}

/// The compilation unit a generation run works on.
#[derive(Debug)]
pub struct Package {
    name: String,
    dir: PathBuf,
    files: Vec<SourceFile>,
    defs: IndexMap<String, Definition>,
}

impl Package {
    /// Load a package from command line style arguments.
    ///
    /// No arguments means the current directory. A single directory loads
    /// every `.rs` file in it (sorted by name). Otherwise every argument
    /// must be a file, and all files must share one directory.
    pub fn load<P: AsRef<Path>>(args: &[P]) -> Result<Self> {
        let single_dir = match args {
            [single] => is_directory(single.as_ref())?,
            _ => false,
        };
        let (dir, paths) = match args {
            [] => (PathBuf::from("."), rust_files_in(Path::new("."))?),
            [single] if single_dir => {
                let dir = single.as_ref().to_path_buf();
                let files = rust_files_in(&dir)?;
                (dir, files)
            }
            files => {
                let paths: Vec<PathBuf> =
                    files.iter().map(|p| p.as_ref().to_path_buf()).collect();
                (common_dir(&paths)?, paths)
            }
        };

        if paths.is_empty() {
            return Err(Box::new(Error::NoSources { path: dir }));
        }

        let files = paths
            .into_iter()
            .map(|path| {
                let src = std::fs::read_to_string(&path).map_err(|e| Error::io(e, &path))?;
                SourceFile::parse(path, src)
            })
            .collect::<Result<Vec<_>>>()?;

        let name = package_name(&dir);
        tracing::debug!(package = %name, files = files.len(), "loaded package");
        Ok(Self::from_files(name, dir, files))
    }

    /// Build a package from in-memory sources, in the given order.
    pub fn from_sources<I, P, S>(
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
        sources: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: Into<String>,
    {
        let files = sources
            .into_iter()
            .map(|(path, src)| SourceFile::parse(path, src))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_files(name.into(), dir.into(), files))
    }

    fn from_files(name: String, dir: PathBuf, files: Vec<SourceFile>) -> Self {
        let mut defs = IndexMap::new();
        for (index, file) in files.iter().enumerate() {
            collect_definitions(&file.syntax.items, index, &mut defs);
        }
        Self {
            name,
            dir,
            files,
            defs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the package was loaded from; default output location.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files in load order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Look up the first definition of `ident` across the package.
    pub fn definition(&self, ident: &str) -> Option<&Definition> {
        self.defs.get(ident)
    }
}

fn collect_definitions(items: &[Item], file: usize, defs: &mut IndexMap<String, Definition>) {
    for item in items {
        let (ident, kind) = match item {
            Item::Struct(s) => {
                let kind = match s.fields {
                    Fields::Unnamed(_) => DefinitionKind::TupleStruct,
                    _ => DefinitionKind::Record,
                };
                (&s.ident, kind)
            }
            Item::Enum(e) => (&e.ident, DefinitionKind::Enum),
            Item::Union(u) => (&u.ident, DefinitionKind::Union),
            Item::Type(t) => (&t.ident, DefinitionKind::TypeAlias),
            Item::Trait(t) => (&t.ident, DefinitionKind::Trait),
            Item::Mod(m) => {
                if let Some((_, content)) = &m.content {
                    collect_definitions(content, file, defs);
                }
                continue;
            }
            _ => continue,
        };
        defs.entry(ident.to_string())
            .or_insert(Definition { kind, file });
    }
}

fn is_directory(path: &Path) -> Result<bool> {
    std::fs::metadata(path)
        .map(|m| m.is_dir())
        .map_err(|e| Error::io(e, path))
}

fn rust_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(e, dir))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(e, dir))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn common_dir(paths: &[PathBuf]) -> Result<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for path in paths {
        let dir = parent_dir(path);
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    match dirs.len() {
        1 => Ok(dirs.remove(0)),
        count => Err(Box::new(Error::MultiplePackages {
            count,
            dirs: dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })),
    }
}

fn package_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .and_then(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "main".to_string())
}
