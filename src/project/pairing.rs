//! Groups the files of one directory into components by naming convention.
//!
//! Rules, highest precedence first:
//!
//! 1. `foo.h` + `foo.cpp` form component `foo`.
//! 2. `x_vertex.glsl` + `x_fragment.glsl` form component `x` (two or more
//!    stage files must share the core name).
//! 3. A build file such as `CMakeLists.txt` is its own component.
//! 4. Everything else lands in the `unpaired_files` bucket.
//!
//! A file claimed by an earlier rule is invisible to later ones.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};

use crate::project::file_name;

/// Bucket name for files that did not join any component.
pub const UNPAIRED_FILES: &str = "unpaired_files";
/// Bucket name for shader files that did not pair, when kept separate.
pub const UNPAIRED_SHADERS: &str = "unpaired_shaders";

/// Naming conventions that drive pairing and scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingRules {
    /// Header suffix, e.g. `.h`.
    pub header_suffix: String,
    /// Implementation suffix, e.g. `.cpp`.
    pub implementation_suffix: String,
    /// Shader suffix, e.g. `.glsl`.
    pub shader_suffix: String,
    /// Stage markers stripped from shader base names, e.g. `_vertex`.
    pub stage_markers: Vec<String>,
    /// Exact file names treated as standalone build components.
    pub build_files: Vec<String>,
    /// Additional suffixes to scan; such files are always unpaired.
    pub extra_suffixes: Vec<String>,
    /// Route unpaired shaders to [`UNPAIRED_SHADERS`] instead of [`UNPAIRED_FILES`].
    pub separate_unpaired_shaders: bool,
}

impl Default for PairingRules {
    fn default() -> Self {
        Self {
            header_suffix: ".h".into(),
            implementation_suffix: ".cpp".into(),
            shader_suffix: ".glsl".into(),
            stage_markers: vec!["_vertex".into(), "_fragment".into()],
            build_files: vec!["CMakeLists.txt".into()],
            extra_suffixes: Vec::new(),
            separate_unpaired_shaders: false,
        }
    }
}

impl PairingRules {
    /// Every suffix the walker should accept.
    #[must_use]
    pub fn scan_suffixes(&self) -> Vec<String> {
        let suffixes: IndexSet<&String> =
            [&self.header_suffix, &self.implementation_suffix, &self.shader_suffix]
                .into_iter()
                .chain(&self.build_files)
                .chain(&self.extra_suffixes)
                .collect();
        suffixes.into_iter().cloned().collect()
    }

    fn is_shader(&self, path: &Path) -> bool {
        file_name(path).ends_with(self.shader_suffix.as_str())
    }

    /// Core name of a staged shader (`x_vertex.glsl` -> `x`), if it has a marker.
    fn shader_core<'a>(&self, stem: &'a str) -> Option<&'a str> {
        self.stage_markers
            .iter()
            .find_map(|marker| stem.strip_suffix(marker.as_str()))
            .filter(|core| !core.is_empty())
    }
}

/// A named group of files summarized as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Unique key within its directory.
    pub key: String,
    /// Member files, in summarization order.
    pub files: Vec<PathBuf>,
}

impl Component {
    /// A single-file component keyed by the file name.
    #[must_use]
    pub fn single(path: PathBuf) -> Self {
        Self { key: file_name(&path), files: vec![path] }
    }
}

/// Result of pairing one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairing {
    /// Named components, ordered by the position of their first member in the input.
    pub components: Vec<Component>,
    /// Files that joined no component.
    pub unpaired_files: Vec<PathBuf>,
    /// Unpaired shader files, populated only with `separate_unpaired_shaders`.
    pub unpaired_shaders: Vec<PathBuf>,
}

impl Pairing {
    /// Contents of a reserved bucket by name.
    #[cfg(test)]
    pub(crate) fn bucket(&self, name: &str) -> Option<&[PathBuf]> {
        match name {
            UNPAIRED_FILES => Some(&self.unpaired_files),
            UNPAIRED_SHADERS => Some(&self.unpaired_shaders),
            _ => None,
        }
    }

    /// Summarization units: named components first, then each bucketed file
    /// on its own.
    #[must_use]
    pub fn units(&self) -> Vec<Component> {
        let mut units = self.components.clone();
        units.extend(
            self.unpaired_files.iter().chain(&self.unpaired_shaders).cloned().map(Component::single),
        );
        units
    }
}

/// Stem of `name` once `suffix` is removed, if it carries that suffix.
fn stem_with_suffix<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    name.strip_suffix(suffix).filter(|stem| !stem.is_empty())
}

/// Partitions `files` into components according to `rules`.
///
/// Output is fully determined by the input order: identical input always
/// yields identical keys and membership.
#[must_use]
pub fn pair_files(files: &[PathBuf], rules: &PairingRules) -> Pairing {
    let mut seen = HashSet::new();
    let files: Vec<&PathBuf> = files.iter().filter(|f| seen.insert(f.as_path())).collect();
    let names: Vec<String> = files.iter().map(|f| file_name(f)).collect();

    let mut claimed = vec![false; files.len()];
    let mut keys: HashSet<String> = HashSet::new();
    // (index of first member, component)
    let mut named: Vec<(usize, Component)> = Vec::new();

    // Rule 1: header + implementation.
    let mut headers: IndexMap<&str, usize> = IndexMap::new();
    let mut implementations: IndexMap<&str, usize> = IndexMap::new();
    for (i, name) in names.iter().enumerate() {
        if let Some(stem) = stem_with_suffix(name, &rules.header_suffix) {
            headers.entry(stem).or_insert(i);
        } else if let Some(stem) = stem_with_suffix(name, &rules.implementation_suffix) {
            implementations.entry(stem).or_insert(i);
        }
    }
    for (stem, &h) in &headers {
        if let Some(&c) = implementations.get(stem) {
            claimed[h] = true;
            claimed[c] = true;
            keys.insert((*stem).to_string());
            named.push((
                h.min(c),
                Component { key: (*stem).to_string(), files: vec![files[h].clone(), files[c].clone()] },
            ));
        }
    }

    // Rule 2: shader stages sharing a core name.
    let mut cores: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (i, name) in names.iter().enumerate() {
        if claimed[i] {
            continue;
        }
        let core = stem_with_suffix(name, &rules.shader_suffix).and_then(|s| rules.shader_core(s));
        if let Some(core) = core {
            cores.entry(core).or_default().push(i);
        }
    }
    for (core, members) in cores {
        if members.len() < 2 {
            continue;
        }
        let mut paths: Vec<PathBuf> = members.iter().map(|&i| files[i].clone()).collect();
        paths.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
        let key = if keys.contains(core) {
            format!("{core}{}", rules.shader_suffix)
        } else {
            core.to_string()
        };
        for &i in &members {
            claimed[i] = true;
        }
        keys.insert(key.clone());
        named.push((members[0], Component { key, files: paths }));
    }

    // Rule 3: standalone build files.
    for (i, name) in names.iter().enumerate() {
        if claimed[i] || !rules.build_files.iter().any(|b| b == name) || keys.contains(name) {
            continue;
        }
        claimed[i] = true;
        keys.insert(name.clone());
        named.push((i, Component { key: name.clone(), files: vec![files[i].clone()] }));
    }

    // Rule 4: the rest, in encounter order.
    let mut pairing = Pairing::default();
    for (i, file) in files.iter().enumerate() {
        if claimed[i] {
            continue;
        }
        if rules.separate_unpaired_shaders && rules.is_shader(file) {
            pairing.unpaired_shaders.push((*file).clone());
        } else {
            pairing.unpaired_files.push((*file).clone());
        }
    }

    named.sort_by_key(|(first, _)| *first);
    pairing.components = named.into_iter().map(|(_, component)| component).collect();
    pairing
}
