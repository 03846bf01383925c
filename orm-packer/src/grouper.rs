/// Per-directory grouping of discovered textures and role lookup by filename.
use crate::error::PackerError;
use constants::naming::{
    AO_KEYWORD, METALLIC_KEYWORD, ORM_KEYWORD, ORM_UNITY_KEYWORD, ROUGHNESS_KEYWORD,
    name_contains,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Role a file plays in a directory, inferred from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    AmbientOcclusion,
    Roughness,
    Metallic,
    Orm,
}

impl FileRole {
    pub fn keyword(self) -> &'static str {
        match self {
            FileRole::AmbientOcclusion => AO_KEYWORD,
            FileRole::Roughness => ROUGHNESS_KEYWORD,
            FileRole::Metallic => METALLIC_KEYWORD,
            FileRole::Orm => ORM_KEYWORD,
        }
    }

    /// Checks a bare file name against this role.
    /// Packed outputs of the individual flow never count as ORM inputs.
    pub fn matches(self, file_name: &str) -> bool {
        if !name_contains(file_name, self.keyword()) {
            return false;
        }

        match self {
            FileRole::Orm => !name_contains(file_name, ORM_UNITY_KEYWORD),
            _ => true,
        }
    }
}

/// Ordered files sharing one directory.
#[derive(Debug, Clone)]
pub struct DirectoryFileSet {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl DirectoryFileSet {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            files: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// First file in discovery order whose name matches the role.
    pub fn find_role(&self, role: FileRole) -> Option<&Path> {
        self.files
            .iter()
            .find(|path| role.matches(&file_name(path)))
            .map(PathBuf::as_path)
    }

    /// Every packed texture in the directory, in discovery order.
    pub fn orm_candidates(&self) -> Vec<&Path> {
        self.files
            .iter()
            .filter(|path| FileRole::Orm.matches(&file_name(path)))
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Partitions a flat file listing by parent directory.
/// Directory order and file order follow first appearance in the input.
pub fn group_by_directory<I>(paths: I) -> Result<Vec<DirectoryFileSet>, PackerError>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut groups: Vec<DirectoryFileSet> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    for path in paths {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => return Err(PackerError::MissingParentDirectory(path)),
        };

        let slot = *index.entry(dir.clone()).or_insert_with(|| {
            groups.push(DirectoryFileSet::new(dir));
            groups.len() - 1
        });
        groups[slot].files.push(path);
    }

    Ok(groups)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
