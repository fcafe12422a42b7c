use crate::config::Config;
use ignore::overrides::Override;
use ignore::WalkBuilder;
use miette::{IntoDiagnostic, Result};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Android resource folder kind, taken from the folder name without its
/// configuration qualifiers (`layout-land` is a layout folder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceFolder {
    Layout,
    Navigation,
    Menu,
    Values,
    Drawable,
    Xml,
    Other,
}

impl ResourceFolder {
    pub fn from_dir_name(name: &str) -> Self {
        let kind = name.split('-').next().unwrap_or(name);
        match kind {
            "layout" => ResourceFolder::Layout,
            "navigation" => ResourceFolder::Navigation,
            "menu" => ResourceFolder::Menu,
            "values" => ResourceFolder::Values,
            "drawable" | "mipmap" => ResourceFolder::Drawable,
            "xml" => ResourceFolder::Xml,
            _ => ResourceFolder::Other,
        }
    }

    /// Resource folder of an XML file living directly under `res/<folder>/`
    pub fn from_path(path: &Path) -> Option<Self> {
        let parent = path.parent()?;
        let grandparent = parent.parent()?;
        if grandparent.file_name()?.to_str()? != "res" {
            return None;
        }
        Some(Self::from_dir_name(parent.file_name()?.to_str()?))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceFolder::Layout => "layout",
            ResourceFolder::Navigation => "navigation",
            ResourceFolder::Menu => "menu",
            ResourceFolder::Values => "values",
            ResourceFolder::Drawable => "drawable",
            ResourceFolder::Xml => "xml",
            ResourceFolder::Other => "other",
        }
    }
}

impl fmt::Display for ResourceFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type of project file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Kotlin,
    Java,
    Resource(ResourceFolder),
    XmlOther,
}

impl FileType {
    /// Determine file type from path
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        match extension {
            // Gradle scripts are configuration, not sources
            "kts" => None,
            "kt" => Some(FileType::Kotlin),
            "java" => Some(FileType::Java),
            "xml" => match ResourceFolder::from_path(path) {
                Some(folder) => Some(FileType::Resource(folder)),
                None => Some(FileType::XmlOther),
            },
            _ => None,
        }
    }

    /// Check if this is a source code file (Kotlin or Java)
    pub fn is_source(&self) -> bool {
        matches!(self, FileType::Kotlin | FileType::Java)
    }

    /// Resource folder for resource XML files
    pub fn resource_folder(&self) -> Option<ResourceFolder> {
        match self {
            FileType::Resource(folder) => Some(*folder),
            _ => None,
        }
    }
}

/// Represents a discovered project file
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file
    pub path: PathBuf,

    /// Type of file
    pub file_type: FileType,
}

impl SourceFile {
    pub fn new(path: PathBuf, file_type: FileType) -> Self {
        Self { path, file_type }
    }

    /// Load and return owned contents
    pub fn read_contents(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).into_diagnostic()
    }
}

/// File finder for discovering source and resource files in a project
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Find all project files under the given path, sorted by path
    pub fn find_files(&self, root: &Path) -> Result<Vec<SourceFile>> {
        debug!("Scanning for files in: {}", root.display());

        let targets = if self.config.targets.is_empty() {
            vec![root.to_path_buf()]
        } else {
            self.config.targets.iter().map(|t| root.join(t)).collect()
        };

        let excludes = self.config.exclude_overrides(root)?;

        let mut files: Vec<SourceFile> = targets
            .par_iter()
            .flat_map(|target| self.scan_directory(target, &excludes))
            .collect();

        // Walk order differs between runs; the rule's tie-breaks must not
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);

        debug!("Found {} files", files.len());
        Ok(files)
    }

    fn scan_directory(&self, dir: &Path, excludes: &Override) -> Vec<SourceFile> {
        if !dir.exists() {
            trace!("Directory does not exist: {}", dir.display());
            return Vec::new();
        }

        let walker = WalkBuilder::new(dir)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .follow_links(false)
            .overrides(excludes.clone())
            .build();

        walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();
                let file_type = FileType::from_path(path)?;

                trace!("Found {:?}: {}", file_type, path.display());
                Some(SourceFile::new(path.to_path_buf(), file_type))
            })
            .collect()
    }
}

/// Statistics about discovered files
#[derive(Debug, Default)]
pub struct FileStats {
    pub kotlin_files: usize,
    pub java_files: usize,
    pub layout_files: usize,
    pub navigation_files: usize,
    pub other_xml_files: usize,
}

impl FileStats {
    pub fn from_files(files: &[SourceFile]) -> Self {
        let mut stats = Self::default();
        for file in files {
            match file.file_type {
                FileType::Kotlin => stats.kotlin_files += 1,
                FileType::Java => stats.java_files += 1,
                FileType::Resource(ResourceFolder::Layout) => stats.layout_files += 1,
                FileType::Resource(ResourceFolder::Navigation) => stats.navigation_files += 1,
                FileType::Resource(_) | FileType::XmlOther => stats.other_xml_files += 1,
            }
        }
        stats
    }

    pub fn source_files(&self) -> usize {
        self.kotlin_files + self.java_files
    }

    pub fn resource_trees(&self) -> usize {
        self.layout_files + self.navigation_files
    }
}
