/// Category registry: an ordered, editable mapping from category names to
/// the file extensions that belong to them.
///
/// Unlike a plain lookup table, the registry preserves insertion order
/// because classification walks categories front to back and the first
/// one claiming an extension wins.
///
/// # Examples
///
/// ```
/// use dirsift::category::CategoryRegistry;
///
/// let registry = CategoryRegistry::with_defaults();
/// assert!(registry.contains("Images"));
/// assert!(registry.extensions_of("Images").unwrap().contains(&".png".to_string()));
/// ```
use serde::{Deserialize, Serialize};

/// Category names present in every registry. They cannot be removed.
pub const BUILTIN_CATEGORIES: [&str; 7] = [
    "Documents",
    "Images",
    "Videos",
    "Audio",
    "Archives",
    "Code",
    "Other",
];

/// Category assigned to files that no rule or extension entry claims.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Extension sets shipped with [`CategoryRegistry::with_defaults`].
const DEFAULT_EXTENSIONS: &[(&str, &[&str])] = &[
    (
        "Documents",
        &[
            ".pdf", ".doc", ".docx", ".txt", ".xls", ".xlsx", ".ppt", ".pptx", ".odt", ".rtf",
        ],
    ),
    (
        "Images",
        &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg", ".webp", ".heic",
        ],
    ),
    (
        "Videos",
        &[".mp4", ".mov", ".avi", ".mkv", ".flv", ".wmv", ".webm", ".mpeg"],
    ),
    (
        "Audio",
        &[".mp3", ".wav", ".aac", ".flac", ".ogg", ".m4a", ".wma"],
    ),
    (
        "Archives",
        &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz"],
    ),
    (
        "Code",
        &[
            ".py", ".js", ".ts", ".java", ".cpp", ".c", ".cs", ".html", ".css", ".json", ".xml",
            ".sh", ".bat", ".php", ".rb", ".go", ".rs", ".swift", ".kt", ".m", ".pl", ".lua",
            ".sql",
        ],
    ),
];

/// Errors returned by registry edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A category with this name already exists.
    DuplicateCategory { name: String },
    /// Built-in categories cannot be removed.
    ProtectedCategory { name: String },
    /// The named category or extension does not exist.
    NotFound { name: String },
    /// Extensions must be non-empty and start with a dot.
    InvalidExtension { extension: String },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateCategory { name } => {
                write!(f, "Category already exists: {}", name)
            }
            RegistryError::ProtectedCategory { name } => {
                write!(f, "Built-in category cannot be removed: {}", name)
            }
            RegistryError::NotFound { name } => {
                write!(f, "No such category or extension: {}", name)
            }
            RegistryError::InvalidExtension { extension } => {
                write!(f, "Extension must start with a dot: '{}'", extension)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// One named category and the extensions it claims.
///
/// Extensions are stored lowercase with their leading dot (".pdf", ".tar").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl CategoryEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extensions: Vec::new(),
        }
    }
}

/// Ordered collection of categories keyed by name.
///
/// Order is significant: classification walks entries front to back, so
/// when two categories list the same extension the earlier one wins.
/// Edits either fully apply or leave the registry untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    entries: Vec<CategoryEntry>,
}

impl CategoryRegistry {
    /// Creates a registry containing the built-in categories with empty
    /// extension sets.
    pub fn new() -> Self {
        Self {
            entries: BUILTIN_CATEGORIES.iter().map(|n| CategoryEntry::new(n)).collect(),
        }
    }

    /// Creates a registry with the built-in categories and their standard
    /// extension sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsift::category::CategoryRegistry;
    ///
    /// let registry = CategoryRegistry::with_defaults();
    /// let names: Vec<&str> = registry.categories_in_order().collect();
    /// assert_eq!(names[0], "Documents");
    /// assert_eq!(names[6], "Other");
    /// ```
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.populate_defaults();
        registry
    }

    fn populate_defaults(&mut self) {
        for (name, extensions) in DEFAULT_EXTENSIONS {
            if let Some(entry) = self.find_mut(name) {
                entry.extensions = extensions.iter().map(|e| e.to_string()).collect();
            }
        }
    }

    /// Builds a registry from explicit entries, e.g. loaded from a settings
    /// file.
    ///
    /// Entry order is preserved. Extensions are normalized to lowercase and
    /// deduplicated; an extension without a leading dot is rejected. Any
    /// built-in category missing from `entries` is appended at the end with
    /// an empty extension set, so the fallback category always exists.
    pub fn from_entries(entries: Vec<CategoryEntry>) -> Result<Self, RegistryError> {
        let mut registry = Self {
            entries: Vec::with_capacity(entries.len()),
        };
        for entry in entries {
            let name = entry.name.trim().to_string();
            if registry.contains(&name) {
                return Err(RegistryError::DuplicateCategory { name });
            }
            let mut normalized: Vec<String> = Vec::with_capacity(entry.extensions.len());
            for ext in &entry.extensions {
                let ext = normalize_extension(ext)?;
                if !normalized.contains(&ext) {
                    normalized.push(ext);
                }
            }
            registry.entries.push(CategoryEntry {
                name,
                extensions: normalized,
            });
        }
        for builtin in BUILTIN_CATEGORIES {
            if !registry.contains(builtin) {
                registry.entries.push(CategoryEntry::new(builtin));
            }
        }
        Ok(registry)
    }

    /// Returns all entries in classification order.
    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    /// Returns category names in classification order.
    pub fn categories_in_order(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Returns true if a category with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Returns true for the category names every registry ships with.
    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_CATEGORIES.contains(&name)
    }

    /// Returns the extensions claimed by `name`, or `None` if the category
    /// does not exist.
    pub fn extensions_of(&self, name: &str) -> Option<&[String]> {
        self.find(name).map(|e| e.extensions.as_slice())
    }

    /// Appends a new category with an empty extension set.
    ///
    /// The name is trimmed of surrounding whitespace. Names are
    /// case-sensitive, so "images" and "Images" are distinct categories.
    pub fn add_category(&mut self, name: &str) -> Result<(), RegistryError> {
        let name = name.trim().to_string();
        if self.contains(&name) {
            return Err(RegistryError::DuplicateCategory { name });
        }
        self.entries.push(CategoryEntry {
            name,
            extensions: Vec::new(),
        });
        Ok(())
    }

    /// Removes a user-defined category and its extension set.
    ///
    /// Built-in categories are protected and cannot be removed.
    pub fn remove_category(&mut self, name: &str) -> Result<(), RegistryError> {
        if Self::is_builtin(name) {
            return Err(RegistryError::ProtectedCategory {
                name: name.to_string(),
            });
        }
        let position = self.entries.iter().position(|e| e.name == name);
        match position {
            Some(index) => {
                self.entries.remove(index);
                Ok(())
            }
            None => Err(RegistryError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Adds an extension to an existing category.
    ///
    /// The extension is lowercased before storage, so lookups against
    /// scanner output (which lowercases too) stay consistent. Adding an
    /// extension the category already has is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsift::category::CategoryRegistry;
    ///
    /// let mut registry = CategoryRegistry::with_defaults();
    /// registry.add_extension("Images", ".HEIF").unwrap();
    /// registry.add_extension("Images", ".heif").unwrap();
    ///
    /// let images = registry.extensions_of("Images").unwrap();
    /// assert_eq!(images.iter().filter(|e| *e == ".heif").count(), 1);
    /// ```
    pub fn add_extension(&mut self, category: &str, extension: &str) -> Result<(), RegistryError> {
        let extension = normalize_extension(extension)?;
        let entry = self.find_mut(category).ok_or_else(|| RegistryError::NotFound {
            name: category.to_string(),
        })?;
        if !entry.extensions.contains(&extension) {
            entry.extensions.push(extension);
        }
        Ok(())
    }

    /// Removes an extension from a category.
    ///
    /// The lookup uses the same normalization as [`add_extension`], so
    /// removing ".PDF" removes the stored ".pdf".
    ///
    /// [`add_extension`]: CategoryRegistry::add_extension
    pub fn remove_extension(
        &mut self,
        category: &str,
        extension: &str,
    ) -> Result<(), RegistryError> {
        let extension = normalize_extension(extension)?;
        let entry = self.find_mut(category).ok_or_else(|| RegistryError::NotFound {
            name: category.to_string(),
        })?;
        let position = entry.extensions.iter().position(|e| *e == extension);
        match position {
            Some(index) => {
                entry.extensions.remove(index);
                Ok(())
            }
            None => Err(RegistryError::NotFound { name: extension }),
        }
    }

    fn find(&self, name: &str) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut CategoryEntry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }
}

impl Default for CategoryRegistry {
    /// Equivalent to [`CategoryRegistry::with_defaults`].
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Trims, validates and lowercases an extension.
///
/// A valid extension starts with a dot and has at least one character
/// after it.
fn normalize_extension(extension: &str) -> Result<String, RegistryError> {
    let extension = extension.trim();
    if !extension.starts_with('.') || extension.len() < 2 {
        return Err(RegistryError::InvalidExtension {
            extension: extension.to_string(),
        });
    }
    Ok(extension.to_lowercase())
}
