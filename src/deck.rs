use include_dir::{include_dir, Dir};
use std::path::{Path, PathBuf};

use crate::error::DeckError;
use crate::word::{WordEntry, WordPool};

static DECK_DIR: Dir = include_dir!("src/decks");

pub const DEFAULT_DECK: &str = "japanese";

/// Supplies a whole, fresh pool on session start and on every reset.
pub trait PoolLoader {
    fn load(&self) -> Result<WordPool, DeckError>;

    /// Short human-readable name for logs and the status line.
    fn describe(&self) -> String;
}

/// Reads a `English,Japanese,Kana` csv from disk.
#[derive(Debug, Clone)]
pub struct CsvPoolLoader {
    path: PathBuf,
}

impl CsvPoolLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PoolLoader for CsvPoolLoader {
    fn load(&self) -> Result<WordPool, DeckError> {
        let file = std::fs::File::open(&self.path)?;
        read_pool(file, &self.describe())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A deck compiled into the binary from `src/decks`.
#[derive(Debug, Clone)]
pub struct BuiltinDeck {
    name: String,
}

impl BuiltinDeck {
    pub fn new(name: impl Into<String>) -> Result<Self, DeckError> {
        let name = name.into();
        if DECK_DIR.get_file(format!("{name}.csv")).is_none() {
            return Err(DeckError::NotFound(name));
        }
        Ok(Self { name })
    }

    pub fn names() -> Vec<String> {
        let mut names: Vec<String> = DECK_DIR
            .files()
            .filter_map(|f| {
                let path = f.path();
                match path.extension().and_then(|e| e.to_str()) {
                    Some("csv") => path.file_stem().and_then(|s| s.to_str()).map(String::from),
                    _ => None,
                }
            })
            .collect();
        names.sort();
        names
    }
}

impl PoolLoader for BuiltinDeck {
    fn load(&self) -> Result<WordPool, DeckError> {
        let file = DECK_DIR
            .get_file(format!("{}.csv", self.name))
            .ok_or_else(|| DeckError::NotFound(self.name.clone()))?;
        read_pool(file.contents(), &self.name)
    }

    fn describe(&self) -> String {
        format!("built-in deck {}", self.name)
    }
}

/// Fixed in-memory word list, cloned into a new pool on every load.
#[derive(Debug, Clone, Default)]
pub struct StaticPoolLoader {
    words: Vec<WordEntry>,
}

impl StaticPoolLoader {
    pub fn new(words: Vec<WordEntry>) -> Self {
        Self { words }
    }
}

impl PoolLoader for StaticPoolLoader {
    fn load(&self) -> Result<WordPool, DeckError> {
        if self.words.is_empty() {
            return Err(DeckError::Empty(self.describe()));
        }
        Ok(WordPool::new(self.words.clone()))
    }

    fn describe(&self) -> String {
        format!("{} static words", self.words.len())
    }
}

fn read_pool<R: std::io::Read>(reader: R, name: &str) -> Result<WordPool, DeckError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let words = rdr
        .deserialize::<WordEntry>()
        .collect::<Result<Vec<_>, _>>()?;

    if words.is_empty() {
        return Err(DeckError::Empty(name.to_string()));
    }
    tracing::debug!(deck = name, words = words.len(), "loaded word pool");
    Ok(WordPool::new(words))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_names_include_default() {
        let names = BuiltinDeck::names();
        assert!(names.contains(&DEFAULT_DECK.to_string()));
        assert!(names.contains(&"numbers".to_string()));
    }

    #[test]
    fn test_builtin_deck_loads() {
        let deck = BuiltinDeck::new(DEFAULT_DECK).unwrap();
        let pool = deck.load().unwrap();

        assert!(pool.len() >= 20);
        let first = pool.get(0).unwrap();
        assert_eq!(first.english_prompt, "water");
        assert_eq!(first.script_form, "水");
        assert_eq!(first.phonetic_form, "みず");
    }

    #[test]
    fn test_builtin_deck_unknown() {
        assert_matches!(
            BuiltinDeck::new("klingon"),
            Err(DeckError::NotFound(name)) if name == "klingon"
        );
    }

    #[test]
    fn test_every_load_is_fresh() {
        let deck = BuiltinDeck::new("numbers").unwrap();
        let mut a = deck.load().unwrap();
        a.remove(0);
        let b = deck.load().unwrap();
        assert_eq!(b.len(), a.len() + 1);
    }

    #[test]
    fn test_csv_loader_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "English,Japanese,Kana").unwrap();
        writeln!(f, "water,水,みず").unwrap();
        writeln!(f, "fire,火,ひ").unwrap();
        drop(f);

        let pool = CsvPoolLoader::new(&path).load().unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(1).unwrap(), &WordEntry::new("fire", "火", "ひ"));
    }

    #[test]
    fn test_csv_loader_header_only_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        std::fs::write(&path, "English,Japanese,Kana\n").unwrap();

        assert_matches!(CsvPoolLoader::new(&path).load(), Err(DeckError::Empty(_)));
    }

    #[test]
    fn test_csv_loader_missing_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        std::fs::write(&path, "English,Japanese\nwater,水\n").unwrap();

        assert_matches!(CsvPoolLoader::new(&path).load(), Err(DeckError::Csv(_)));
    }

    #[test]
    fn test_csv_loader_missing_file() {
        let dir = tempdir().unwrap();
        let loader = CsvPoolLoader::new(dir.path().join("nope.csv"));
        assert_matches!(loader.load(), Err(DeckError::Io(_)));
    }

    #[test]
    fn test_static_loader() {
        let loader = StaticPoolLoader::new(vec![WordEntry::new("one", "一", "いち")]);
        assert_eq!(loader.load().unwrap().len(), 1);
        assert_matches!(StaticPoolLoader::default().load(), Err(DeckError::Empty(_)));
    }
}
