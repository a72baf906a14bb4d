use serde::{Deserialize, Serialize};

/// One vocabulary item. Column names follow the split-word deck csv.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    #[serde(rename = "English")]
    pub english_prompt: String,
    #[serde(rename = "Japanese")]
    pub script_form: String,
    #[serde(rename = "Kana")]
    pub phonetic_form: String,
}

impl WordEntry {
    pub fn new(
        english_prompt: impl Into<String>,
        script_form: impl Into<String>,
        phonetic_form: impl Into<String>,
    ) -> Self {
        Self {
            english_prompt: english_prompt.into(),
            script_form: script_form.into(),
            phonetic_form: phonetic_form.into(),
        }
    }

    /// Exact, case-sensitive comparison against either written form.
    pub fn accepts(&self, answer: &str) -> bool {
        answer == self.script_form || answer == self.phonetic_form
    }

    /// "漢字 [かな]" or just the one form when both are the same.
    pub fn answer_display(&self) -> String {
        if self.script_form == self.phonetic_form {
            self.script_form.clone()
        } else {
            format!("{} [{}]", self.script_form, self.phonetic_form)
        }
    }
}

/// The live, shrinking sequence of words for a session.
///
/// Entries are addressed by position. Removing an entry shifts every later
/// entry down by one, so an index is only stable until the next removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPool {
    entries: Vec<WordEntry>,
}

impl WordPool {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WordEntry> {
        self.entries.get(index)
    }

    /// Remove by position, shifting later entries down.
    pub fn remove(&mut self, index: usize) -> Option<WordEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, word: &WordEntry) -> bool {
        self.entries.contains(word)
    }
}

impl From<Vec<WordEntry>> for WordPool {
    fn from(entries: Vec<WordEntry>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<WordEntry> for WordPool {
    fn from_iter<I: IntoIterator<Item = WordEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WordPool {
        WordPool::new(vec![
            WordEntry::new("water", "水", "みず"),
            WordEntry::new("fire", "火", "ひ"),
            WordEntry::new("tree", "木", "き"),
        ])
    }

    #[test]
    fn test_accepts_either_form() {
        let w = WordEntry::new("water", "水", "みず");
        assert!(w.accepts("水"));
        assert!(w.accepts("みず"));
        assert!(!w.accepts("water"));
    }

    #[test]
    fn test_accepts_is_exact() {
        let w = WordEntry::new("hello", "Hallo", "hallo");
        assert!(!w.accepts(" Hallo"));
        assert!(!w.accepts("Hallo "));
        assert!(!w.accepts("HALLO"));
        assert!(w.accepts("hallo"));
    }

    #[test]
    fn test_answer_display() {
        assert_eq!(WordEntry::new("water", "水", "みず").answer_display(), "水 [みず]");
        assert_eq!(WordEntry::new("yes", "はい", "はい").answer_display(), "はい");
    }

    #[test]
    fn test_remove_shifts_later_entries() {
        let mut pool = sample();
        let removed = pool.remove(0).unwrap();

        assert_eq!(removed.english_prompt, "water");
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(0).unwrap().english_prompt, "fire");
        assert_eq!(pool.get(1).unwrap().english_prompt, "tree");
        assert!(pool.get(2).is_none());
    }

    #[test]
    fn test_remove_out_of_bounds() {
        let mut pool = sample();
        assert!(pool.remove(3).is_none());
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let w = WordEntry::new("water", "水", "みず");
        let pool: WordPool = vec![w.clone(), w.clone()].into_iter().collect();
        assert_eq!(pool.len(), 2);
    }
}
