use poplingo_types::{DictionaryEntry, FlashcardSide, StudyCard, StudyCommand};

/// Flashcard walk over a snapshot of the notebook
#[derive(Debug, Default)]
pub struct StudyDeck {
    entries: Vec<DictionaryEntry>,
    index: usize,
    side: FlashcardSide,
}

impl StudyDeck {
    pub fn new(entries: Vec<DictionaryEntry>) -> Self {
        Self {
            entries,
            index: 0,
            side: FlashcardSide::Front,
        }
    }

    /// Swap in a new snapshot, keeping the current card when it survived
    pub fn refresh(&mut self, entries: Vec<DictionaryEntry>) {
        let current = self.entries.get(self.index).map(|e| e.id);
        match current.and_then(|id| entries.iter().position(|e| e.id == id)) {
            Some(index) => self.index = index,
            None => {
                self.index = 0;
                self.side = FlashcardSide::Front;
            }
        }
        self.entries = entries;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<StudyCard> {
        self.entries.get(self.index).map(|entry| StudyCard {
            entry: entry.clone(),
            side: self.side,
            position: self.index + 1,
            total: self.entries.len(),
        })
    }

    pub fn apply(&mut self, command: StudyCommand) -> Option<StudyCard> {
        match command {
            StudyCommand::Next => self.next(),
            StudyCommand::Previous => self.previous(),
            StudyCommand::Flip => self.flip(),
        }
        self.current()
    }

    pub fn next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.entries.len();
        self.side = FlashcardSide::Front;
    }

    pub fn previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.index = (self.index + self.entries.len() - 1) % self.entries.len();
        self.side = FlashcardSide::Front;
    }

    pub fn flip(&mut self) {
        self.side = match self.side {
            FlashcardSide::Front => FlashcardSide::Back,
            FlashcardSide::Back => FlashcardSide::Front,
        };
    }
}

#[cfg(test)]
mod tests {
    use poplingo_types::{Definition, LanguagePair};

    use super::*;

    fn entry(term: &str) -> DictionaryEntry {
        DictionaryEntry::compose(
            term,
            &LanguagePair::new("English", "Spanish"),
            Definition {
                definition: term.to_uppercase(),
                phonetic: None,
                examples: Vec::new(),
                usage_note: String::new(),
            },
            None,
        )
    }

    fn deck() -> StudyDeck {
        StudyDeck::new(vec![entry("uno"), entry("dos"), entry("tres")])
    }

    #[test]
    fn test_empty_deck_has_no_card() {
        let mut deck = StudyDeck::new(Vec::new());
        assert!(deck.apply(StudyCommand::Next).is_none());
        assert!(deck.is_empty());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut deck = deck();

        let card = deck.apply(StudyCommand::Previous).unwrap();
        assert_eq!(card.entry.term, "tres");
        assert_eq!((card.position, card.total), (3, 3));

        let card = deck.apply(StudyCommand::Next).unwrap();
        assert_eq!(card.entry.term, "uno");
    }

    #[test]
    fn test_moving_resets_to_front() {
        let mut deck = deck();

        assert_eq!(deck.apply(StudyCommand::Flip).unwrap().side, FlashcardSide::Back);
        assert_eq!(deck.apply(StudyCommand::Next).unwrap().side, FlashcardSide::Front);
        assert_eq!(deck.apply(StudyCommand::Flip).unwrap().side, FlashcardSide::Back);
        assert_eq!(deck.apply(StudyCommand::Flip).unwrap().side, FlashcardSide::Front);
    }

    #[test]
    fn test_refresh_keeps_current_card() {
        let entries = vec![entry("uno"), entry("dos"), entry("tres")];
        let mut deck = StudyDeck::new(entries.clone());
        deck.next();
        deck.flip();

        let mut refreshed = vec![entry("cero")];
        refreshed.extend(entries.clone());
        deck.refresh(refreshed);

        let card = deck.current().unwrap();
        assert_eq!(card.entry.term, "dos");
        assert_eq!(card.side, FlashcardSide::Back);
        assert_eq!(card.position, 3);
    }

    #[test]
    fn test_refresh_after_removal_restarts() {
        let entries = vec![entry("uno"), entry("dos")];
        let mut deck = StudyDeck::new(entries.clone());
        deck.next();
        deck.flip();

        deck.refresh(vec![entries[0].clone()]);

        let card = deck.current().unwrap();
        assert_eq!(card.entry.term, "uno");
        assert_eq!(card.side, FlashcardSide::Front);
    }
}
