use crate::todo::{Todo, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use uuid::{Builder, Uuid};

/// Source of ids and synthetic todos for a `TodoStore`.
pub trait TodoGenerator {
    fn next_id(&mut self) -> String;
    fn random_todo(&mut self) -> Todo;
}

const WORDS: &[&str] = &[
    "alpha", "budget", "call", "review", "draft", "garden", "invoice", "laundry", "meeting",
    "notes", "order", "package", "plan", "quarterly", "report", "schedule", "ticket", "update",
    "water", "plants", "email", "team", "fix", "bike", "book", "flight", "renew", "passport",
    "clean", "kitchen", "groceries", "backup", "server", "prepare", "slides", "walk", "dog",
    "pay", "rent", "pick", "up", "kids", "dentist", "appointment", "read", "chapter", "write",
    "summary", "sync", "with", "design", "refactor", "module", "deploy", "release", "test",
];

/// Random ids (UUID v4) and lorem-style placeholder content.
#[derive(Debug, Clone)]
pub struct RandomGenerator<R = StdRng> {
    rng: R,
}

impl RandomGenerator<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible ids and content for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = self.rng.gen_range(min_words..=max_words);
        let words: Vec<&str> = (0..count)
            .filter_map(|_| WORDS.choose(&mut self.rng).copied())
            .collect();
        let mut sentence = words.join(" ");
        if let Some(first) = sentence.get(..1) {
            let upper = first.to_uppercase();
            sentence.replace_range(..1, &upper);
        }
        sentence
    }

    fn paragraph(&mut self) -> String {
        let sentences = self.rng.gen_range(1..=3);
        (0..sentences)
            .map(|_| format!("{}.", self.sentence(4, 10)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<R: Rng> TodoGenerator for RandomGenerator<R> {
    fn next_id(&mut self) -> String {
        let uuid: Uuid = Builder::from_random_bytes(self.rng.gen()).into_uuid();
        uuid.to_string()
    }

    fn random_todo(&mut self) -> Todo {
        let title = self.sentence(2, 6);
        let description = self.paragraph();
        Todo {
            id: self.next_id(),
            title: truncate_chars(title, TITLE_MAX_LEN),
            description: truncate_chars(description, DESCRIPTION_MAX_LEN),
            completed: self.rng.gen(),
        }
    }
}

/// Cut `text` to at most `max` characters on a char boundary.
pub fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
    text
}
