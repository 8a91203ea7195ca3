//! Rule-based support assistant.
//!
//! Every intent scores 10 points per pattern found in the normalized
//! message. The highest score wins; on a tie the intent listed first keeps
//! the lead. With no match at all a generic response is used. The concrete
//! response is drawn from the winning set with the engine's RNG, so tests
//! can seed it.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::knowledge::{DEFAULT_RESPONSES, INTENTS, QUICK_ACTIONS, WELCOME};

pub const BOT_NAME: &str = "Luna";

/// Turns (user and bot messages) remembered as conversation context.
pub const CONTEXT_LIMIT: usize = 10;

const MATCH_SCORE: u32 = 10;

const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{300}'..='\u{36f}';

/// Lowercase, strip accents and trim. `"¿Cómo ESTÁS?"` → `"¿como estas?"`.
/// Works on precomposed letters and on base letter + combining mark input.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .map(fold_accent)
        .collect::<String>()
        .trim()
        .to_string()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub category: String,
    pub patterns: Vec<String>,
    pub responses: Vec<String>,
    normalized: Vec<String>,
}

impl Intent {
    pub fn new<P, R>(category: impl Into<String>, patterns: P, responses: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let normalized = patterns.iter().map(|p| normalize(p)).collect();
        Self {
            category: category.into(),
            patterns,
            responses: responses.into_iter().map(Into::into).collect(),
            normalized,
        }
    }

    /// Score against an already-normalized message.
    pub fn score(&self, normalized_message: &str) -> u32 {
        self.normalized
            .iter()
            .filter(|p| !p.is_empty() && normalized_message.contains(p.as_str()))
            .count() as u32
            * MATCH_SCORE
    }
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    intents: Vec<Intent>,
    defaults: Vec<String>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new(
            INTENTS
                .iter()
                .map(|d| Intent::new(d.category, d.patterns.iter().copied(), d.responses.iter().copied())),
            DEFAULT_RESPONSES.iter().copied(),
        )
    }
}

impl KnowledgeBase {
    pub fn new<I, D>(intents: I, defaults: D) -> Self
    where
        I: IntoIterator<Item = Intent>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            intents: intents.into_iter().collect(),
            defaults: defaults.into_iter().map(Into::into).collect(),
        }
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    pub fn intent(&self, category: &str) -> Option<&Intent> {
        self.intents.iter().find(|i| i.category == category)
    }

    /// Winning intent and its score; `None` when nothing matches.
    pub fn best_match(&self, message: &str) -> Option<(&Intent, u32)> {
        let normalized = normalize(message);
        let mut best: Option<(&Intent, u32)> = None;
        for intent in &self.intents {
            let score = intent.score(&normalized);
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((intent, score));
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub message: String,
    pub at: DateTime<Utc>,
}

pub struct ChatbotEngine<R = StdRng> {
    knowledge: KnowledgeBase,
    rng: R,
    context: VecDeque<Turn>,
}

impl<R> std::fmt::Debug for ChatbotEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatbotEngine")
            .field("intents", &self.knowledge.intents.len())
            .field("context", &self.context.len())
            .finish()
    }
}

impl Default for ChatbotEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatbotEngine<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(KnowledgeBase::default(), StdRng::from_entropy())
    }
}

impl<R: Rng> ChatbotEngine<R> {
    pub fn with_rng(knowledge: KnowledgeBase, rng: R) -> Self {
        Self {
            knowledge,
            rng,
            context: VecDeque::with_capacity(CONTEXT_LIMIT + 1),
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Greeting shown when the conversation opens.
    pub fn welcome(&self) -> &'static str {
        WELCOME
    }

    /// Suggested first messages.
    pub fn quick_actions(&self) -> &'static [&'static str] {
        QUICK_ACTIONS
    }

    /// Answer `message`, recording both sides in the context.
    pub fn reply(&mut self, message: &str) -> String {
        self.remember(Speaker::User, message);
        let response = self.respond(message);
        self.remember(Speaker::Bot, &response);
        response
    }

    /// Like [`reply`](Self::reply), but blank input is ignored.
    pub fn send(&mut self, message: &str) -> Option<String> {
        if message.trim().is_empty() {
            return None;
        }
        Some(self.reply(message))
    }

    /// Pick a response without touching the context.
    pub fn respond(&mut self, message: &str) -> String {
        let picked = match self.knowledge.best_match(message) {
            Some((intent, score)) => {
                tracing::debug!(category = %intent.category, score, "intent matched");
                intent.responses.choose(&mut self.rng)
            }
            None => None,
        };
        picked
            .or_else(|| self.knowledge.defaults.choose(&mut self.rng))
            .cloned()
            .unwrap_or_default()
    }

    /// Last turns, oldest first.
    pub fn context(&self) -> impl Iterator<Item = &Turn> {
        self.context.iter()
    }

    pub fn clear_context(&mut self) {
        self.context.clear();
    }

    /// Simulated typing delay, 300 to 800 ms.
    pub fn thinking_time(&mut self) -> Duration {
        Duration::from_millis(300 + self.rng.gen_range(0..500))
    }

    fn remember(&mut self, speaker: Speaker, message: &str) {
        self.context.push_back(Turn {
            speaker,
            message: message.to_string(),
            at: Utc::now(),
        });
        while self.context.len() > CONTEXT_LIMIT {
            self.context.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ChatbotEngine<StdRng> {
        ChatbotEngine::with_rng(KnowledgeBase::default(), StdRng::seed_from_u64(7))
    }

    #[test]
    fn normalization_strips_accents_and_case() {
        assert_eq!(normalize("  ¿Cómo ESTÁS?  "), "¿como estas?");
        assert_eq!(normalize("Compañía"), "compania");
        assert_eq!(normalize("Psicólogo"), "psicologo");
        assert_eq!(normalize("QUIE\u{301}N ERES"), "quien eres");
        assert_eq!(normalize("compan\u{303}i\u{301}a"), "compania");
    }

    #[test]
    fn decomposed_input_matches_like_precomposed() {
        let kb = KnowledgeBase::default();
        let composed = kb.best_match("QUIÉN ERES").map(|(i, s)| (i.category.clone(), s));
        let decomposed = kb.best_match("QUIE\u{301}N ERES").map(|(i, s)| (i.category.clone(), s));
        assert_eq!(decomposed, composed);
        assert_eq!(decomposed.unwrap().0, "about_bot");
    }

    #[test]
    fn default_knowledge_base_is_complete() {
        let kb = KnowledgeBase::default();
        assert_eq!(kb.intents().len(), 18);
        assert_eq!(kb.defaults().len(), 5);
        assert!(kb.intents().iter().all(|i| !i.responses.is_empty()));
    }

    #[test]
    fn higher_score_wins() {
        let kb = KnowledgeBase::default();
        // "solo" and "nadie" and "hablar" beat the single "solo" of emotional support
        let (intent, score) = kb.best_match("Me siento solo, nadie quiere hablar").unwrap();
        assert_eq!(intent.category, "loneliness");
        assert_eq!(score, 30);
    }

    #[test]
    fn ties_keep_the_first_intent() {
        let kb = KnowledgeBase::default();
        let (intent, score) = kb.best_match("solo").unwrap();
        assert_eq!(intent.category, "emotional_support");
        assert_eq!(score, 10);
    }

    #[test]
    fn accented_patterns_match_plain_input() {
        let kb = KnowledgeBase::default();
        assert_eq!(kb.best_match("busco un psicologo").unwrap().0.category, "professionals");
        assert_eq!(kb.best_match("QUIÉN ERES").unwrap().0.category, "about_bot");
    }

    #[test]
    fn unmatched_messages_use_defaults() {
        let mut bot = engine();
        assert!(bot.knowledge().best_match("xyz").is_none());
        let answer = bot.respond("xyz");
        assert!(DEFAULT_RESPONSES.contains(&answer.as_str()));
    }

    #[test]
    fn context_keeps_the_last_ten_turns() {
        let mut bot = engine();
        for i in 0..8 {
            bot.reply(&format!("mensaje {i}"));
        }
        let turns: Vec<_> = bot.context().collect();
        assert_eq!(turns.len(), CONTEXT_LIMIT);
        assert_eq!(turns[0].message, "mensaje 3");
        assert_eq!(turns[0].speaker, Speaker::User);
        assert_eq!(turns[9].speaker, Speaker::Bot);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut bot = engine();
        assert_eq!(bot.send("   "), None);
        assert_eq!(bot.context().count(), 0);
    }

    #[test]
    fn thinking_time_is_bounded() {
        let mut bot = engine();
        for _ in 0..50 {
            let t = bot.thinking_time();
            assert!(t >= Duration::from_millis(300) && t < Duration::from_millis(800));
        }
    }
}
