//! psico-assist: the patient-facing helpers that run on top of the client,
//! a rule-based support chatbot and the intake triage questionnaire.

pub mod chatbot;
mod knowledge;
pub mod triage;

pub use chatbot::{normalize, ChatbotEngine, Intent, KnowledgeBase, Speaker, Turn, BOT_NAME};
pub use triage::{Next, Progress, TriageNode, TriageOption, TriageResult, TriageService, TriageTree, TriageWalk};
