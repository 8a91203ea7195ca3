//! Intake triage questionnaire.
//!
//! A small decision tree: the root question routes to one follow-up
//! question, and the follow-up's answer finishes the walk. The collected
//! answers (node id → option value) are posted once, after which the
//! session counts the triage as done.

use std::collections::BTreeMap;

use psico_core::errors::{PsicoError, PsicoResult};
use psico_http::ApiClient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ROOT_NODE: &str = "nodo1";
pub const TRIAGE_PATH: &str = "/clinical-history/triage/";

pub const DEFAULT_PRE_DIAGNOSIS: &str = "Análisis completado.";
pub const DEFAULT_RECOMMENDATION: &str = "Siempre puedes hablar con un profesional si lo necesitas.";

/// Where an option leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Node(String),
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageOption {
    pub text: String,
    pub value: String,
    pub next: Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageNode {
    pub question: String,
    pub options: Vec<TriageOption>,
}

impl TriageNode {
    pub fn option(&self, value: &str) -> Option<&TriageOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

#[derive(Debug, Clone)]
pub struct TriageTree {
    root: String,
    nodes: BTreeMap<String, TriageNode>,
}

fn node(question: &str, options: &[(&str, &str, Option<&str>)]) -> TriageNode {
    TriageNode {
        question: question.to_string(),
        options: options
            .iter()
            .map(|(text, value, next)| TriageOption {
                text: text.to_string(),
                value: value.to_string(),
                next: match next {
                    Some(id) => Next::Node(id.to_string()),
                    None => Next::Submit,
                },
            })
            .collect(),
    }
}

impl Default for TriageTree {
    fn default() -> Self {
        let nodes = [
            (
                ROOT_NODE,
                node(
                    "¿Cuál de las siguientes opciones describe mejor cómo te has sentido últimamente?",
                    &[
                        ("Triste o sin ganas de hacer cosas", "triste_o_sin_ganas", Some("nodo2")),
                        ("Ansioso, preocupado o con miedo", "ansioso_preocupado_o_con_miedo", Some("nodo3")),
                        (
                            "Irritable, con problemas para dormir o concentrarme",
                            "irritable_o_dificultad_dormir",
                            Some("nodo4"),
                        ),
                        ("Con conflictos personales o de pareja", "conflictos_personales_o_pareja", Some("nodo5")),
                        (
                            "Consumiendo más alcohol o sustancias de lo habitual",
                            "consumo_alcohol_o_sustancias",
                            Some("nodo6"),
                        ),
                        ("En general bien, sin cambios mayores", "bien_sin_cambios", None),
                    ],
                ),
            ),
            (
                "nodo2",
                node(
                    "¿Con qué frecuencia has perdido el interés o el placer en hacer cosas?",
                    &[
                        ("Casi todos los días", "casi_todos_los_dias", None),
                        ("Algunos días", "algunos_dias", None),
                        ("Rara vez", "rara_vez", None),
                    ],
                ),
            ),
            (
                "nodo3",
                node(
                    "¿Sientes que te preocupas constantemente por diferentes cosas?",
                    &[
                        ("Sí, constantemente y me cuesta controlarlo", "si_constantemente", None),
                        (
                            "A veces, especialmente en situaciones sociales o en público",
                            "a_veces_en_publico",
                            None,
                        ),
                        ("No realmente", "no_realmente", None),
                    ],
                ),
            ),
            (
                "nodo4",
                node(
                    "¿Cuál crees que es la fuente principal de tu estrés o irritabilidad?",
                    &[
                        ("El trabajo o los estudios", "trabajo_o_estudios", None),
                        ("La familia o las relaciones personales", "familia_o_relaciones", None),
                        ("No estoy seguro", "no_estoy_seguro", None),
                    ],
                ),
            ),
            (
                "nodo5",
                node(
                    "¿Tienes conflictos frecuentes con tu pareja u otras personas importantes para ti?",
                    &[
                        ("Sí, con frecuencia", "si_con_frecuencia", None),
                        ("A veces, pero lo normal", "a_veces", None),
                        ("No, rara vez", "no_rara_vez", None),
                    ],
                ),
            ),
            (
                "nodo6",
                node(
                    "¿Sientes que pierdes el control sobre tu consumo de alcohol o sustancias?",
                    &[
                        ("Sí, a menudo siento que no puedo parar", "si_pierdo_control", None),
                        ("A veces he consumido más de lo que quería", "a_veces_mas", None),
                        ("No, controlo mi consumo", "no_pierdo_control", None),
                    ],
                ),
            ),
        ];
        Self::new(ROOT_NODE, nodes.into_iter().map(|(id, n)| (id.to_string(), n)))
    }
}

impl TriageTree {
    pub fn new<I>(root: impl Into<String>, nodes: I) -> Self
    where
        I: IntoIterator<Item = (String, TriageNode)>,
    {
        Self {
            root: root.into(),
            nodes: nodes.into_iter().collect(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn node(&self, id: &str) -> Option<&TriageNode> {
        self.nodes.get(id)
    }

    /// Steps shown in the progress bar: one per node.
    pub fn total_steps(&self) -> usize {
        self.nodes.len()
    }

    pub fn walk(&self) -> TriageWalk<'_> {
        TriageWalk::new(self)
    }
}

/// What an answer did to the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Moved on to another question.
    Asking,
    /// No more questions; the answers are ready to submit.
    Complete,
}

/// One pass through a [`TriageTree`].
#[derive(Debug, Clone)]
pub struct TriageWalk<'a> {
    tree: &'a TriageTree,
    current: String,
    step: usize,
    answers: BTreeMap<String, String>,
    complete: bool,
}

impl<'a> TriageWalk<'a> {
    pub fn new(tree: &'a TriageTree) -> Self {
        Self {
            tree,
            current: tree.root.clone(),
            step: 1,
            answers: BTreeMap::new(),
            complete: false,
        }
    }

    pub fn current_id(&self) -> &str {
        &self.current
    }

    pub fn current(&self) -> Option<&'a TriageNode> {
        self.tree.node(&self.current)
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.tree.total_steps()
    }

    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Record the option `value` for the current question.
    pub fn answer(&mut self, value: &str) -> PsicoResult<Progress> {
        if self.complete {
            psico_core::bail_psico!(bad_request, "triage already answered");
        }
        let node = self.current().ok_or_else(|| {
            PsicoError::general_error(format!("triage node `{}` is missing", self.current)).into_anyhow()
        })?;
        let option = node.option(value).ok_or_else(|| {
            PsicoError::bad_request(format!("`{value}` is not an option of `{}`", self.current)).into_anyhow()
        })?;

        self.answers.insert(self.current.clone(), option.value.clone());
        match &option.next {
            Next::Submit => {
                self.complete = true;
                Ok(Progress::Complete)
            }
            Next::Node(id) => {
                self.current = id.clone();
                self.step += 1;
                Ok(Progress::Asking)
            }
        }
    }

    /// Start over from the first question. No-op on the first step.
    pub fn back(&mut self) {
        if self.step > 1 || self.complete {
            self.current = self.tree.root.clone();
            self.step = 1;
            self.answers.clear();
            self.complete = false;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Submission<'a> {
    answers: &'a BTreeMap<String, String>,
}

/// Pre-diagnosis returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    #[serde(default)]
    pub pre_diagnosis: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TriageResult {
    pub fn pre_diagnosis(&self) -> &str {
        self.pre_diagnosis
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_PRE_DIAGNOSIS)
    }

    pub fn recommendation(&self) -> &str {
        self.recommendation
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_RECOMMENDATION)
    }
}

#[derive(Debug, Clone)]
pub struct TriageService {
    client: ApiClient,
}

impl TriageService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Post the answers and mark the session's triage as done.
    pub async fn submit(&self, answers: &BTreeMap<String, String>) -> PsicoResult<TriageResult> {
        let result: Option<TriageResult> = self.client.post(TRIAGE_PATH, &Submission { answers }).await?;
        self.client.session().mark_triage_completed()?;
        tracing::info!(answered = answers.len(), "triage submitted");
        Ok(result.unwrap_or_default())
    }

    /// Submit a finished walk.
    pub async fn submit_walk(&self, walk: &TriageWalk<'_>) -> PsicoResult<TriageResult> {
        if !walk.is_complete() {
            psico_core::bail_psico!(bad_request, "triage is not finished");
        }
        self.submit(walk.answers()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tree_shape() {
        let tree = TriageTree::default();
        assert_eq!(tree.total_steps(), 6);
        let root = tree.node(ROOT_NODE).unwrap();
        assert_eq!(root.options.len(), 6);
        assert_eq!(root.option("bien_sin_cambios").unwrap().next, Next::Submit);
        for id in ["nodo2", "nodo3", "nodo4", "nodo5", "nodo6"] {
            let n = tree.node(id).unwrap();
            assert_eq!(n.options.len(), 3, "{id}");
            assert!(n.options.iter().all(|o| o.next == Next::Submit));
        }
    }

    #[test]
    fn two_answers_finish_the_walk() {
        let tree = TriageTree::default();
        let mut walk = tree.walk();
        assert_eq!(walk.answer("ansioso_preocupado_o_con_miedo").unwrap(), Progress::Asking);
        assert_eq!(walk.current_id(), "nodo3");
        assert_eq!(walk.step(), 2);
        assert_eq!(walk.answer("no_realmente").unwrap(), Progress::Complete);
        assert_eq!(walk.answers()["nodo1"], "ansioso_preocupado_o_con_miedo");
        assert_eq!(walk.answers()["nodo3"], "no_realmente");
        let again = PsicoError::normalize(walk.answer("no_realmente").unwrap_err());
        assert_eq!(again.kind, psico_core::errors::ErrorKind::BadRequest);
        assert_eq!(again.message, "triage already answered");
    }

    #[test]
    fn feeling_fine_finishes_at_once() {
        let tree = TriageTree::default();
        let mut walk = tree.walk();
        assert_eq!(walk.answer("bien_sin_cambios").unwrap(), Progress::Complete);
        assert_eq!(walk.answers().len(), 1);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let tree = TriageTree::default();
        let mut walk = tree.walk();
        assert!(walk.answer("rara_vez").is_err());
        assert_eq!(walk.step(), 1);
        assert!(walk.answers().is_empty());
    }

    #[test]
    fn back_resets_to_the_root() {
        let tree = TriageTree::default();
        let mut walk = tree.walk();
        walk.back();
        assert_eq!(walk.current_id(), ROOT_NODE);

        walk.answer("triste_o_sin_ganas").unwrap();
        walk.back();
        assert_eq!(walk.current_id(), ROOT_NODE);
        assert_eq!(walk.step(), 1);
        assert!(walk.answers().is_empty());
    }

    #[test]
    fn result_defaults() {
        let r = TriageResult::default();
        assert_eq!(r.pre_diagnosis(), DEFAULT_PRE_DIAGNOSIS);
        assert_eq!(r.recommendation(), DEFAULT_RECOMMENDATION);
    }
}
