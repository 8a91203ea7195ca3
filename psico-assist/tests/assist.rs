use std::sync::Arc;

use psico_assist::chatbot::CONTEXT_LIMIT;
use psico_assist::triage::{DEFAULT_RECOMMENDATION, TRIAGE_PATH};
use psico_assist::{ChatbotEngine, KnowledgeBase, Speaker, TriageService, TriageTree};
use psico_core::errors::{ErrorKind, PsicoError};
use psico_core::session::keys;
use psico_core::{MemorySessionStore, Session, SessionStore};
use psico_http::{ApiClient, ClientConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer, store: Arc<MemorySessionStore>) -> ApiClient {
    let config = ClientConfig::for_host("bienestar-app.psicoadmin.xyz")
        .with_override(format!("{}/api", server.uri()));
    ApiClient::builder(config)
        .session(Session::new(store))
        .build()
        .unwrap()
}

#[tokio::test]
async fn submitting_a_walk_marks_triage_done() {
    let server = MockServer::start().await;
    let store = Arc::new(MemorySessionStore::with_entries([
        (keys::AUTH_TOKEN, "tok"),
        (keys::USER_TYPE, "patient"),
        (keys::USER, r#"{"id":3,"user_type":"patient","has_completed_triage":false}"#),
    ]));
    let api = client(&server, store.clone()).await;

    Mock::given(method("POST"))
        .and(path(format!("/api{TRIAGE_PATH}")))
        .and(header("authorization", "Token tok"))
        .and(body_json(json!({
            "answers": {"nodo1": "triste_o_sin_ganas", "nodo2": "algunos_dias"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "pre_diagnosis": "Posibles síntomas depresivos leves."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tree = TriageTree::default();
    let mut walk = tree.walk();
    walk.answer("triste_o_sin_ganas").unwrap();
    walk.answer("algunos_dias").unwrap();

    let session = api.session().clone();
    assert!(!session.triage_completed());

    let result = TriageService::new(api).submit_walk(&walk).await.unwrap();
    assert_eq!(result.pre_diagnosis(), "Posibles síntomas depresivos leves.");
    assert_eq!(result.recommendation(), DEFAULT_RECOMMENDATION);

    assert_eq!(store.get(keys::TRIAGE_COMPLETED).as_deref(), Some("true"));
    assert!(session.user().unwrap().has_completed_triage);
    assert!(session.triage_completed());
}

#[tokio::test]
async fn failed_submission_leaves_triage_pending() {
    let server = MockServer::start().await;
    let store = Arc::new(MemorySessionStore::with_entries([
        (keys::AUTH_TOKEN, "tok"),
        (keys::USER_TYPE, "patient"),
    ]));
    let api = client(&server, store.clone()).await;

    Mock::given(method("POST"))
        .and(path(format!("/api{TRIAGE_PATH}")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tree = TriageTree::default();
    let mut walk = tree.walk();
    walk.answer("bien_sin_cambios").unwrap();

    assert!(TriageService::new(api).submit_walk(&walk).await.is_err());
    assert!(store.get(keys::TRIAGE_COMPLETED).is_none());
}

#[tokio::test]
async fn unfinished_walk_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let api = client(&server, Arc::new(MemorySessionStore::new())).await;

    let tree = TriageTree::default();
    let mut walk = tree.walk();
    walk.answer("consumo_alcohol_o_sustancias").unwrap();
    let err = TriageService::new(api).submit_walk(&walk).await.unwrap_err();
    let err = PsicoError::normalize(err);
    assert_eq!(err.kind, ErrorKind::BadRequest);
    assert_eq!(err.message, "triage is not finished");
}

#[test]
fn crisis_phrases_reach_the_crisis_intent() {
    let kb = KnowledgeBase::default();
    let crisis = kb.intent("crisis").unwrap().clone();
    let mut bot = ChatbotEngine::with_rng(kb, StdRng::seed_from_u64(1));

    for message in ["Ya no quiero vivir", "quiero terminar todo"] {
        let answer = bot.reply(message);
        assert!(crisis.responses.contains(&answer), "{message}");
        assert!(answer.contains("1-888-628-9454"));
    }
}

#[test]
fn seeded_engines_answer_alike() {
    let mut a = ChatbotEngine::with_rng(KnowledgeBase::default(), StdRng::seed_from_u64(42));
    let mut b = ChatbotEngine::with_rng(KnowledgeBase::default(), StdRng::seed_from_u64(42));
    for message in ["hola", "estoy muy estresado", "¿cómo agendar una cita?", "gracias, adiós"] {
        assert_eq!(a.reply(message), b.reply(message));
    }
}

#[test]
fn conversation_context_alternates_and_is_bounded() {
    let mut bot = ChatbotEngine::with_rng(KnowledgeBase::default(), StdRng::seed_from_u64(3));
    for quick in bot.quick_actions().to_vec() {
        bot.reply(quick);
    }
    bot.reply("hola");
    bot.reply("chao");

    let turns: Vec<_> = bot.context().collect();
    assert_eq!(turns.len(), CONTEXT_LIMIT);
    assert!(turns
        .iter()
        .enumerate()
        .all(|(i, t)| t.speaker == if i % 2 == 0 { Speaker::User } else { Speaker::Bot }));
    assert_eq!(turns[CONTEXT_LIMIT - 2].message, "chao");
}
