//! End-to-end dialogue scenarios against real session and record stores.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use recipebot_core::{
    Action, BotError, BotResult, Command, InboundEvent, Keyboard, Recipe, Tag, UserId,
};
use recipebot_dialogue::{DialogueEngine, Replies};
use recipebot_security::Allowlist;
use recipebot_session::{ManualClock, Session, SessionStore, Step, TtlSessionStore};
use recipebot_store::{InMemoryRecordRepository, JsonRecordRepository, RecipeBook, RecordRepository};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const USER: i64 = 1001;
const STRANGER: i64 = 666;
const TTL: Duration = Duration::from_secs(600);

/// Repository whose first `failures` appends fail with a write error.
struct FlakyRepository {
    inner: InMemoryRecordRepository,
    failures: AtomicUsize,
    attempts: AtomicUsize,
}

impl FlakyRepository {
    fn failing(failures: usize) -> Self {
        Self {
            inner: InMemoryRecordRepository::new(),
            failures: AtomicUsize::new(failures),
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RecordRepository for FlakyRepository {
    async fn append(&self, recipe: Recipe) -> BotResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(BotError::PersistenceWrite {
                path: PathBuf::from("recipes.json"),
                source: std::io::Error::other("disk full"),
            });
        }
        self.inner.append(recipe).await
    }

    async fn load(&self) -> BotResult<RecipeBook> {
        self.inner.load().await
    }
}

struct Harness {
    engine: DialogueEngine,
    sessions: Arc<TtlSessionStore>,
    clock: Arc<ManualClock>,
}

fn harness(recipes: Arc<dyn RecordRepository>) -> Harness {
    let clock = Arc::new(ManualClock::new());
    let sessions = Arc::new(TtlSessionStore::with_clock(TTL, clock.clone()));
    let engine = DialogueEngine::new(
        Allowlist::new([USER]),
        sessions.clone(),
        recipes,
        Replies::new("gp"),
    );
    Harness {
        engine,
        sessions,
        clock,
    }
}

// --- Happy path ---

#[tokio::test]
async fn test_full_flow_persists_recipe() {
    let repo = Arc::new(InMemoryRecordRepository::new());
    let h = harness(repo.clone());
    let user = UserId(USER);

    let replies = h
        .engine
        .handle(&InboundEvent::text(USER, "http://example.com/recipe"))
        .await;
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[1].text, "Please send a title...");
    assert_eq!(
        h.sessions.get(user),
        Some(Session::start("http://example.com/recipe"))
    );

    let replies = h
        .engine
        .handle(&InboundEvent::text(USER, "Tarte aux pommes"))
        .await;
    assert_eq!(replies[1].keyboard, Some(Keyboard::TagMenu));
    assert_eq!(
        h.sessions.get(user),
        Some(Session::AwaitingTag {
            url: "http://example.com/recipe".into(),
            title: "Tarte aux pommes".into(),
        })
    );

    let replies = h
        .engine
        .handle(&InboundEvent::action(USER, Action::Tag(Tag::Dessert)))
        .await;
    assert_eq!(replies[0].keyboard, Some(Keyboard::Confirm));
    assert_eq!(h.sessions.get(user).unwrap().tag(), Some(Tag::Dessert));

    let replies = h
        .engine
        .handle(&InboundEvent::action(USER, Action::Validate))
        .await;
    assert_eq!(replies[0].text, "Ok, new entry added");
    assert!(h.sessions.get(user).is_none());

    let book = repo.load().await.unwrap();
    assert_eq!(book.len(), 1);
    let recipe = &book.recipes[0];
    assert_eq!(recipe.url, "http://example.com/recipe");
    assert_eq!(recipe.title, "Tarte aux pommes");
    assert_eq!(recipe.tag_labels(), ["Dessert".to_string()]);
    assert_eq!(recipe.sub_title.as_deref(), Some(""));
    assert_eq!(recipe.filename.as_deref(), Some(""));
}

#[tokio::test]
async fn test_full_flow_writes_json_document() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("recipes.json");
    let h = harness(Arc::new(JsonRecordRepository::new(&path)));

    for event in [
        InboundEvent::text(USER, "http://example.com/recipe"),
        InboundEvent::text(USER, "Tarte aux pommes"),
        InboundEvent::action(USER, Action::Tag(Tag::Dessert)),
        InboundEvent::action(USER, Action::Validate),
    ] {
        h.engine.handle(&event).await;
    }

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(
        raw,
        r#"{"recipes":[{"title":"Tarte aux pommes","subTitle":"","url":"http://example.com/recipe","filename":"","tags":["Dessert"]}]}"#
    );
}

// --- Failures ---

#[tokio::test]
async fn test_failed_write_keeps_session_and_retry_succeeds() {
    let repo = Arc::new(FlakyRepository::failing(1));
    let h = harness(repo.clone());
    let user = UserId(USER);

    for event in [
        InboundEvent::text(USER, "http://example.com/recipe"),
        InboundEvent::text(USER, "Tarte aux pommes"),
        InboundEvent::action(USER, Action::Tag(Tag::Dessert)),
    ] {
        h.engine.handle(&event).await;
    }
    let before = h.sessions.get(user).unwrap();

    let replies = h
        .engine
        .handle(&InboundEvent::action(USER, Action::Validate))
        .await;
    assert_eq!(
        replies[0].text,
        "There was an error with file writing. Please contact gp"
    );
    assert_eq!(h.sessions.get(user), Some(before));
    assert_eq!(h.sessions.get(user).unwrap().step(), Step::AwaitingConfirmation);

    let replies = h
        .engine
        .handle(&InboundEvent::action(USER, Action::Validate))
        .await;
    assert_eq!(replies[0].text, "Ok, new entry added");
    assert!(h.sessions.get(user).is_none());
    assert_eq!(repo.attempts.load(Ordering::SeqCst), 2);
    assert_eq!(repo.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_corrupt_document_keeps_session() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("recipes.json");
    tokio::fs::write(&path, "not json").await.unwrap();
    let h = harness(Arc::new(JsonRecordRepository::new(&path)));

    for event in [
        InboundEvent::text(USER, "http://x"),
        InboundEvent::text(USER, "Soupe"),
        InboundEvent::action(USER, Action::Tag(Tag::Starter)),
    ] {
        h.engine.handle(&event).await;
    }
    let replies = h
        .engine
        .handle(&InboundEvent::action(USER, Action::Validate))
        .await;
    assert!(replies[0].text.contains("Please contact gp"));
    assert!(h.sessions.get(UserId(USER)).is_some());
    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "not json");
}

#[tokio::test]
async fn test_expiry_before_tag_reports_missing_session() {
    let h = harness(Arc::new(InMemoryRecordRepository::new()));
    h.engine.handle(&InboundEvent::text(USER, "http://x")).await;
    h.engine.handle(&InboundEvent::text(USER, "Soupe")).await;

    h.clock.advance(TTL + Duration::from_secs(1));

    let replies = h
        .engine
        .handle(&InboundEvent::action(USER, Action::Tag(Tag::Dessert)))
        .await;
    assert_eq!(
        replies[0].text,
        "There was an error. Please send an url to begin"
    );
    assert!(h.sessions.get(UserId(USER)).is_none());
}

// --- Authorization ---

#[tokio::test]
async fn test_unauthorized_sender_never_touches_state() {
    let repo = Arc::new(InMemoryRecordRepository::new());
    let h = harness(repo.clone());

    let events = [
        InboundEvent::text(STRANGER, "http://x"),
        InboundEvent::text(STRANGER, "Soupe"),
        InboundEvent::action(STRANGER, Action::Tag(Tag::Dessert)),
        InboundEvent::action(STRANGER, Action::Validate),
        InboundEvent::action(STRANGER, Action::Cancel),
        InboundEvent::command(STRANGER, Command::Start),
    ];
    for event in events {
        let replies = h.engine.handle(&event).await;
        assert_eq!(replies.len(), 1);
        assert_eq!(
            replies[0].text,
            "There was an error with your id (666). Please contact gp"
        );
    }

    assert!(h.sessions.is_empty());
    assert!(repo.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthorized_sender_cannot_cancel_others() {
    let h = harness(Arc::new(InMemoryRecordRepository::new()));
    h.engine.handle(&InboundEvent::text(USER, "http://x")).await;
    h.engine
        .handle(&InboundEvent::action(STRANGER, Action::Cancel))
        .await;
    assert!(h.sessions.get(UserId(USER)).is_some());
}

// --- Ordering & idempotence ---

#[tokio::test]
async fn test_tag_unreachable_without_title() {
    let h = harness(Arc::new(InMemoryRecordRepository::new()));
    let user = UserId(USER);

    // Tag before anything.
    h.engine
        .handle(&InboundEvent::action(USER, Action::Tag(Tag::Dessert)))
        .await;
    assert!(h.sessions.get(user).is_none());

    // URL, then a tag tap: consumed as the title, never skipping a step.
    h.engine.handle(&InboundEvent::text(USER, "http://x")).await;
    h.engine
        .handle(&InboundEvent::action(USER, Action::Tag(Tag::Dessert)))
        .await;
    assert_eq!(h.sessions.get(user).unwrap().step(), Step::AwaitingTag);
    assert_eq!(h.sessions.get(user).unwrap().title(), Some("Dessert"));
}

#[tokio::test]
async fn test_cancel_twice_is_idempotent() {
    let h = harness(Arc::new(InMemoryRecordRepository::new()));
    h.engine.handle(&InboundEvent::text(USER, "http://x")).await;

    let first = h
        .engine
        .handle(&InboundEvent::action(USER, Action::Cancel))
        .await;
    assert!(h.sessions.get(UserId(USER)).is_none());
    let second = h
        .engine
        .handle(&InboundEvent::action(USER, Action::Cancel))
        .await;
    assert!(h.sessions.get(UserId(USER)).is_none());
    assert_eq!(first, second);
    assert_eq!(first[0].text, "Ok, please send another url to start again");
}

#[tokio::test]
async fn test_start_command_resets_nothing() {
    let h = harness(Arc::new(InMemoryRecordRepository::new()));
    h.engine.handle(&InboundEvent::text(USER, "http://x")).await;
    let replies = h
        .engine
        .handle(&InboundEvent::command(USER, Command::Start))
        .await;
    assert_eq!(replies[0].text, "Please send an url to begin");
    assert_eq!(h.sessions.get(UserId(USER)), Some(Session::start("http://x")));
}

#[tokio::test]
async fn test_sequential_validations_append_in_order() {
    let repo = Arc::new(InMemoryRecordRepository::new());
    let h = harness(repo.clone());

    for (url, title) in [("http://a", "A"), ("http://b", "B")] {
        for event in [
            InboundEvent::text(USER, url),
            InboundEvent::text(USER, title),
            InboundEvent::action(USER, Action::Tag(Tag::MainCourse)),
            InboundEvent::action(USER, Action::Validate),
        ] {
            h.engine.handle(&event).await;
        }
    }

    let titles: Vec<String> = repo
        .load()
        .await
        .unwrap()
        .recipes
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["A".to_string(), "B".to_string()]);
}

#[tokio::test]
async fn test_users_progress_independently() {
    let clock = Arc::new(ManualClock::new());
    let sessions = Arc::new(TtlSessionStore::with_clock(TTL, clock));
    let engine = Arc::new(DialogueEngine::new(
        Allowlist::new([1, 2]),
        sessions.clone(),
        Arc::new(InMemoryRecordRepository::new()),
        Replies::default(),
    ));

    engine.handle(&InboundEvent::text(1, "http://one")).await;
    engine.handle(&InboundEvent::text(2, "http://two")).await;
    engine.handle(&InboundEvent::text(1, "One")).await;

    assert_eq!(sessions.get(UserId(1)).unwrap().step(), Step::AwaitingTag);
    assert_eq!(sessions.get(UserId(2)).unwrap().step(), Step::AwaitingTitle);
    assert_eq!(sessions.get(UserId(2)).unwrap().url(), "http://two");
}
