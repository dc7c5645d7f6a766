//! Content service behaviour against the in-memory stores.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use blog_core::domain::{Actor, Post};
use blog_core::forms::{CommentForm, PostForm, PostSubmission, Upload};
use blog_core::ports::{
    AuthorOnly, BaseRepository, MediaStore, Notification, Notifier, NotifyError,
};
use blog_core::service::{COMMENT_NOTIFICATION_SUBJECT, Page};
use blog_core::{ContentService, DomainError};
use blog_infra::{InMemoryCommentRepository, InMemoryPostRepository, LocalMediaStore};

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        self.sent.lock().await.push(notification);
        Ok(())
    }
}

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _notification: Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection refused".to_string()))
    }
}

struct Harness {
    service: ContentService,
    posts: Arc<InMemoryPostRepository>,
    comments: Arc<InMemoryCommentRepository>,
    notifier: Arc<RecordingNotifier>,
    media: Arc<LocalMediaStore>,
}

impl Harness {
    fn new() -> Self {
        let posts = Arc::new(InMemoryPostRepository::new());
        let comments = Arc::new(InMemoryCommentRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let media = Arc::new(LocalMediaStore::new(
            std::env::temp_dir().join(format!("blog-test-media-{}", Uuid::new_v4())),
        ));
        let service = ContentService::new(
            posts.clone(),
            comments.clone(),
            media.clone(),
            notifier.clone(),
        );
        Self {
            service,
            posts,
            comments,
            notifier,
            media,
        }
    }

    fn with_notifier(
        notifier: Arc<dyn Notifier>,
    ) -> (
        ContentService,
        Arc<InMemoryPostRepository>,
        Arc<InMemoryCommentRepository>,
    ) {
        let posts = Arc::new(InMemoryPostRepository::new());
        let comments = Arc::new(InMemoryCommentRepository::new());
        let media = Arc::new(LocalMediaStore::new(std::env::temp_dir()));
        let service = ContentService::new(posts.clone(), comments.clone(), media, notifier);
        (service, posts, comments)
    }
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
}

fn user(name: &str) -> Actor {
    Actor::new(Uuid::new_v4(), name)
}

fn submission(title: &str, content: &str) -> Option<PostSubmission> {
    Some(PostSubmission {
        form: PostForm {
            title: title.to_string(),
            content: content.to_string(),
        },
        upload: None,
    })
}

fn comment(author: &str, text: &str) -> Option<CommentForm> {
    Some(CommentForm {
        author: author.to_string(),
        text: text.to_string(),
    })
}

async fn create(h: &Harness, actor: &Actor, title: &str, now: DateTime<Utc>) -> Uuid {
    h.service
        .create_post(Some(actor), submission(title, "body"), now)
        .await
        .unwrap()
        .redirect_target()
        .expect("valid post should redirect")
}

#[tokio::test]
async fn test_listing_includes_only_published_posts() {
    let h = Harness::new();
    let author = user("alice");

    let published = create(&h, &author, "published", at(8)).await;

    let mut scheduled = Post::new(author.user_id, "scheduled".into(), "x".into(), at(8));
    scheduled.published_date = Some(at(12));
    h.posts.save(scheduled).await.unwrap();

    let mut draft = Post::new(author.user_id, "draft".into(), "x".into(), at(8));
    draft.published_date = None;
    h.posts.save(draft).await.unwrap();

    let view = h.service.list_published(at(10)).await.unwrap();
    let ids: Vec<Uuid> = view.posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![published]);

    // Once its time has come the scheduled post shows up too.
    let view = h.service.list_published(at(12)).await.unwrap();
    assert_eq!(view.posts.len(), 2);
}

#[tokio::test]
async fn test_listing_orders_by_publish_date_descending() {
    let h = Harness::new();
    let author = user("alice");

    create(&h, &author, "first", at(1)).await;
    create(&h, &author, "third", at(3)).await;
    create(&h, &author, "second", at(2)).await;

    let view = h.service.list_published(at(4)).await.unwrap();
    let titles: Vec<&str> = view.posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_empty_listing_is_not_an_error() {
    let h = Harness::new();

    let view = h.service.list_published(at(4)).await.unwrap();
    assert!(view.posts.is_empty());
}

#[tokio::test]
async fn test_valid_comment_is_saved_exactly_once() {
    let h = Harness::new();
    let post_id = create(&h, &user("alice"), "Hello", at(1)).await;

    let page = h
        .service
        .view_post(post_id, comment("Bob", "Nice post"), at(2), "http://blog.test/")
        .await
        .unwrap();

    assert_eq!(page, Page::RedirectToPost(post_id));

    let stored = h.comments.all().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].post_id, post_id);
    assert_eq!(stored[0].created_date, at(2));
    assert_eq!(h.notifier.sent.lock().await.len(), 1);
}

#[tokio::test]
async fn test_comment_on_missing_post_is_not_found() {
    let h = Harness::new();
    let missing = Uuid::new_v4();

    let result = h
        .service
        .view_post(missing, comment("Bob", "Hi"), at(2), "http://blog.test/")
        .await;

    assert!(matches!(
        result,
        Err(DomainError::NotFound { entity_type: "Post", id }) if id == missing
    ));
    assert!(h.comments.all().await.is_empty());
    assert!(h.notifier.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_invalid_comment_rerenders_with_errors() {
    let h = Harness::new();
    let post_id = create(&h, &user("alice"), "Hello", at(1)).await;

    let page = h
        .service
        .view_post(post_id, comment("Bob", "   "), at(2), "http://blog.test/")
        .await
        .unwrap();

    let view = page.into_view().expect("invalid comment should render");
    assert_eq!(view.form.author, "Bob");
    assert!(view.errors.get("text").is_some());
    assert!(h.comments.all().await.is_empty());
    assert!(h.notifier.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_view_without_submission_lists_comments() {
    let h = Harness::new();
    let post_id = create(&h, &user("alice"), "Hello", at(1)).await;
    let url = "http://blog.test/";

    h.service
        .view_post(post_id, comment("Bob", "first"), at(2), url)
        .await
        .unwrap();
    h.service
        .view_post(post_id, comment("Carol", "second"), at(3), url)
        .await
        .unwrap();

    let view = h
        .service
        .view_post(post_id, None, at(4), url)
        .await
        .unwrap()
        .into_view()
        .unwrap();

    let authors: Vec<&str> = view.comments.iter().map(|c| c.author.as_str()).collect();
    assert_eq!(authors, vec!["Bob", "Carol"]);
    assert!(view.errors.is_empty());
    assert_eq!(view.form, CommentForm::default());
}

#[tokio::test]
async fn test_notification_failure_propagates_after_comment_saved() {
    let (service, posts, comments) = Harness::with_notifier(Arc::new(FailingNotifier));
    let post = Post::new(Uuid::new_v4(), "Hello".into(), "World".into(), at(1));
    let post_id = post.id;
    posts.save(post).await.unwrap();

    let result = service
        .view_post(post_id, comment("Bob", "Nice"), at(2), "http://blog.test/")
        .await;

    assert!(matches!(result, Err(DomainError::Notification(_))));
    assert_eq!(comments.all().await.len(), 1);
}

#[tokio::test]
async fn test_create_requires_authentication() {
    let h = Harness::new();

    let result = h
        .service
        .create_post(None, submission("Hello", "World"), at(1))
        .await;

    assert!(matches!(result, Err(DomainError::Unauthorized)));
    assert!(h.posts.is_empty().await);
}

#[tokio::test]
async fn test_create_stamps_author_and_publish_date() {
    let h = Harness::new();
    let author = user("alice");

    let post_id = create(&h, &author, "Hello", at(5)).await;

    let post = h.posts.find_by_id(post_id).await.unwrap().unwrap();
    assert_eq!(post.author_id, author.user_id);
    assert_eq!(post.published_date, Some(at(5)));
    assert_eq!(post.created_date, at(5));
}

#[tokio::test]
async fn test_create_form_pages() {
    let h = Harness::new();
    let author = user("alice");

    let blank = h
        .service
        .create_post(Some(&author), None, at(1))
        .await
        .unwrap()
        .into_view()
        .unwrap();
    assert_eq!(blank.post_id, None);
    assert!(blank.errors.is_empty());

    let invalid = h
        .service
        .create_post(Some(&author), submission("", "body"), at(1))
        .await
        .unwrap()
        .into_view()
        .unwrap();
    assert!(invalid.errors.get("title").is_some());
    assert_eq!(invalid.form.content, "body");
    assert!(h.posts.is_empty().await);
}

#[tokio::test]
async fn test_create_stores_attachment() {
    let h = Harness::new();
    let author = user("alice");

    let page = h
        .service
        .create_post(
            Some(&author),
            Some(PostSubmission {
                form: PostForm {
                    title: "With file".into(),
                    content: "see attached".into(),
                },
                upload: Some(Upload {
                    file_name: "diagram.png".into(),
                    bytes: vec![1, 2, 3],
                }),
            }),
            at(1),
        )
        .await
        .unwrap();

    let post_id = page.redirect_target().unwrap();
    let post = h.posts.find_by_id(post_id).await.unwrap().unwrap();
    let reference = post.attachment.expect("attachment reference");
    assert!(reference.ends_with("diagram.png"));

    let path = h.media.resolve(&reference).unwrap();
    assert_eq!(tokio::fs::read(path).await.unwrap(), vec![1, 2, 3]);
    tokio::fs::remove_dir_all(h.media.root()).await.unwrap();
}

#[tokio::test]
async fn test_edit_overwrites_fields_and_republishes() {
    let h = Harness::new();
    let alice = user("alice");
    let bob = user("bob");

    let post_id = create(&h, &alice, "Draft title", at(1)).await;

    let page = h
        .service
        .edit_post(Some(&bob), post_id, submission("Final title", "Final body"), at(6))
        .await
        .unwrap();
    assert_eq!(page, Page::RedirectToPost(post_id));

    let post = h.posts.find_by_id(post_id).await.unwrap().unwrap();
    assert_eq!(post.title, "Final title");
    assert_eq!(post.content, "Final body");
    assert_eq!(post.author_id, bob.user_id);
    assert_eq!(post.published_date, Some(at(6)));
    assert_eq!(post.created_date, at(1));
}

#[tokio::test]
async fn test_edit_with_identical_values_keeps_identity() {
    let h = Harness::new();
    let alice = user("alice");
    let post_id = create(&h, &alice, "Same", at(1)).await;
    let original = h.posts.find_by_id(post_id).await.unwrap().unwrap();

    h.service
        .edit_post(Some(&alice), post_id, submission("Same", "body"), at(2))
        .await
        .unwrap();

    let edited = h.posts.find_by_id(post_id).await.unwrap().unwrap();
    assert_eq!(edited.id, original.id);
    assert_eq!(edited.title, original.title);
    assert_eq!(edited.content, original.content);
    assert!(edited.published_date >= original.published_date);
}

#[tokio::test]
async fn test_edit_without_submission_prefills_form() {
    let h = Harness::new();
    let alice = user("alice");
    let post_id = create(&h, &alice, "Prefilled", at(1)).await;

    let view = h
        .service
        .edit_post(Some(&alice), post_id, None, at(2))
        .await
        .unwrap()
        .into_view()
        .unwrap();

    assert_eq!(view.post_id, Some(post_id));
    assert_eq!(view.form.title, "Prefilled");
    assert_eq!(view.form.content, "body");
}

#[tokio::test]
async fn test_edit_errors() {
    let h = Harness::new();
    let alice = user("alice");
    let post_id = create(&h, &alice, "Mine", at(1)).await;

    let unauthenticated = h
        .service
        .edit_post(None, post_id, submission("x", "y"), at(2))
        .await;
    assert!(matches!(unauthenticated, Err(DomainError::Unauthorized)));

    let missing = h
        .service
        .edit_post(Some(&alice), Uuid::new_v4(), submission("x", "y"), at(2))
        .await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));

    let invalid = h
        .service
        .edit_post(Some(&alice), post_id, submission("x", ""), at(2))
        .await
        .unwrap()
        .into_view()
        .unwrap();
    assert!(invalid.errors.get("content").is_some());

    let post = h.posts.find_by_id(post_id).await.unwrap().unwrap();
    assert_eq!(post.title, "Mine");
    assert_eq!(post.published_date, Some(at(1)));
}

#[tokio::test]
async fn test_stricter_policy_forbids_other_authors() {
    let h = Harness::new();
    let service = h.service.clone().with_policy(Arc::new(AuthorOnly));
    let alice = user("alice");
    let post_id = create(&h, &alice, "Mine", at(1)).await;

    let result = service
        .edit_post(Some(&user("mallory")), post_id, submission("Theirs", "x"), at(2))
        .await;
    assert!(matches!(result, Err(DomainError::Forbidden { .. })));

    let allowed = service
        .edit_post(Some(&alice), post_id, submission("Still mine", "x"), at(2))
        .await
        .unwrap();
    assert_eq!(allowed, Page::RedirectToPost(post_id));
}

#[tokio::test]
async fn test_hello_world_scenario() {
    let h = Harness::new();
    let u = user("u");
    let t1 = at(9);
    let t2 = t1 + TimeDelta::minutes(30);

    let post_id = h
        .service
        .create_post(Some(&u), submission("Hello", "World"), t1)
        .await
        .unwrap()
        .redirect_target()
        .unwrap();

    let listed = h.service.list_published(t2).await.unwrap();
    assert_eq!(listed.posts.len(), 1);
    assert_eq!(listed.posts[0].id, post_id);

    let url = format!("http://blog.test/posts/{}/", post_id);
    h.service
        .view_post(post_id, comment("Bob", "Nice post"), t2, &url)
        .await
        .unwrap();

    let stored = h.comments.all().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].post_id, post_id);
    assert_eq!(stored[0].author, "Bob");
    assert_eq!(stored[0].text, "Nice post");

    let sent = h.notifier.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, COMMENT_NOTIFICATION_SUBJECT);
    assert!(sent[0].body.contains("Hello"));
    assert!(sent[0].body.contains("Bob"));
    assert!(sent[0].body.ends_with(&url));
}

#[tokio::test]
async fn test_media_store_is_only_touched_for_valid_posts() {
    struct PanickingMedia;

    #[async_trait]
    impl MediaStore for PanickingMedia {
        async fn store(
            &self,
            _file_name: &str,
            _bytes: &[u8],
        ) -> Result<String, blog_core::error::RepoError> {
            panic!("invalid submissions must not store uploads");
        }
    }

    let posts = Arc::new(InMemoryPostRepository::new());
    let service = ContentService::new(
        posts.clone(),
        Arc::new(InMemoryCommentRepository::new()),
        Arc::new(PanickingMedia),
        Arc::new(RecordingNotifier::default()),
    );

    let page = service
        .create_post(
            Some(&user("alice")),
            Some(PostSubmission {
                form: PostForm::default(),
                upload: Some(Upload {
                    file_name: "x.bin".into(),
                    bytes: vec![0],
                }),
            }),
            at(1),
        )
        .await
        .unwrap();

    assert!(page.into_view().is_some());
    assert!(posts.is_empty().await);
}
