#[cfg(test)]
mod tests {
    use crate::database::entity::{comment, post};
    use crate::database::postgres_repo::{PostgresCommentRepository, PostgresPostRepository};
    use blog_core::domain::Post;
    use blog_core::ports::{BaseRepository, CommentRepository, PostRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn post_model(title: &str, now: chrono::DateTime<chrono::Utc>) -> post::Model {
        post::Model {
            id: uuid::Uuid::new_v4(),
            author_id: uuid::Uuid::new_v4(),
            title: title.to_owned(),
            content: "Content".to_owned(),
            attachment: None,
            created_date: now.into(),
            published_date: Some(now.into()),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let now = chrono::Utc::now();
        let model = post_model("Test Post", now);
        let post_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.expect("post should be found");
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.published_date, Some(now));
    }

    #[tokio::test]
    async fn test_find_published_maps_rows_in_order() {
        let now = chrono::Utc::now();
        let newer = post_model("newer", now);
        let older = post_model("older", now - chrono::TimeDelta::hours(1));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![newer, older]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let posts = repo.find_published(now).await.unwrap();

        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_save_inserts_new_post() {
        let now = chrono::Utc::now();
        let model = post_model("Fresh", now);
        let post: Post = model.clone().into();

        // First query: existence check finds nothing. Second: INSERT .. RETURNING.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new(), vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let saved = repo.save(post.clone()).await.unwrap();

        assert_eq!(saved, post);
    }

    #[tokio::test]
    async fn test_find_comments_by_post_id() {
        let now = chrono::Utc::now();
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![comment::Model {
                id: uuid::Uuid::new_v4(),
                post_id,
                author: "Bob".to_owned(),
                text: "Nice post".to_owned(),
                created_date: now.into(),
            }]])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);
        let comments = repo.find_by_post_id(post_id).await.unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, "Bob");
        assert_eq!(comments[0].post_id, post_id);
    }
}
