use std::sync::Arc;

use quill_core::domain::{CreateCategory, CreatePost, PostListFilter, PostPatch};
use quill_core::{BlogServices, DomainError};
use quill_infra::InMemoryStore;

const LONG_BODY: &str = "<p>Rust makes it possible to write fast and reliable software with confidence.</p>";

fn services() -> BlogServices {
    BlogServices::new(Arc::new(InMemoryStore::new()).repositories())
}

fn draft(title: &str) -> CreatePost {
    CreatePost {
        title: title.to_string(),
        ..Default::default()
    }
}

async fn category(services: &BlogServices, name: &str) -> i32 {
    services
        .categories
        .create(CreateCategory {
            name: name.to_string(),
            description: Some(format!("All about {name}")),
        })
        .await
        .unwrap()
        .id
}

fn category_ids(detail: &quill_core::domain::PostDetail) -> Vec<i32> {
    let mut ids: Vec<i32> = detail.categories.iter().map(|c| c.id).collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn publishing_short_content_fails_but_draft_succeeds() {
    let services = services();

    let published = services
        .posts
        .create(CreatePost {
            title: "Hello World".to_string(),
            content: "<p>short</p>".to_string(),
            published: true,
            ..Default::default()
        })
        .await;
    assert!(matches!(published, Err(DomainError::Validation(_))));

    let saved = services
        .posts
        .create(CreatePost {
            title: "Hello World".to_string(),
            content: "<p>short</p>".to_string(),
            published: false,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(saved.post.slug, "hello-world");
    assert!(!saved.post.published);
    assert_eq!(saved.post.created_at, saved.post.updated_at);
}

#[tokio::test]
async fn duplicate_title_slug_conflicts() {
    let services = services();
    services.posts.create(draft("Hello World")).await.unwrap();

    let again = services.posts.create(draft("hello, world!")).await;

    assert!(matches!(again, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn invalid_image_url_is_rejected() {
    let services = services();

    let result = services
        .posts
        .create(CreatePost {
            image_url: Some("not-a-url".to_string()),
            ..draft("With Image")
        })
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn unknown_category_ids_are_rejected_without_writing() {
    let services = services();
    let rust = category(&services, "Rust").await;

    let result = services
        .posts
        .create(CreatePost {
            category_ids: vec![rust, 999],
            ..draft("Orphan Links")
        })
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert!(matches!(
        services.posts.get_by_slug("orphan-links").await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn duplicate_category_ids_collapse() {
    let services = services();
    let rust = category(&services, "Rust").await;

    let created = services
        .posts
        .create(CreatePost {
            category_ids: vec![rust, rust],
            ..draft("Twice")
        })
        .await
        .unwrap();

    assert_eq!(category_ids(&created), vec![rust]);
}

#[tokio::test]
async fn empty_category_list_clears_associations() {
    let services = services();
    let rust = category(&services, "Rust").await;
    let go = category(&services, "Go").await;
    let post = services
        .posts
        .create(CreatePost {
            category_ids: vec![rust, go],
            ..draft("Tagged")
        })
        .await
        .unwrap();
    assert_eq!(post.categories.len(), 2);

    services
        .posts
        .update(
            post.post.id,
            PostPatch {
                category_ids: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let reread = services.posts.get_by_id(post.post.id).await.unwrap();
    assert!(reread.categories.is_empty());
}

#[tokio::test]
async fn omitted_category_ids_leave_associations_untouched() {
    let services = services();
    let a = category(&services, "Alpha").await;
    let b = category(&services, "Beta").await;
    let c = category(&services, "Gamma").await;
    let post = services
        .posts
        .create(CreatePost {
            category_ids: vec![a],
            ..draft("Moving")
        })
        .await
        .unwrap();

    services
        .posts
        .update(
            post.post.id,
            PostPatch {
                category_ids: Some(vec![b, c]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let untouched = services
        .posts
        .update(post.post.id, PostPatch::default())
        .await
        .unwrap();

    assert_eq!(category_ids(&untouched), vec![b, c]);
    assert!(
        untouched
            .categories
            .iter()
            .all(|cat| cat.description.is_some())
    );
}

#[tokio::test]
async fn image_can_be_cleared_or_left_alone() {
    let services = services();
    let post = services
        .posts
        .create(CreatePost {
            image_url: Some("https://cdn.example.com/cover.png".to_string()),
            ..draft("Cover")
        })
        .await
        .unwrap();

    let retitled = services
        .posts
        .update(
            post.post.id,
            PostPatch {
                title: Some("Cover Story".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(retitled.post.slug, "cover-story");
    assert_eq!(
        retitled.post.image_url.as_deref(),
        Some("https://cdn.example.com/cover.png")
    );

    let cleared = services
        .posts
        .update(
            post.post.id,
            PostPatch {
                image_url: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.post.image_url, None);
}

#[tokio::test]
async fn update_refreshes_updated_at_and_keeps_created_at() {
    let services = services();
    let post = services.posts.create(draft("Timestamps")).await.unwrap();

    let touched = services
        .posts
        .update(post.post.id, PostPatch::default())
        .await
        .unwrap();

    assert_eq!(touched.post.created_at, post.post.created_at);
    assert!(touched.post.updated_at >= post.post.updated_at);
    assert!(touched.post.updated_at >= touched.post.created_at);
}

#[tokio::test]
async fn retitle_onto_another_post_conflicts_but_own_slug_is_fine() {
    let services = services();
    let first = services.posts.create(draft("First Post")).await.unwrap();
    services.posts.create(draft("Second Post")).await.unwrap();

    let clash = services
        .posts
        .update(
            first.post.id,
            PostPatch {
                title: Some("Second post!".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(clash, Err(DomainError::Conflict(_))));

    let same = services
        .posts
        .update(
            first.post.id,
            PostPatch {
                title: Some("FIRST post".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.post.slug, "first-post");
}

#[tokio::test]
async fn publishing_an_existing_draft_checks_the_merged_post() {
    let services = services();
    let post = services
        .posts
        .create(CreatePost {
            content: "<p>too short</p>".to_string(),
            ..draft("Draft")
        })
        .await
        .unwrap();

    let publish = PostPatch {
        published: Some(true),
        ..Default::default()
    };
    assert!(matches!(
        services.posts.update(post.post.id, publish.clone()).await,
        Err(DomainError::Validation(_))
    ));

    let published = services
        .posts
        .update(
            post.post.id,
            PostPatch {
                content: Some(LONG_BODY.to_string()),
                ..publish
            },
        )
        .await
        .unwrap();
    assert!(published.post.published);
}

#[tokio::test]
async fn update_missing_post_is_not_found() {
    let services = services();

    let result = services
        .posts
        .update(
            123,
            PostPatch {
                title: Some("Ghost".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn pagination_splits_pages_and_reports_totals() {
    let services = services();
    for n in 0..25 {
        services
            .posts
            .create(draft(&format!("Post number {n}")))
            .await
            .unwrap();
    }

    let page = services
        .posts
        .list(PostListFilter {
            page: Some(3),
            limit: Some(9),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.posts.len(), 7);
    assert_eq!(page.pagination.total, 25);
    assert_eq!(page.pagination.total_pages, 3);
    assert_eq!(page.pagination.page, 3);
    assert_eq!(page.pagination.limit, 9);

    let beyond = services
        .posts
        .list(PostListFilter {
            page: Some(4),
            limit: Some(9),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(beyond.posts.is_empty());
    assert_eq!(beyond.pagination.total_pages, 3);
}

#[tokio::test]
async fn listing_is_newest_first_and_filters_by_publish_state() {
    let services = services();
    let draft_post = services.posts.create(draft("Draft One")).await.unwrap();
    let live = services
        .posts
        .create(CreatePost {
            title: "Live One".to_string(),
            content: LONG_BODY.to_string(),
            published: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let all = services.posts.list(PostListFilter::default()).await.unwrap();
    let order: Vec<i32> = all.posts.iter().map(|p| p.post.id).collect();
    assert_eq!(order, vec![live.post.id, draft_post.post.id]);

    let published = services
        .posts
        .list(PostListFilter {
            published: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(published.pagination.total, 1);
    assert_eq!(published.posts[0].post.id, live.post.id);

    let drafts = services.posts.recent(Some(false), None).await.unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].post.id, draft_post.post.id);
}

#[tokio::test]
async fn limit_out_of_range_is_rejected() {
    let services = services();

    let result = services
        .posts
        .list(PostListFilter {
            limit: Some(101),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn delete_is_idempotent_and_removes_links() {
    let services = services();
    let rust = category(&services, "Rust").await;
    let post = services
        .posts
        .create(CreatePost {
            category_ids: vec![rust],
            ..draft("Short Lived")
        })
        .await
        .unwrap();

    assert_eq!(services.posts.delete(post.post.id).await.unwrap(), post.post.id);
    assert_eq!(services.posts.delete(post.post.id).await.unwrap(), post.post.id);

    assert!(matches!(
        services.posts.get_by_id(post.post.id).await,
        Err(DomainError::NotFound { .. })
    ));
    let counts = services.categories.list().await.unwrap();
    assert_eq!(counts[0].post_count, 0);
}

#[tokio::test]
async fn detail_carries_reading_metrics() {
    let services = services();
    let body = format!("<p>{}</p>", vec!["word"; 400].join(" "));

    let post = services
        .posts
        .create(CreatePost {
            content: body,
            ..draft("Long Read")
        })
        .await
        .unwrap();

    assert_eq!(post.metrics.word_count, 400);
    assert_eq!(post.metrics.reading_time, 2);
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let services = services();
    services.posts.create(draft("Only Post")).await.unwrap();

    let page = services
        .posts
        .list(PostListFilter {
            page: Some((1u64 << 61) + 1),
            limit: Some(9),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(page.posts.is_empty());
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.pagination.total_pages, 1);
    assert_eq!(page.pagination.page, (1u64 << 61) + 1);
}

#[tokio::test]
async fn list_items_carry_plain_text_excerpt() {
    let services = services();
    services
        .posts
        .create(CreatePost {
            content: "<p>Short <b>body</b></p>".to_string(),
            ..draft("Card")
        })
        .await
        .unwrap();

    let page = services.posts.list(PostListFilter::default()).await.unwrap();

    assert_eq!(page.posts[0].excerpt, "Short body");
}
