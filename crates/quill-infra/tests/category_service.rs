use std::sync::Arc;

use quill_core::domain::{CategoryPatch, CreateCategory, CreatePost, PostListFilter};
use quill_core::{BlogServices, DomainError};
use quill_infra::InMemoryStore;

fn services() -> BlogServices {
    BlogServices::new(Arc::new(InMemoryStore::new()).repositories())
}

fn named(name: &str) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        description: None,
    }
}

#[tokio::test]
async fn create_derives_slug_and_assigns_id() {
    let services = services();

    let category = services
        .categories
        .create(CreateCategory {
            name: "Rust Tips & Tricks".to_string(),
            description: Some("Idioms".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(category.slug, "rust-tips-tricks");
    assert_eq!(category.description.as_deref(), Some("Idioms"));
    assert_eq!(
        services.categories.get_by_id(category.id).await.unwrap(),
        category
    );
}

#[tokio::test]
async fn names_normalizing_to_same_slug_conflict() {
    let services = services();
    services.categories.create(named("Tech!")).await.unwrap();

    let second = services.categories.create(named("tech")).await;

    assert!(matches!(second, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn symbol_only_name_is_rejected() {
    let services = services();

    assert!(matches!(
        services.categories.create(named("!!!")).await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        services.categories.create(named("")).await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn rename_onto_other_category_conflicts_but_self_rename_succeeds() {
    let services = services();
    let rust = services.categories.create(named("Rust")).await.unwrap();
    services.categories.create(named("Go")).await.unwrap();

    let clash = services
        .categories
        .update(
            rust.id,
            CategoryPatch {
                name: Some("GO".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(clash, Err(DomainError::Conflict(_))));

    let same = services
        .categories
        .update(
            rust.id,
            CategoryPatch {
                name: Some("rust!".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.name, "rust!");
    assert_eq!(same.slug, "rust");
}

#[tokio::test]
async fn update_applies_only_provided_fields() {
    let services = services();
    let category = services
        .categories
        .create(CreateCategory {
            name: "Rust".to_string(),
            description: Some("Systems".to_string()),
        })
        .await
        .unwrap();

    let renamed = services
        .categories
        .update(
            category.id,
            CategoryPatch {
                name: Some("Rust Lang".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.slug, "rust-lang");
    assert_eq!(renamed.description.as_deref(), Some("Systems"));
    assert_eq!(renamed.created_at, category.created_at);

    let cleared = services
        .categories
        .update(
            category.id,
            CategoryPatch {
                name: None,
                description: Some(None),
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.name, "Rust Lang");
    assert_eq!(cleared.description, None);
}

#[tokio::test]
async fn update_missing_category_is_not_found() {
    let services = services();

    let result = services
        .categories
        .update(
            42,
            CategoryPatch {
                name: Some("Anything".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn lookups_of_missing_category_are_not_found() {
    let services = services();

    assert!(matches!(
        services.categories.get_by_id(1).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        services.categories.get_by_slug("missing").await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn list_is_sorted_by_name_with_post_counts() {
    let services = services();
    let web = services.categories.create(named("Web")).await.unwrap();
    let async_cat = services.categories.create(named("Async")).await.unwrap();
    services.categories.create(named("Embedded")).await.unwrap();

    for title in ["One", "Two"] {
        services
            .posts
            .create(CreatePost {
                title: title.to_string(),
                category_ids: vec![web.id, async_cat.id],
                ..Default::default()
            })
            .await
            .unwrap();
    }
    services
        .posts
        .create(CreatePost {
            title: "Three".to_string(),
            category_ids: vec![web.id],
            ..Default::default()
        })
        .await
        .unwrap();

    let listed = services.categories.list().await.unwrap();
    let summary: Vec<(&str, u64)> = listed
        .iter()
        .map(|c| (c.category.name.as_str(), c.post_count))
        .collect();

    assert_eq!(summary, vec![("Async", 2), ("Embedded", 0), ("Web", 3)]);
}

#[tokio::test]
async fn get_by_slug_embeds_posts_newest_first() {
    let services = services();
    let category = services.categories.create(named("Rust")).await.unwrap();

    let mut ids = Vec::new();
    for title in ["First", "Second", "Third"] {
        let post = services
            .posts
            .create(CreatePost {
                title: title.to_string(),
                image_url: Some("https://cdn.example.com/cover.png".to_string()),
                category_ids: vec![category.id],
                ..Default::default()
            })
            .await
            .unwrap();
        ids.push(post.post.id);
    }

    let found = services.categories.get_by_slug("rust").await.unwrap();
    let listed: Vec<i32> = found.posts.iter().map(|p| p.id).collect();
    ids.reverse();

    assert_eq!(found.category.id, category.id);
    assert_eq!(listed, ids);
    assert!(found.posts.iter().all(|p| p.image_url.is_some()));
}

#[tokio::test]
async fn delete_cascades_to_associations_and_is_idempotent() {
    let services = services();
    let doomed = services.categories.create(named("Doomed")).await.unwrap();
    let kept = services.categories.create(named("Kept")).await.unwrap();

    services
        .posts
        .create(CreatePost {
            title: "Linked".to_string(),
            category_ids: vec![doomed.id, kept.id],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(services.categories.delete(doomed.id).await.unwrap(), doomed.id);
    assert_eq!(services.categories.delete(doomed.id).await.unwrap(), doomed.id);

    let page = services
        .posts
        .list(PostListFilter::default())
        .await
        .unwrap();
    assert_eq!(page.posts.len(), 1);
    assert!(
        page.posts
            .iter()
            .flat_map(|p| &p.categories)
            .all(|c| c.id != doomed.id)
    );
    assert_eq!(page.posts[0].categories.len(), 1);
}

#[tokio::test]
async fn list_order_ignores_case() {
    let services = services();
    for name in ["banana", "Cherry", "Apple"] {
        services.categories.create(named(name)).await.unwrap();
    }

    let names: Vec<String> = services
        .categories
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.category.name)
        .collect();

    assert_eq!(names, vec!["Apple", "banana", "Cherry"]);
}
