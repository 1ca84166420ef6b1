use crate::error::HeroBannerError;
use crate::service::{BannerOrder, CreateHeroBanner, HeroBannerService, UpdateHeroBanner};
use chrono::Utc;
use potli_common::models::HeroBanner;
use potli_db::{init_schemas, DbClient, Repository, SqlHeroBannerRepository};
use std::time::Duration;

pub(crate) async fn setup() -> (HeroBannerService, DbClient) {
    let db = DbClient::in_memory().await.expect("in-memory sqlite");
    init_schemas(&db).await.expect("schemas");
    (HeroBannerService::new(db.clone(), Duration::from_secs(300)), db)
}

pub(crate) fn banner(image: &str) -> CreateHeroBanner {
    CreateHeroBanner {
        image_url: format!("https://media.techpotli.com/{image}"),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_appends_to_the_end() {
    let (service, _) = setup().await;

    let first = service.create(banner("a.jpg")).await.unwrap();
    assert_eq!(first.sort_order, 0);
    assert!(first.is_active);
    assert!(first.id.starts_with("hb_"));

    let pinned = service
        .create(CreateHeroBanner {
            sort_order: Some(7),
            ..banner("b.jpg")
        })
        .await
        .unwrap();
    assert_eq!(pinned.sort_order, 7);

    let last = service.create(banner("c.jpg")).await.unwrap();
    assert_eq!(last.sort_order, 8);
}

#[tokio::test]
async fn test_create_requires_image_url() {
    let (service, _) = setup().await;
    let err = service
        .create(CreateHeroBanner::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HeroBannerError::Validation(ref m) if m == "image_url is required"));
}

#[tokio::test]
async fn test_list_admin_filters_by_activity() {
    let (service, _) = setup().await;
    service.create(banner("a.jpg")).await.unwrap();
    service
        .create(CreateHeroBanner {
            is_active: Some(false),
            ..banner("b.jpg")
        })
        .await
        .unwrap();

    assert_eq!(service.list_admin(None).await.unwrap().len(), 2);
    assert_eq!(service.list_admin(Some(true)).await.unwrap().len(), 1);
    let inactive = service.list_admin(Some(false)).await.unwrap();
    assert_eq!(inactive.len(), 1);
    assert!(!inactive[0].is_active);
}

#[tokio::test]
async fn test_active_list_is_cached_until_a_write() {
    let (service, db) = setup().await;
    service.create(banner("a.jpg")).await.unwrap();
    assert_eq!(service.list_active().await.unwrap().len(), 1);

    // Written behind the service's back: the cached list does not see it.
    let now = Utc::now();
    SqlHeroBannerRepository::new(db)
        .create(HeroBanner {
            id: "hb_direct".to_string(),
            title: None,
            image_url: "https://media.techpotli.com/direct.jpg".to_string(),
            redirect_url: None,
            is_active: true,
            sort_order: 5,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
    assert_eq!(service.list_active().await.unwrap().len(), 1);

    // Any write through the service invalidates.
    let hidden = service
        .create(CreateHeroBanner {
            is_active: Some(false),
            ..banner("hidden.jpg")
        })
        .await
        .unwrap();
    assert_eq!(service.list_active().await.unwrap().len(), 2);

    service.toggle_active(&hidden.id, true).await.unwrap();
    let active = service.list_active().await.unwrap();
    assert_eq!(active.len(), 3);
    assert_eq!(active.last().unwrap().id, hidden.id);
}

#[tokio::test]
async fn test_update_applies_only_given_fields() {
    let (service, _) = setup().await;
    let created = service
        .create(CreateHeroBanner {
            title: Some("Sale".to_string()),
            redirect_url: Some("/sale".to_string()),
            ..banner("a.jpg")
        })
        .await
        .unwrap();

    let updated = service
        .update(
            &created.id,
            UpdateHeroBanner {
                redirect_url: Some(None),
                sort_order: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title.as_deref(), Some("Sale"));
    assert_eq!(updated.redirect_url, None);
    assert_eq!(updated.sort_order, 3);
    assert!(updated.updated_at >= created.updated_at);

    let err = service
        .update("hb_missing", UpdateHeroBanner::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HeroBannerError::NotFound(_)));
}

#[tokio::test]
async fn test_reorder_and_delete() {
    let (service, _) = setup().await;
    let a = service.create(banner("a.jpg")).await.unwrap();
    let b = service.create(banner("b.jpg")).await.unwrap();
    let c = service.create(banner("c.jpg")).await.unwrap();

    let reordered = service
        .reorder(vec![
            BannerOrder { id: c.id.clone(), sort_order: 0 },
            BannerOrder { id: a.id.clone(), sort_order: 1 },
            BannerOrder { id: b.id.clone(), sort_order: 2 },
        ])
        .await
        .unwrap();
    let ids: Vec<_> = reordered.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec![c.id.as_str(), a.id.as_str(), b.id.as_str()]);

    service.delete(&a.id).await.unwrap();
    service.delete(&a.id).await.unwrap();
    assert!(matches!(
        service.retrieve(&a.id).await.unwrap_err(),
        HeroBannerError::NotFound(_)
    ));
    assert_eq!(service.list_admin(None).await.unwrap().len(), 2);
}
