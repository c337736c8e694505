//! Draft/publish lifecycle and resolver properties.

#![allow(clippy::unwrap_used)]

use marketstall_core::{
    Business, BusinessId, Contact, Email, LifecycleState, Owner, ResolvedBusiness,
    SettingsOverride, Slug, StoreSettings, Theme, resolve_draft, resolve_effective,
};
use marketstall_integration_tests::{JONAS, MAYA, demo_state};
use marketstall_storefront::registry::{BusinessRepository, RegistryError};
use marketstall_storefront::state::AppState;

const GREEN_LEAF: BusinessId = BusinessId::new(1);
const HARBOR: BusinessId = BusinessId::new(2);
const COPPER_KETTLE: BusinessId = BusinessId::new(3);

fn get(state: &AppState, id: BusinessId) -> Business {
    state.registry().get_by_id(id).unwrap().unwrap()
}

fn tagline_patch(tagline: &str) -> SettingsOverride {
    SettingsOverride {
        settings: Some(StoreSettings {
            tagline: Some(tagline.to_string()),
            footer_text: Some(String::new()),
            nav_links: Vec::new(),
        }),
        ..SettingsOverride::default()
    }
}

fn insert_business(state: &AppState, id: i32, slug: &str, email: &str) -> Business {
    let mut business = Business::new(
        BusinessId::new(id),
        Slug::parse(slug).unwrap(),
        Owner {
            name: "Test Owner".to_string(),
            email: Email::parse(email).unwrap(),
        },
        "Test Shop",
    );
    business.theme = Theme::new("A", "B", "C");
    business.contact = Contact::new("shop@example.com", "555", "1 Main St");
    state.registry().insert(business.clone()).unwrap();
    business
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_unpublished_effective_view_is_baseline() {
    let state = demo_state();
    let mut unpublished: Vec<Business> = state
        .registry()
        .all()
        .unwrap()
        .into_iter()
        .filter(|b| !b.is_published)
        .collect();

    // An override that was never marked published must not leak either
    let mut stray = insert_business(&state, 50, "stray-override", "stray@example.com");
    stray.published = Some(tagline_patch("Not yet"));
    unpublished.push(stray);

    assert!(unpublished.len() >= 3);
    for business in &unpublished {
        assert_eq!(
            resolve_effective(business),
            ResolvedBusiness::baseline(business),
            "{} leaked an override",
            business.slug
        );
    }
}

#[tokio::test]
async fn test_publish_moves_draft_atomically() {
    let state = demo_state();
    let before = get(&state, COPPER_KETTLE);
    let draft = before.draft.clone().unwrap();
    assert!(!draft.is_empty());

    let outcome = state.publishing().publish(COPPER_KETTLE, None).await.unwrap();
    assert!(outcome.is_published());

    let after = get(&state, COPPER_KETTLE);
    assert_eq!(after.published, Some(draft));
    assert!(after.is_published);
    assert!(after.draft.is_none());
    assert!(after.published_at.is_some());
    assert!(after.check_invariants().is_ok());
}

#[tokio::test]
async fn test_publish_without_draft_changes_nothing() {
    let state = demo_state();

    for id in [GREEN_LEAF, HARBOR] {
        let before = get(&state, id);
        let outcome = state.publishing().publish(id, None).await.unwrap();
        assert!(!outcome.is_published());

        let after = get(&state, id);
        assert_eq!(after.published, before.published);
        assert_eq!(after.is_published, before.is_published);
        assert_eq!(after.draft, before.draft);
        assert_eq!(after.version, before.version);
    }
}

#[tokio::test]
async fn test_publish_with_empty_draft_changes_nothing() {
    let state = demo_state();
    state
        .publishing()
        .update_draft(HARBOR, SettingsOverride::default(), None)
        .unwrap();
    let before = get(&state, HARBOR);
    assert_eq!(before.lifecycle(), LifecycleState::NoDraftUnpublished);
    assert_eq!(before.version, 0);

    let outcome = state.publishing().publish(HARBOR, None).await.unwrap();
    assert!(!outcome.is_published());
    assert!(!get(&state, HARBOR).is_published);
    assert_eq!(get(&state, HARBOR).published, before.published);
}

#[test]
fn test_discard_twice_equals_once() {
    let state = demo_state();

    let once = state.publishing().discard_draft(COPPER_KETTLE, None).unwrap();
    let twice = state.publishing().discard_draft(COPPER_KETTLE, None).unwrap();

    assert!(once.draft.is_none());
    assert_eq!(once, twice);
    assert_eq!(twice.lifecycle(), LifecycleState::NoDraftUnpublished);
}

#[test]
fn test_partial_theme_replaces_whole_theme() {
    let state = demo_state();
    let business = insert_business(&state, 60, "shallow-merge", "shallow@example.com");

    let patch = SettingsOverride {
        theme: Some(Theme {
            primary: Some("Z".to_string()),
            ..Theme::default()
        }),
        ..SettingsOverride::default()
    };
    let updated = state
        .publishing()
        .update_draft(business.id, patch, None)
        .unwrap();

    let theme = resolve_draft(&updated).theme;
    assert_eq!(
        theme,
        Theme {
            primary: Some("Z".to_string()),
            secondary: None,
            accent: None,
        }
    );
    assert_ne!(theme, Theme::new("Z", "B", "C"));
    // Untouched fields still fall back
    assert_eq!(resolve_draft(&updated).contact, business.contact);
}

#[test]
fn test_owner_lookup_never_crosses_tenants() {
    let state = demo_state();
    insert_business(&state, 70, "second-jonas-shop", JONAS);
    insert_business(&state, 71, "someone-else", "else@example.com");

    for email in [MAYA, JONAS, "else@example.com", "nobody@example.com"] {
        let email = Email::parse(email).unwrap();
        for business in state.registry().businesses_for_owner(&email).unwrap() {
            assert_eq!(business.owner.email, email);
        }
    }

    let jonas = Email::parse(JONAS).unwrap();
    let ids: Vec<i32> = state
        .registry()
        .businesses_for_owner(&jonas)
        .unwrap()
        .iter()
        .map(|b| b.id.as_i32())
        .collect();
    assert_eq!(ids, vec![3, 70]);
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_draft_publish_discard_walkthrough() {
    let state = demo_state();
    let publishing = state.publishing();
    let baseline = get(&state, HARBOR);
    assert_eq!(baseline.lifecycle(), LifecycleState::NoDraftUnpublished);
    let baseline_tagline = baseline.settings.tagline.clone();

    // Draft a new tagline
    let x = publishing
        .update_draft(HARBOR, tagline_patch("New Tagline"), None)
        .unwrap();
    assert_eq!(
        resolve_draft(&x).settings.tagline.as_deref(),
        Some("New Tagline")
    );
    assert_eq!(resolve_effective(&x).settings.tagline, baseline_tagline);
    assert_eq!(x.lifecycle(), LifecycleState::DraftUnpublished);

    // Publish it
    let x = publishing.publish(HARBOR, None).await.unwrap().into_business();
    assert_eq!(
        resolve_effective(&x).settings.tagline.as_deref(),
        Some("New Tagline")
    );
    assert_eq!(resolve_draft(&x), ResolvedBusiness::baseline(&x));
    assert_eq!(x.lifecycle(), LifecycleState::PublishedNoDraft);
    let published_view = resolve_effective(&x);

    // Draft a contact change, then throw it away
    let contact_patch = SettingsOverride {
        contact: Some(Contact::new("new@x.com", "", "")),
        ..SettingsOverride::default()
    };
    let x = publishing.update_draft(HARBOR, contact_patch, None).unwrap();
    assert_eq!(x.lifecycle(), LifecycleState::PublishedWithDraft);
    assert_eq!(resolve_effective(&x), published_view);
    assert_eq!(
        resolve_draft(&x).contact.email.as_deref(),
        Some("new@x.com")
    );

    let x = publishing.discard_draft(HARBOR, None).unwrap();
    assert_eq!(resolve_effective(&x), published_view);
    assert_eq!(resolve_effective(&x).contact, baseline.contact);
    assert_eq!(resolve_draft(&x).contact, baseline.contact);
    assert_eq!(x.lifecycle(), LifecycleState::PublishedNoDraft);
}

// =============================================================================
// Unknown IDs and concurrent editors
// =============================================================================

#[tokio::test]
async fn test_unknown_id_is_reported_and_store_untouched() {
    let state = demo_state();
    let before = state.registry().all().unwrap();
    let ghost = BusinessId::new(404);
    let publishing = state.publishing();

    assert!(matches!(
        publishing.update_draft(ghost, tagline_patch("x"), None),
        Err(RegistryError::NotFound(_))
    ));
    assert!(matches!(
        publishing.publish(ghost, None).await,
        Err(RegistryError::NotFound(_))
    ));
    assert!(matches!(
        publishing.discard_draft(ghost, None),
        Err(RegistryError::NotFound(_))
    ));
    assert_eq!(state.registry().all().unwrap(), before);
}

#[test]
fn test_concurrent_editors_without_versions_all_land() {
    let state = demo_state();
    let publishing = state.publishing();

    std::thread::scope(|scope| {
        for n in 0..16 {
            scope.spawn(move || {
                publishing
                    .update_draft(HARBOR, tagline_patch(&format!("Edit {n}")), None)
                    .unwrap();
            });
        }
    });

    let business = get(&state, HARBOR);
    assert_eq!(business.version, 16);
    assert!(business.has_pending_draft());
}

#[test]
fn test_stale_editor_is_rejected() {
    let state = demo_state();
    let publishing = state.publishing();
    let seen = get(&state, HARBOR).version;

    publishing
        .update_draft(HARBOR, tagline_patch("First editor"), Some(seen))
        .unwrap();
    let second = publishing.update_draft(HARBOR, tagline_patch("Second editor"), Some(seen));

    assert!(matches!(second, Err(RegistryError::VersionConflict { .. })));
    assert_eq!(
        resolve_draft(&get(&state, HARBOR)).settings.tagline.as_deref(),
        Some("First editor")
    );
}
