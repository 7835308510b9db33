//! Session lifecycle integration tests

mod support;

use std::time::Duration;

use inventaire_app::commands;
use inventaire_domain::{InventaireError, Location};
use support::{draft, setup_test_context};

#[tokio::test]
async fn register_login_logout_round_trip() {
    let mut test = setup_test_context();

    commands::register_account(&test.ctx, "chef@chantier.fr", "secret1")
        .await
        .expect("register");
    assert!(!test.ctx.is_logged_in());

    commands::login(&mut test.ctx, "chef@chantier.fr", "secret1").await.expect("login");
    assert!(test.ctx.is_logged_in());

    // The session starts with the default category set
    let categories = commands::list_categories(&test.ctx).expect("categories");
    assert!(categories.contains(&"Visseuses".to_string()));

    commands::logout(&mut test.ctx).await.expect("logout");
    assert!(!test.ctx.is_logged_in());
}

#[tokio::test]
async fn logout_when_already_logged_out_is_a_no_op() {
    let mut test = setup_test_context();

    commands::logout(&mut test.ctx).await.expect("first logout");
    commands::logout(&mut test.ctx).await.expect("second logout");
    assert!(!test.ctx.is_logged_in());
}

#[tokio::test]
async fn commands_without_a_session_fail_with_auth_error() {
    let mut test = setup_test_context();

    let err = commands::render_frame(&mut test.ctx).unwrap_err();
    assert!(matches!(err, InventaireError::Auth(_)));

    let err = commands::save_item(&mut test.ctx, &draft("Perceuse", "2")).await.unwrap_err();
    assert!(matches!(err, InventaireError::Auth(_)));
}

#[tokio::test]
async fn wrong_password_leaves_no_session() {
    let mut test = setup_test_context();

    commands::register_account(&test.ctx, "chef@chantier.fr", "secret1")
        .await
        .expect("register");

    let err = commands::login(&mut test.ctx, "chef@chantier.fr", "wrong").await.unwrap_err();
    assert!(matches!(err, InventaireError::Auth(_)));
    assert!(!test.ctx.is_logged_in());
}

#[tokio::test]
async fn relogin_sees_previous_writes_and_resets_ui_state() {
    let mut test = setup_test_context();

    commands::register_account(&test.ctx, "chef@chantier.fr", "secret1")
        .await
        .expect("register");
    commands::login(&mut test.ctx, "chef@chantier.fr", "secret1").await.expect("login");

    commands::save_item(&mut test.ctx, &draft("Perceuse", "2")).await.expect("save");
    test.ctx
        .session_mut()
        .expect("session")
        .wait_for_items(Duration::from_secs(2), |items| items.len() == 1)
        .await
        .expect("snapshot");

    // Dirty the UI state before logging out
    commands::set_active_tab(&mut test.ctx, Location::Atelier).expect("tab");
    commands::set_search(&mut test.ctx, "perc").expect("search");

    commands::logout(&mut test.ctx).await.expect("logout");
    commands::login(&mut test.ctx, "chef@chantier.fr", "secret1").await.expect("relogin");

    let session = test.ctx.session_mut().expect("session");
    let items = session
        .wait_for_items(Duration::from_secs(2), |items| items.len() == 1)
        .await
        .expect("snapshot");
    assert_eq!(items[0].name, "Perceuse");

    // Fresh session, fresh UI state
    let state = session.controller.state();
    assert_eq!(state.active_tab, Location::Chantier);
    assert!(state.filters.search.is_empty());
    assert!(state.edit_target.is_none());
}
