// tests/reward_editor_flow.rs

mod common;

use common::{reward_json, signed_in_state, ScriptedTransport};
use http::Method;
use promodash_common::models::ProbabilityBalance;
use promodash_common_ui::commands::reward::RewardEditor;
use promodash_common_ui::{CommandError, ToastLevel};

const REWARDS: &str = "campaigns/1/rewards/";

fn pizza_rewards() -> String {
    format!(
        "[{},{},{}]",
        reward_json(1, "$10 OFF", 15.0),
        reward_json(2, "Free Pizza", 20.0),
        reward_json(3, "No Prize", 65.0)
    )
}

#[tokio::test]
async fn pizza_rewards_are_balanced() {
    let transport = ScriptedTransport::new();
    transport.on(Method::GET, REWARDS, 200, &pizza_rewards());
    let state = signed_in_state(transport.clone()).await;

    let mut editor = RewardEditor::new(1, state.notifications.clone());
    let listed = editor.refresh(&state.client).await.unwrap();

    assert_eq!(listed.data.rewards.len(), 3);
    assert_eq!(listed.data.summary.total, 3);
    assert_eq!(listed.data.summary.unlimited, 3);
    assert_eq!(listed.data.summary.probability_label(), "100%");
    assert_eq!(listed.data.summary.balance(), ProbabilityBalance::Balanced);
    assert!(listed.warnings.is_empty());
}

#[tokio::test]
async fn out_of_range_probability_never_reaches_the_server() {
    let transport = ScriptedTransport::new();
    transport.on(Method::POST, REWARDS, 201, &reward_json(9, "Jackpot", 150.0));
    let state = signed_in_state(transport.clone()).await;

    let mut editor = RewardEditor::new(1, state.notifications.clone());
    let draft = editor.open_create();
    draft.set("name", "Jackpot").unwrap();
    draft.set("value", "$1000").unwrap();
    draft.set("probability", "150").unwrap();

    let err = editor.submit(&state.client).await.err().unwrap();
    match err {
        CommandError::Validation(errors) => {
            assert_eq!(errors.first("probability"), Some("Probability cannot exceed 100"))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(transport.requests().is_empty());
    assert_eq!(state.notifications.drain()[0].level, ToastLevel::Error);
}

#[tokio::test]
async fn server_field_errors_land_on_the_draft() {
    let transport = ScriptedTransport::new();
    transport.on(Method::GET, REWARDS, 200, &pizza_rewards());
    transport.on(
        Method::PATCH,
        "campaigns/1/rewards/2/",
        400,
        r#"{"value":["Ensure this field has no more than 50 characters."]}"#,
    );
    let state = signed_in_state(transport.clone()).await;

    let mut editor = RewardEditor::new(1, state.notifications.clone());
    editor.refresh(&state.client).await.unwrap();
    editor.open_edit(2).unwrap().set("description", "Any large pizza").unwrap();

    assert!(matches!(
        editor.submit(&state.client).await,
        Err(CommandError::Validation(_))
    ));
    let draft = editor.draft().expect("dialog stays open");
    assert_eq!(
        draft.errors.first("value"),
        Some("Ensure this field has no more than 50 characters.")
    );
    assert_eq!(transport.count(Method::PATCH, "campaigns/1/rewards/2/"), 1);
}

#[tokio::test]
async fn delete_needs_confirmation_and_refetches() {
    let transport = ScriptedTransport::new();
    transport.on(Method::GET, REWARDS, 200, &pizza_rewards());
    transport.on(
        Method::GET,
        REWARDS,
        200,
        &format!("[{},{}]", reward_json(1, "$10 OFF", 15.0), reward_json(3, "No Prize", 65.0)),
    );
    transport.on(Method::DELETE, "campaigns/1/rewards/2/", 204, "");
    let state = signed_in_state(transport.clone()).await;

    let mut editor = RewardEditor::new(1, state.notifications.clone());
    editor.refresh(&state.client).await.unwrap();

    assert_eq!(editor.request_delete(2).unwrap().name, "Free Pizza");
    editor.cancel_delete();
    assert_eq!(transport.count(Method::DELETE, "campaigns/1/rewards/2/"), 0);
    assert_eq!(editor.rewards().len(), 3);

    editor.request_delete(2).unwrap();
    let deleted = editor.confirm_delete(&state.client).await.unwrap();
    assert_eq!(deleted.data, 2);
    assert_eq!(editor.rewards().len(), 2);
    assert_eq!(editor.summary().probability_label(), "80%");
    assert_eq!(deleted.warnings, vec!["Probabilities add up to 80%, not 100%".to_string()]);
    assert_eq!(transport.count(Method::GET, REWARDS), 2);
}
