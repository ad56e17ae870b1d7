// tests/campaign_form_flow.rs

mod common;

use common::{reward_json, signed_in_state, ScriptedTransport};
use http::Method;
use promodash_common::models::{CampaignAction, CampaignStatus};
use promodash_common_ui::commands::campaign::{CampaignFormController, FormOutcome, FormSection};
use promodash_common_ui::http::RequestBody;
use promodash_common_ui::preview::{PreviewBody, PALETTE};

const CAMPAIGN: &str = r##"{
    "id": 1,
    "name": "Summer Spin",
    "description": "Spin for a slice",
    "type": "spin_wheel",
    "status": "draft",
    "start_date": "2026-06-01T00:00:00Z",
    "end_date": "2026-08-31T00:00:00Z",
    "client": 3,
    "client_name": "Pizza Palace",
    "branding": {"logo": null, "show_logo": true, "primary_color": "#FF5733", "scratch_image": null, "show_dates": true},
    "qr_code": null
}"##;

async fn opened(transport: &std::sync::Arc<ScriptedTransport>) -> (promodash_common_ui::AppState, CampaignFormController) {
    transport.on(Method::GET, "campaigns/1/", 200, CAMPAIGN);
    transport.on(
        Method::GET,
        "campaigns/1/rewards/",
        200,
        &format!(
            "[{},{},{}]",
            reward_json(1, "$10 OFF", 15.0),
            reward_json(2, "Free Pizza", 20.0),
            reward_json(3, "No Prize", 65.0)
        ),
    );
    transport.on(Method::GET, "campaigns/1/form-fields/", 200, "[]");
    let state = signed_in_state(transport.clone()).await;
    let form = CampaignFormController::open(&state.client, 1, state.notifications.clone())
        .await
        .unwrap();
    (state, form)
}

#[tokio::test]
async fn open_loads_rewards_and_renders_wheel() {
    let transport = ScriptedTransport::new();
    let (_state, form) = opened(&transport).await;

    assert_eq!(form.title(), "Summer Spin (#1)");
    assert_eq!(form.rewards().unwrap().rewards().len(), 3);
    assert!(form.fields().unwrap().fields().is_empty());

    let preview = form.preview();
    assert_eq!(preview.header.dates.as_deref(), Some("2026-06-01 - 2026-08-31"));
    let PreviewBody::SpinWheel(segments) = preview.body else {
        panic!("expected a wheel");
    };
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[2].color, PALETTE[2]);
    assert!((segments[2].sweep_deg - 234.0).abs() < 1e-9);
}

#[tokio::test]
async fn save_patches_the_whole_campaign() {
    let transport = ScriptedTransport::new();
    let (state, mut form) = opened(&transport).await;
    transport.on(
        Method::PATCH,
        "campaigns/1/",
        200,
        &CAMPAIGN.replace("Summer Spin", "Summer Spin 2"),
    );

    form.goto(FormSection::Settings);
    form.set_field("name", "Summer Spin 2").unwrap();
    let saved = form.save(&state.client).await.unwrap();
    assert_eq!(saved.data.name, "Summer Spin 2");
    assert_eq!(form.section(), FormSection::Settings);

    let patch = transport
        .requests()
        .into_iter()
        .find(|r| r.method == Method::PATCH)
        .unwrap();
    match patch.body {
        RequestBody::Json(body) => {
            assert_eq!(body["name"], "Summer Spin 2");
            assert_eq!(body["type"], "spin_wheel");
            assert_eq!(body["client"], 3);
            assert_eq!(body["branding"]["primary_color"], "#FF5733");
        }
        other => panic!("expected JSON body, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_confirms_then_navigates_to_list() {
    let transport = ScriptedTransport::new();
    let (state, mut form) = opened(&transport).await;
    transport.on(Method::DELETE, "campaigns/1/", 204, "");

    form.request_delete().unwrap();
    assert!(form.cancel_delete());
    assert!(form.confirm_delete(&state.client).await.is_err());
    assert_eq!(transport.count(Method::DELETE, "campaigns/1/"), 0);

    form.request_delete().unwrap();
    let outcome = form.confirm_delete(&state.client).await.unwrap();
    assert_eq!(outcome.data, FormOutcome::NavigateToList);
    assert_eq!(transport.count(Method::DELETE, "campaigns/1/"), 1);
}

#[tokio::test]
async fn lifecycle_actions_post_to_action_endpoints() {
    let transport = ScriptedTransport::new();
    let (state, mut form) = opened(&transport).await;
    transport.on(
        Method::POST,
        "campaigns/1/activate/",
        200,
        &CAMPAIGN.replace(r#""status": "draft""#, r#""status": "active""#),
    );
    transport.on(Method::POST, "campaigns/1/refresh-qr/", 200, CAMPAIGN);

    let activated = form.run_action(&state.client, CampaignAction::Activate).await.unwrap();
    assert_eq!(activated.data.status, CampaignStatus::Active);
    assert!(activated.warnings.is_empty());
    assert!(form.offered_actions().contains(&CampaignAction::Pause));

    // not offered for the returned draft status, still sent
    form.run_action(&state.client, CampaignAction::RefreshQr).await.unwrap();
    let result = form.run_action(&state.client, CampaignAction::RefreshQr).await.unwrap();
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(transport.count(Method::POST, "campaigns/1/refresh-qr/"), 2);
}
