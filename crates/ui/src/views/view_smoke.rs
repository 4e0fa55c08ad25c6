use tutor_core::model::SessionPhase;

use crate::context::ChatStyle;
use crate::views::test_harness::{HarnessOptions, ViewKind, setup_view_harness};

fn learn_in(phase: SessionPhase) -> HarnessOptions {
    HarnessOptions {
        view: ViewKind::Learn,
        phase: Some(phase),
        selected_topic: Some(("so-thap-phan", "Số thập phân")),
        ..HarnessOptions::default()
    }
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_renders_form() {
    let mut harness = setup_view_harness(HarnessOptions {
        view: ViewKind::Login,
        ..HarnessOptions::default()
    })
    .await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Đăng nhập"), "missing title in {html}");
    assert!(html.contains("type=\"password\""), "missing password field in {html}");
    assert!(html.contains("Đăng ký"), "missing register link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn menu_view_lists_root_categories() {
    let mut harness = setup_view_harness(HarnessOptions::default()).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Chọn chủ đề"), "missing title in {html}");
    assert!(html.contains("Lớp 5"), "missing category in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn menu_view_shows_leaderboard_for_selected_topic() {
    let mut harness = setup_view_harness(HarnessOptions {
        selected_topic: Some(("so-thap-phan", "Số thập phân")),
        ..HarnessOptions::default()
    })
    .await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Minh"), "missing leaderboard entry in {html}");
    assert!(html.contains("🥇"), "missing medal in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn learn_view_restores_completed_phase() {
    let mut harness = setup_view_harness(learn_in(SessionPhase::Completed)).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Số thập phân"), "missing topic name in {html}");
    assert!(html.contains("Chúc mừng"), "missing summary in {html}");
    assert!(html.contains("Học lại từ đầu"), "missing restart button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn learn_view_starts_warmup_quiz() {
    let mut harness = setup_view_harness(learn_in(SessionPhase::Game)).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Câu 1/1"), "missing progress in {html}");
    assert!(html.contains("3 x 4 = ?"), "missing question in {html}");
    assert!(html.contains("Lan có 3 túi kẹo"), "missing scenario in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn learn_view_result_without_outcome_still_offers_practice() {
    let mut harness = setup_view_harness(learn_in(SessionPhase::GameResult)).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Độ chính xác"), "missing stats in {html}");
    assert!(html.contains("Bắt đầu luyện tập"), "missing continue button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn learn_view_opens_scaffolding_chat_with_welcome() {
    let mut harness = setup_view_harness(learn_in(SessionPhase::PracticeBasic)).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Chào em! Cùng đọc đề nhé."), "missing welcome in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn learn_view_opens_polya_chat_when_configured() {
    let mut harness = setup_view_harness(HarnessOptions {
        chat_style: ChatStyle::Polya,
        ..learn_in(SessionPhase::PracticeAdvanced)
    })
    .await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("24 bút"), "missing problem in {html}");
    assert!(html.contains("Bước 1/4"), "missing step counter in {html}");
    assert!(html.contains("Đề bài hỏi gì nhỉ?"), "missing welcome in {html}");
}
