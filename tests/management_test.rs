mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{FakeApi, user};
use frontend::models::{Material, MaterialType, OptionLabel, Role, Upload};
use frontend::pages::{
    MaterialsPage, QuizBuilderPage, StudentDashboard, TeacherDashboard, TipsPage, UsersPage,
};
use frontend::storage::SessionStore;

fn material(id: i64, title: &str) -> Material {
    Material {
        id,
        material_type: MaterialType::Video,
        course_name: "Network Security".to_string(),
        material_title: title.to_string(),
        description: None,
        file_url: Some(format!("/uploads/{}.mp4", id)),
        course_image: None,
        created_at: None,
    }
}

fn yes(_: &str) -> bool {
    true
}

fn no(_: &str) -> bool {
    false
}

#[tokio::test]
async fn deleted_user_leaves_the_list() {
    let api = Arc::new(
        FakeApi::default()
            .with_user(1, "Admin", Role::Admin)
            .with_user(2, "Thato", Role::Student),
    );
    let mut page = UsersPage::new(api.clone());
    page.load().await;
    assert_eq!(page.users.len(), 2);

    assert!(!page.delete(2, &no).await.unwrap());
    assert_eq!(page.users.len(), 2);
    assert_eq!(api.delete_calls(), 0);

    assert!(page.delete(2, &yes).await.unwrap());
    assert!(page.users.iter().all(|u| u.id != 2));
    assert_eq!(api.delete_calls(), 1);
}

#[tokio::test]
async fn users_are_created_and_edited() {
    let api = Arc::new(FakeApi::default().with_user(1, "Admin", Role::Admin));
    let mut page = UsersPage::new(api.clone());
    page.load().await;

    page.form.full_name = "Kamohelo".into();
    page.form.email = "kamohelo@example.com".into();
    assert!(page.submit().await.is_err());
    assert_eq!(page.message.as_deref(), Some("Password is required."));

    page.form.password = "secret1".into();
    page.form.role = Role::Teacher;
    page.submit().await.unwrap();
    assert_eq!(page.message.as_deref(), Some("User added successfully!"));
    assert_eq!(page.users.len(), 2);

    page.edit(2).unwrap();
    assert_eq!(page.editing(), Some(2));
    assert!(page.form.password.is_empty());
    page.form.full_name = "Kamohelo M.".into();
    page.submit().await.unwrap();
    assert_eq!(page.message.as_deref(), Some("User updated successfully!"));
    assert_eq!(page.editing(), None);
    assert_eq!(page.users[1].full_name, "Kamohelo M.");
}

#[tokio::test]
async fn materials_are_prepended_and_removed_locally() {
    let api = Arc::new(FakeApi::default().with_material(material(1, "Firewalls")));
    let mut page = MaterialsPage::new(api.clone());
    page.load().await;

    page.form.course_name = "Network Security".into();
    page.form.material_title = "VPNs".into();
    page.form.material_type = MaterialType::Text;
    page.form.text_content = "A VPN encrypts traffic.".into();
    let created = page.submit().await.unwrap().id;
    assert_eq!(page.materials[0].id, created);
    assert_eq!(page.message.as_deref(), Some("Material added successfully!"));

    assert!(page.delete(1, &yes).await.unwrap());
    assert_eq!(page.materials.len(), 1);
    assert_eq!(page.materials[0].material_title, "VPNs");
}

#[tokio::test]
async fn invalid_material_is_not_sent() {
    let api = Arc::new(FakeApi::default());
    let mut page = MaterialsPage::new(api.clone());
    page.form.course_name = "Network Security".into();
    page.form.material_title = "Slides".into();
    page.form.material_type = MaterialType::Pdf;

    assert!(page.submit().await.is_err());
    assert_eq!(page.message.as_deref(), Some("Upload PDF"));
    assert!(api.materials.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_material_types_are_left_off_the_dashboard() {
    let mut audio = material(2, "Podcast");
    audio.material_type = MaterialType::Other;
    let api = Arc::new(
        FakeApi::default()
            .with_material(material(1, "Firewalls"))
            .with_material(audio),
    );
    let store = SessionStore::in_memory().await.unwrap();

    let mut dashboard = StudentDashboard::new(api, store);
    dashboard.load_materials().await;
    assert_eq!(dashboard.materials_error, None);
    assert_eq!(dashboard.videos.len(), 1);
    assert_eq!(dashboard.videos[0].material_title, "Firewalls");
    assert!(dashboard.readings.is_empty());
}

#[tokio::test]
async fn other_material_type_is_not_sent() {
    let api = Arc::new(FakeApi::default());
    let mut page = MaterialsPage::new(api.clone());
    page.form.course_name = "Network Security".into();
    page.form.material_title = "Podcast".into();
    page.form.material_type = MaterialType::Other;

    assert!(page.submit().await.is_err());
    assert_eq!(page.message.as_deref(), Some("Choose a material type"));
    assert!(api.materials.lock().unwrap().is_empty());
}

#[tokio::test]
async fn only_staff_may_delete_tips() {
    let api = Arc::new(FakeApi::default().with_tip(1, "Lock your phone"));
    let store = SessionStore::in_memory().await.unwrap();

    store.sign_in(&user(4, "Student", Role::Student)).await.unwrap();
    let mut page = TipsPage::new(api.clone(), store.clone());
    page.load().await.unwrap();
    assert!(!page.can_delete());
    assert!(page.delete(1, &yes).await.is_err());
    assert_eq!(api.delete_calls(), 0);

    store.sign_in(&user(2, "Teacher", Role::Teacher)).await.unwrap();
    let mut page = TipsPage::new(api.clone(), store);
    page.load().await.unwrap();
    assert!(page.delete(1, &yes).await.unwrap());
    assert!(page.tips.is_empty());
    assert_eq!(page.message.as_deref(), Some("Tip deleted successfully!"));
}

#[tokio::test]
async fn posted_tip_carries_author_and_week() {
    let api = Arc::new(FakeApi::default());
    let store = SessionStore::in_memory().await.unwrap();
    store.sign_in(&user(6, "Student", Role::Student)).await.unwrap();

    let mut page = TipsPage::new(api.clone(), store);
    page.load().await.unwrap();
    page.form.title = "Update your apps".into();
    page.form.content = "Patches fix known holes.".into();
    page.post().await.unwrap();

    assert_eq!(page.message.as_deref(), Some("Tip posted successfully!"));
    assert_eq!(page.tips.len(), 1);
    assert_eq!(page.tips[0].author_id, Some(6));
    assert!(page.tips[0].week.is_some_and(|w| (1..=53).contains(&w)));
    assert!(page.form.title.is_empty());
}

#[tokio::test]
async fn failed_reload_keeps_the_tip_success_message() {
    let api = Arc::new(FakeApi::default().with_tip(1, "Lock your phone"));
    let store = SessionStore::in_memory().await.unwrap();
    store.sign_in(&user(2, "Teacher", Role::Teacher)).await.unwrap();

    let mut page = TipsPage::new(api.clone(), store);
    page.load().await.unwrap();
    api.tips_unavailable.store(true, Ordering::SeqCst);

    page.form.title = "Update your apps".into();
    page.form.content = "Patches fix known holes.".into();
    page.post().await.unwrap();
    assert_eq!(page.message.as_deref(), Some("Tip posted successfully!"));
    assert_eq!(api.tips.lock().unwrap().len(), 2);

    assert!(page.delete(1, &yes).await.unwrap());
    assert_eq!(page.message.as_deref(), Some("Tip deleted successfully!"));
    assert!(page.tips.is_empty());

    page.load().await.unwrap();
    assert_eq!(page.message.as_deref(), Some("Failed to load tips."));
}

#[tokio::test]
async fn saved_quiz_resets_the_draft() {
    let api = Arc::new(FakeApi::default());
    let store = SessionStore::in_memory().await.unwrap();
    store.sign_in(&user(2, "Teacher", Role::Teacher)).await.unwrap();

    let mut page = QuizBuilderPage::new(api.clone(), store);
    page.draft.quiz_name = "Social Engineering".into();
    page.set_image(Upload::new("se.png", "image/png", vec![1, 2]));
    page.set_question(0, "Who may ask for your password?").unwrap();
    for (label, text) in OptionLabel::ALL.into_iter().zip(["Nobody", "IT", "Boss", "Friends"]) {
        page.set_option(0, label, text).unwrap();
    }
    page.set_correct(0, OptionLabel::A).unwrap();

    page.save().await.unwrap();
    assert_eq!(page.message.as_deref(), Some("Quiz saved successfully!"));
    assert!(page.draft.quiz_name.is_empty());
    assert_eq!(page.draft.questions.len(), 1);

    let created = api.created_quizzes.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].user_id, 2);
    assert_eq!(created[0].questions[0].correct, OptionLabel::A);
}

#[tokio::test]
async fn quiz_builder_caps_questions() {
    let api = Arc::new(FakeApi::default());
    let store = SessionStore::in_memory().await.unwrap();
    let mut page = QuizBuilderPage::new(api, store);
    for _ in 1..10 {
        page.add_question().unwrap();
    }
    assert!(page.add_question().is_err());
    assert_eq!(
        page.message.as_deref(),
        Some("You can only add a maximum of 10 questions.")
    );
}

#[tokio::test]
async fn students_export_as_quoted_csv() {
    let api = Arc::new(
        FakeApi::default()
            .with_user(1, "Lerato", Role::Student)
            .with_user(2, "Teacher", Role::Teacher),
    );
    let mut dashboard = TeacherDashboard::new(api);
    dashboard.load().await;
    assert_eq!(dashboard.total_students(), 1);

    let mut out = Vec::new();
    assert_eq!(dashboard.export_csv(&mut out).unwrap(), 1);
    let csv = String::from_utf8(out).unwrap();
    assert_eq!(
        csv,
        "ID,Full Name,Email,Status,Registration Date\n\"1\",\"Lerato\",\"lerato@example.com\",\"active\",\"\"\n"
    );
}
