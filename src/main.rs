mod console;

use std::io;
use std::sync::Arc;

use chrono::Local;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use frontend::api::{HttpPlatformApi, PlatformApi};
use frontend::config::Config;
use frontend::error::ClientError;
use frontend::models::{MaterialType, OptionLabel, Role, TIP_CATEGORIES, Upload};
use frontend::pages::auth::logout;
use frontend::pages::dashboard::ProgressPage;
use frontend::pages::{
    AdminDashboard, CertificatePage, LoginPage, MaterialsPage, OptionFeedback, ProfilePage,
    QuizBuilderPage, QuizPage, QuizPhase, RegisterPage, StudentDashboard, TeacherDashboard,
    TipsPage, UsersPage,
};
use frontend::router::{self, Route};
use frontend::storage::SessionStore;

use crate::console::{StdinConfirm, prompt, prompt_multiline, prompt_or};

const USAGE: &str = "usage: frontend <command>

  login | register | logout | whoami | profile
  quizzes | take-quiz <id> | certificate | materials | rate <id> <stars>
  tips | post-tip | delete-tip <id>
  students [--csv] | add-material | delete-material <id> | create-quiz
  users | add-user | edit-user <id> | delete-user <id> | stats | progress";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Login,
    Register,
    Logout,
    Whoami,
    Profile,
    Quizzes,
    TakeQuiz(i64),
    Certificate,
    Materials,
    Rate { material_id: i64, stars: u8 },
    Tips,
    PostTip,
    DeleteTip(i64),
    Students { csv: bool },
    AddMaterial,
    DeleteMaterial(i64),
    CreateQuiz,
    Users,
    AddUser,
    EditUser(i64),
    DeleteUser(i64),
    Stats,
    Progress,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, ClientError> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = match args.as_slice() {
            ["login"] => Command::Login,
            ["register"] => Command::Register,
            ["logout"] => Command::Logout,
            ["whoami"] => Command::Whoami,
            ["profile"] => Command::Profile,
            ["quizzes"] => Command::Quizzes,
            ["take-quiz", id] => Command::TakeQuiz(parse_id(id)?),
            ["certificate"] => Command::Certificate,
            ["materials"] => Command::Materials,
            ["rate", id, stars] => Command::Rate {
                material_id: parse_id(id)?,
                stars: stars
                    .parse()
                    .map_err(|_| ClientError::validation(format!("Not a star count: {}", stars)))?,
            },
            ["tips"] => Command::Tips,
            ["post-tip"] => Command::PostTip,
            ["delete-tip", id] => Command::DeleteTip(parse_id(id)?),
            ["students"] => Command::Students { csv: false },
            ["students", "--csv"] => Command::Students { csv: true },
            ["add-material"] => Command::AddMaterial,
            ["delete-material", id] => Command::DeleteMaterial(parse_id(id)?),
            ["create-quiz"] => Command::CreateQuiz,
            ["users"] => Command::Users,
            ["add-user"] => Command::AddUser,
            ["edit-user", id] => Command::EditUser(parse_id(id)?),
            ["delete-user", id] => Command::DeleteUser(parse_id(id)?),
            ["stats"] => Command::Stats,
            ["progress"] => Command::Progress,
            _ => return Err(ClientError::validation(USAGE)),
        };
        Ok(command)
    }

    fn route(&self) -> Route {
        match self {
            Command::Login => Route::Login,
            Command::Register => Route::Register,
            Command::Logout | Command::Whoami => Route::Home,
            Command::Profile => Route::UpdateProfile,
            Command::Quizzes | Command::Materials | Command::Rate { .. } => {
                Route::StudentDashboard
            }
            Command::TakeQuiz(id) => Route::TakeQuiz(*id),
            Command::Certificate => Route::Certificate,
            Command::Tips | Command::PostTip | Command::DeleteTip(_) => Route::Tips,
            Command::Students { .. } => Route::TeacherDashboard,
            Command::AddMaterial | Command::DeleteMaterial(_) => Route::Materials,
            Command::CreateQuiz => Route::ManageQuizzes,
            Command::Users | Command::AddUser | Command::EditUser(_) | Command::DeleteUser(_) => {
                Route::ManageUsers
            }
            Command::Stats => Route::AdminDashboard,
            Command::Progress => Route::ViewProgress,
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, ClientError> {
    raw.parse()
        .map_err(|_| ClientError::validation(format!("Not an id: {}", raw)))
}

struct App {
    api: Arc<dyn PlatformApi>,
    store: SessionStore,
    config: Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "frontend=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(2);
        }
    };

    let config = Config::new_from_env()?;
    let store = SessionStore::open(&config.session_db_url).await?;
    info!("using API at {}", config.api_origin);

    let app = App {
        api: Arc::new(HttpPlatformApi::new(config.clone())?),
        store: store.clone(),
        config,
    };

    let outcome = app.run(command).await;
    store.close().await;

    if let Err(e) = outcome {
        error!("command failed: {}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

impl App {
    async fn run(&self, command: Command) -> Result<(), ClientError> {
        let role = self.store.role().await?;
        router::authorize(command.route(), role)?;

        match command {
            Command::Login => self.login().await,
            Command::Register => self.register().await,
            Command::Logout => {
                let route = logout(&self.store).await?;
                println!("Logged out. Back to {}", route);
                Ok(())
            }
            Command::Whoami => self.whoami().await,
            Command::Profile => self.profile().await,
            Command::Quizzes => self.quizzes().await,
            Command::TakeQuiz(id) => self.take_quiz(id).await,
            Command::Certificate => {
                let page = CertificatePage::resolve(None, &self.store).await?;
                page.print(&mut io::stdout().lock())
            }
            Command::Materials => self.materials().await,
            Command::Rate { material_id, stars } => {
                let mut dashboard = StudentDashboard::new(self.api.clone(), self.store.clone());
                dashboard.rate(material_id, stars).await?;
                println!("Rated material {} with {} stars.", material_id, stars);
                Ok(())
            }
            Command::Tips => self.tips().await,
            Command::PostTip => self.post_tip().await,
            Command::DeleteTip(id) => {
                let mut page = TipsPage::new(self.api.clone(), self.store.clone());
                page.load().await?;
                let deleted = page.delete(id, &StdinConfirm).await;
                report(deleted, page.message.as_deref())
            }
            Command::Students { csv } => self.students(csv).await,
            Command::AddMaterial => self.add_material().await,
            Command::DeleteMaterial(id) => {
                let mut page = MaterialsPage::new(self.api.clone());
                page.load().await;
                let deleted = page.delete(id, &StdinConfirm).await;
                report(deleted, Some("Material deleted."))
            }
            Command::CreateQuiz => self.create_quiz().await,
            Command::Users => self.users().await,
            Command::AddUser => self.save_user(None).await,
            Command::EditUser(id) => self.save_user(Some(id)).await,
            Command::DeleteUser(id) => {
                let mut page = UsersPage::new(self.api.clone());
                page.load().await;
                let deleted = page.delete(id, &StdinConfirm).await;
                report(deleted, page.message.as_deref())
            }
            Command::Stats => self.stats().await,
            Command::Progress => {
                let mut page = ProgressPage::new(self.api.clone());
                page.load().await;
                if let Some(error) = &page.error {
                    println!("{}", error);
                }
                for row in &page.rows {
                    println!(
                        "{:<30} {:>3} quizzes  {:>3}%",
                        row.name, row.quizzes_completed, row.average
                    );
                }
                Ok(())
            }
        }
    }

    async fn login(&self) -> Result<(), ClientError> {
        let mut page = LoginPage::new(self.api.clone(), self.store.clone());
        page.email = prompt("Email")?;
        page.password = prompt("Password")?;
        let result = page.submit().await;
        if let Some(message) = &page.message {
            println!("{}", message);
        }
        let (_, route) = result?;
        println!("Next: {}", route);
        Ok(())
    }

    async fn register(&self) -> Result<(), ClientError> {
        let mut page = RegisterPage::new(self.api.clone());
        page.full_name = prompt("Full name")?;
        page.email = prompt("Email")?;
        page.password = prompt("Password")?;
        page.user_type = prompt_or("Role (student/teacher/admin)", "student")?
            .parse()
            .map_err(ClientError::Validation)?;
        let result = page.submit().await;
        if let Some(message) = &page.message {
            println!("{}", message);
        }
        result.map(|_| ())
    }

    async fn whoami(&self) -> Result<(), ClientError> {
        match (self.store.user_id().await?, self.store.role().await?) {
            (Some(id), Some(role)) => {
                let name = self.store.user_name().await?.unwrap_or_default();
                println!("{} (#{}) signed in as {}", name, id, role);
            }
            _ => println!("Not signed in."),
        }
        Ok(())
    }

    async fn profile(&self) -> Result<(), ClientError> {
        let mut page = ProfilePage::new(self.api.clone(), self.store.clone());
        page.load().await?;
        if let Some(message) = &page.message {
            println!("{}", message);
            return Ok(());
        }

        page.form.full_name = prompt_or("Full name", &page.form.full_name)?;
        page.form.email = prompt_or("Email", &page.form.email)?;
        page.form.password = prompt("New password (empty keeps the current one)")?;
        page.form.confirm_password = prompt("Confirm password")?;
        let picture = prompt("Profile picture path (optional)")?;
        if !picture.is_empty() {
            let upload = Upload::from_path(&picture).await?;
            println!("Selected {} ({})", upload.file_name, upload.human_size());
            page.attach_picture(upload)?;
        }

        let result = page.submit().await;
        if let Some(message) = &page.message {
            println!("{}", message);
        }
        result
    }

    async fn quizzes(&self) -> Result<(), ClientError> {
        let mut dashboard = StudentDashboard::new(self.api.clone(), self.store.clone());
        dashboard.load().await?;
        println!("Welcome, {}!", dashboard.student_name);
        if let Some(error) = &dashboard.quizzes_error {
            println!("{}", error);
        }
        for quiz in &dashboard.quizzes {
            println!("#{:<4} {}", quiz.id, quiz.quiz_name);
            if let Some(image) = &quiz.image_url {
                println!("      {}", self.config.asset_url(image));
            }
        }
        Ok(())
    }

    async fn take_quiz(&self, id: i64) -> Result<(), ClientError> {
        let mut page = QuizPage::new(self.api.clone(), self.store.clone(), id);
        page.load().await;
        if let QuizPhase::Error(message) = page.phase() {
            println!("{}", message);
            return Ok(());
        }

        loop {
            let questions = page.quiz().map(|q| q.questions.clone()).unwrap_or_default();
            if let Some(quiz) = page.quiz() {
                println!("{}\n{}\n", quiz.quiz_name, quiz.introduction);
            }

            for (index, question) in questions.iter().enumerate() {
                println!("{}. {}", index + 1, question.question_text);
                for option in &question.options {
                    println!("   {}) {}", option.option_label, option.option_text);
                }
                loop {
                    let answer = prompt("Answer")?;
                    let selected = match OptionLabel::parse(&answer) {
                        Some(label) => page.select(question.id, label),
                        None => Err(ClientError::validation("Choose A, B, C or D.")),
                    };
                    match selected {
                        Ok(()) => break,
                        Err(e) => println!("{}", e.user_message()),
                    }
                }
            }

            let submitted = page.submit().await;
            if let Some(message) = page.message() {
                println!("{}", message);
            }
            let score = submitted?;

            for (index, question) in questions.iter().enumerate() {
                let mark = match page.is_correct(question.id) {
                    Some(true) => "correct",
                    Some(false) => "wrong",
                    None => "-",
                };
                println!("{}. {}", index + 1, mark);
                for option in &question.options {
                    let note = match page.feedback(question.id, option.option_label) {
                        Some(OptionFeedback::Correct) => "  <- correct answer",
                        Some(OptionFeedback::YourAnswer) => "  <- your answer",
                        None => "",
                    };
                    println!("   {}) {}{}", option.option_label, option.option_text, note);
                }
            }
            println!("Score: {}", score);

            if let Some(certificate) = page.certificate() {
                println!("Perfect score! Your certificate:\n");
                CertificatePage::new(certificate).print(&mut io::stdout().lock())?;
                return Ok(());
            }

            let again = prompt("Retake the quiz? [y/N]")?;
            if !matches!(again.to_ascii_lowercase().as_str(), "y" | "yes") {
                return Ok(());
            }
            page.retake().await;
        }
    }

    async fn materials(&self) -> Result<(), ClientError> {
        let mut dashboard = StudentDashboard::new(self.api.clone(), self.store.clone());
        dashboard.load().await?;
        if let Some(error) = &dashboard.materials_error {
            println!("{}", error);
        }

        println!("Videos");
        for video in &dashboard.videos {
            println!(
                "  #{:<4} {} - {} [{} stars]",
                video.id,
                video.course_name,
                video.material_title,
                dashboard.rating(video.id)
            );
            if let Some(url) = &video.file_url {
                println!("        {}", self.config.asset_url(url));
            }
        }
        println!("Readings");
        let readings = dashboard.readings.clone();
        for reading in &readings {
            println!(
                "  #{:<4} {} - {} ({}) [{} stars]",
                reading.id,
                reading.course_name,
                reading.material_title,
                reading.material_type,
                dashboard.rating(reading.id)
            );
            if reading.material_type == MaterialType::Text {
                let text = dashboard.full_text(reading.id).await;
                println!("{}\n", text);
            } else if let Some(url) = &reading.file_url {
                println!("        {}", self.config.asset_url(url));
            }
        }
        Ok(())
    }

    async fn tips(&self) -> Result<(), ClientError> {
        let mut page = TipsPage::new(self.api.clone(), self.store.clone());
        page.load().await?;
        if let Some(message) = &page.message {
            println!("{}", message);
        }
        for tip in &page.tips {
            let week = tip.week.map(|w| format!("week {}", w)).unwrap_or_default();
            println!("#{:<4} [{}] {} {}", tip.id, tip.category, tip.title, week);
            println!("      {}", tip.content);
        }
        Ok(())
    }

    async fn post_tip(&self) -> Result<(), ClientError> {
        let mut page = TipsPage::new(self.api.clone(), self.store.clone());
        page.load().await?;
        page.form.title = prompt("Title")?;
        page.form.content = prompt_multiline("Tip")?;
        println!("Categories: {}", TIP_CATEGORIES.join(", "));
        page.form.category = prompt_or("Category", TIP_CATEGORIES[0])?;
        let result = page.post().await;
        if let Some(message) = &page.message {
            println!("{}", message);
        }
        result
    }

    async fn students(&self, csv: bool) -> Result<(), ClientError> {
        let mut dashboard = TeacherDashboard::new(self.api.clone());
        dashboard.load().await;
        if let Some(error) = &dashboard.error {
            println!("{}", error);
        }

        if csv {
            let file_name = TeacherDashboard::export_file_name(Local::now().date_naive());
            let mut file = std::fs::File::create(&file_name)?;
            let rows = dashboard.export_csv(&mut file)?;
            println!("Exported {} students to {}", rows, file_name);
            return Ok(());
        }

        println!(
            "Total students: {}  Active: {}",
            dashboard.total_students(),
            dashboard.active_students()
        );
        for student in &dashboard.students {
            println!("  {:<30} {}", student.display_name(), student.display_email());
        }
        Ok(())
    }

    async fn add_material(&self) -> Result<(), ClientError> {
        let mut page = MaterialsPage::new(self.api.clone());
        page.form.course_name = prompt("Course name")?;
        page.form.material_title = prompt("Material title")?;
        page.form.material_type = match prompt_or("Type (pdf/video/text)", "pdf")?.as_str() {
            "pdf" => MaterialType::Pdf,
            "video" => MaterialType::Video,
            "text" => MaterialType::Text,
            other => return Err(ClientError::validation(format!("Unknown material type: {}", other))),
        };

        let image = prompt("Course image path (optional)")?;
        if !image.is_empty() {
            page.form.course_image = Some(Upload::from_path(&image).await?);
        }
        match page.form.material_type {
            MaterialType::Pdf | MaterialType::Document => {
                let path = prompt("PDF path")?;
                if !path.is_empty() {
                    page.form.pdf_file = Some(Upload::from_path(&path).await?);
                }
            }
            MaterialType::Video => {
                let path = prompt("Video file path (empty to give a URL)")?;
                if path.is_empty() {
                    page.form.video_url = prompt("Video URL")?;
                } else {
                    page.form.video_file = Some(Upload::from_path(&path).await?);
                }
            }
            MaterialType::Text => page.form.text_content = prompt_multiline("Content")?,
            MaterialType::Other => {}
        }

        let result = page.submit().await.map(|m| m.id);
        if let Some(message) = &page.message {
            println!("{}", message);
        }
        result.map(|_| ())
    }

    async fn create_quiz(&self) -> Result<(), ClientError> {
        let mut page = QuizBuilderPage::new(self.api.clone(), self.store.clone());
        page.draft.quiz_name = prompt("Quiz name")?;
        page.draft.introduction = prompt_multiline("Introduction")?;
        let image = prompt("Quiz image path")?;
        if !image.is_empty() {
            page.set_image(Upload::from_path(&image).await?);
        }

        let mut index = 0;
        loop {
            println!("Question {}", index + 1);
            page.set_question(index, &prompt("Question")?)?;
            for label in OptionLabel::ALL {
                page.set_option(index, label, &prompt(&format!("Option {}", label))?)?;
            }
            let correct = prompt("Correct option")?;
            if let Some(label) = OptionLabel::parse(&correct) {
                page.set_correct(index, label)?;
            }

            let more = prompt("Add another question? [y/N]")?;
            if !matches!(more.to_ascii_lowercase().as_str(), "y" | "yes") {
                break;
            }
            match page.add_question() {
                Ok(next) => index = next,
                Err(e) => {
                    println!("{}", e.user_message());
                    break;
                }
            }
        }

        let result = page.save().await;
        if let Some(message) = &page.message {
            println!("{}", message);
        }
        result
    }

    async fn users(&self) -> Result<(), ClientError> {
        let mut page = UsersPage::new(self.api.clone());
        page.load().await;
        if let Some(message) = &page.message {
            println!("{}", message);
        }
        for user in &page.users {
            println!(
                "#{:<4} {:<30} {:<30} {}",
                user.id, user.full_name, user.email, user.user_type
            );
        }
        Ok(())
    }

    async fn save_user(&self, id: Option<i64>) -> Result<(), ClientError> {
        let mut page = UsersPage::new(self.api.clone());
        page.load().await;
        if let Some(id) = id {
            page.edit(id)?;
        }

        page.form.full_name = prompt_or("Full name", &page.form.full_name)?;
        page.form.email = prompt_or("Email", &page.form.email)?;
        page.form.password = prompt("Password")?;
        page.form.role = prompt_or("Role (student/teacher/admin)", page.form.role.as_str())?
            .parse::<Role>()
            .map_err(ClientError::Validation)?;

        let result = page.submit().await;
        if let Some(message) = &page.message {
            println!("{}", message);
        }
        result
    }

    async fn stats(&self) -> Result<(), ClientError> {
        let mut dashboard = AdminDashboard::new(self.api.clone());
        dashboard.load().await;
        if let Some(error) = &dashboard.error {
            println!("{}", error);
        }
        let stats = dashboard.stats();
        println!("Users: {}", stats.total_users);
        println!("Students: {}", stats.total_students);
        println!("Teachers: {}", stats.total_teachers);
        println!("Admins: {}", stats.total_admins);
        println!();
        for row in dashboard.averages() {
            println!("{:<30} {:>3}%", row.name, row.average);
        }
        Ok(())
    }
}

/// Prints the outcome of a confirm-then-delete.
fn report(deleted: Result<bool, ClientError>, message: Option<&str>) -> Result<(), ClientError> {
    match deleted? {
        true => println!("{}", message.unwrap_or("Deleted.")),
        false => println!("Cancelled."),
    }
    Ok(())
}
