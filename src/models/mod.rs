pub mod certificate;
pub mod material;
pub mod quiz;
pub mod tip;
pub mod upload;
pub mod user;

pub use certificate::CertificateData;
pub use material::{Material, MaterialText, MaterialType};
pub use quiz::{
    AnswerReview, NewQuizQuestion, OptionLabel, Question, Quiz, QuizOption, QuizResult, Score,
    SubmitRequest, SubmitResponse,
};
pub use tip::{NewTip, TIP_CATEGORIES, Tip};
pub use upload::Upload;
pub use user::{
    LoginRequest, LoginResponse, ProfileUpdateResponse, RegisterRequest, Role, Student, User,
    UserPayload,
};

/// Ids arrive as numbers from most endpoints but as strings from a few
/// (values that round-tripped through browser storage on the server side).
pub(crate) mod lenient_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Int(id)) => Ok(Some(id)),
            Some(Raw::Text(s)) => Ok(s.trim().parse().ok()),
            None => Ok(None),
        }
    }
}
