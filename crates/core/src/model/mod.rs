mod catalog;
mod chat;
mod feedback;
mod ids;
mod phase;
mod polya;
mod practice;
mod progress;
mod quiz;
mod user;

pub use ids::{
    CategoryId, ExerciseId, MessageId, OptionId, ParseIdError, QuestionId, SessionId, TopicId,
    UserExerciseId, UserId,
};

pub use catalog::{Category, LeaderboardEntry, MyRank, Topic, sort_categories, sort_topics};
pub use chat::{ChatMessage, ChatRole, Emotion, PromptType, Transcript};
pub use feedback::{GameAnswerResult, GameFeedback, QuestionFeedback};
pub use phase::{PhaseAction, PhaseError, SessionPhase};
pub use polya::PolyaStep;
pub use practice::PracticeKind;
pub use progress::{
    Advance, PendingSubmission, QuizProgress, QuizProgressError, WARMUP_TIME_LIMIT_SECS,
};
pub use quiz::{
    AnswerOption, Exercise, ExerciseType, Question, QuestionType, SubmitAnswerResponse,
    UserExercise,
};
pub use user::{Credentials, CredentialsError, MIN_PASSWORD_LEN, Registration, User};
