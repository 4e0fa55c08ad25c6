mod chat_vm;
mod menu_vm;
mod polya_vm;
mod quiz_vm;
mod result_vm;
mod time_fmt;

pub use chat_vm::{
    ChatBubbleVm, ChatPanelVm, RobotVm, chat_title, completion_label, map_scaffolding_panel,
    robot_emotion, robot_vm, scaffolding_step_label,
};
pub use menu_vm::{LeaderboardRowVm, map_leaderboard, my_rank_label};
pub use polya_vm::{PolyaPanelVm, PolyaStepVm, StepState, map_polya_panel, polya_step_strip};
pub use quiz_vm::{QuizOptionVm, QuizVm, map_quiz};
pub use result_vm::{ResultRowVm, ResultVm, accuracy_percent, map_result};
pub use time_fmt::{format_clock, format_duration_ms};
