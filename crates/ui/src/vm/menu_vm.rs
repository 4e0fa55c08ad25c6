use tutor_core::model::{LeaderboardEntry, MyRank};

use super::time_fmt::format_duration_ms;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRowVm {
    pub rank_label: String,
    pub name: String,
    pub score_label: String,
    pub time_label: String,
    pub accuracy_label: String,
}

fn rank_label(rank: u32) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        other => format!("#{other}"),
    }
}

/// Accuracy may arrive as a fraction or as a percentage.
fn accuracy_label(accuracy: f64) -> String {
    let percent = if accuracy <= 1.0 {
        accuracy * 100.0
    } else {
        accuracy
    };
    format!("{percent:.0}%")
}

#[must_use]
pub fn map_leaderboard(entries: &[LeaderboardEntry]) -> Vec<LeaderboardRowVm> {
    entries
        .iter()
        .map(|entry| LeaderboardRowVm {
            rank_label: rank_label(entry.rank),
            name: entry.user_name.clone(),
            score_label: format!("{} điểm", entry.score),
            time_label: format_duration_ms(entry.time_ms),
            accuracy_label: accuracy_label(entry.accuracy),
        })
        .collect()
}

#[must_use]
pub fn my_rank_label(rank: &MyRank) -> String {
    match rank.rank {
        Some(position) => format!(
            "Hạng của bạn: #{position} · {} điểm · {}",
            rank.best_score,
            format_duration_ms(rank.best_time)
        ),
        None => "Bạn chưa có trên bảng xếp hạng".to_string(),
    }
}
