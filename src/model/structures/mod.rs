pub mod contest;
pub mod leaderboard_record;
pub mod participant;
pub mod rating_tier;
pub mod rating_update_result;
pub mod result_row;
pub mod verdict;
