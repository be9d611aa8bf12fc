mod dashboard_dto;

pub use dashboard_dto::{
    ActivityEntryDto, DashboardResponseDto, DashboardStatsDto, WeakTopicDto,
};
