use crate::models::ProjectCategory;

/// Canonical names of the projects that need a hardware kit.
///
/// Entries are compared verbatim against normalized names, so they must be
/// written the way [`crate::normalize::normalize_advanced`] emits them.
pub const HARDWARE_PROJECTS: &[&str] = &[
    "智能小车",
    "循迹小车",
    "机械臂",
    "智能台灯",
    "声控灯",
    "红绿灯",
    "智能风扇",
    "温湿度检测",
    "超声波测距",
    "倒车雷达",
    "电子琴",
    "智能门禁",
    "自动浇花",
    "光控窗帘",
];

/// Category of a canonical project name.
///
/// Exact, case- and whitespace-sensitive membership in
/// [`HARDWARE_PROJECTS`]; everything else, including `""`, is software.
pub fn classify(name: &str) -> ProjectCategory {
    if HARDWARE_PROJECTS.contains(&name) {
        ProjectCategory::Hardware
    } else {
        ProjectCategory::Software
    }
}
