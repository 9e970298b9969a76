use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::config::ReviewRules;
use crate::error::{Error, Result};
use crate::models::course::CourseDraft;
use crate::models::lesson_item::{ItemContent, ItemType};
use crate::utils::text::visible_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    TitleTooShort,
    DescriptionTooShort,
    MissingCategory,
    TooFewObjectives,
    NoModules,
    NoContent,
    EmptyModule,
    InvalidItem,
    MissingThumbnail,
    ShortDuration,
    NoQuizzes,
    EmptyLesson,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIssue {
    pub code: IssueCode,
    pub message: String,
    /// Id of the module, lesson or item the issue points at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}

impl ReviewIssue {
    fn course(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            target_id: None,
        }
    }

    fn at(code: IssueCode, target_id: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            target_id: Some(target_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCounts {
    pub modules: usize,
    pub lessons: usize,
    pub items: usize,
    pub video: usize,
    pub reading: usize,
    pub quiz: usize,
    pub coding: usize,
    pub file: usize,
}

impl ContentCounts {
    fn record(&mut self, item_type: ItemType) {
        self.items += 1;
        match item_type {
            ItemType::Video => self.video += 1,
            ItemType::Reading => self.reading += 1,
            ItemType::Quiz => self.quiz += 1,
            ItemType::Coding => self.coding += 1,
            ItemType::File => self.file += 1,
        }
    }

    pub fn of_type(&self, item_type: ItemType) -> usize {
        match item_type {
            ItemType::Video => self.video,
            ItemType::Reading => self.reading,
            ItemType::Quiz => self.quiz,
            ItemType::Coding => self.coding,
            ItemType::File => self.file,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub counts: ContentCounts,
    pub total_duration_minutes: u64,
    pub blocking_errors: Vec<ReviewIssue>,
    pub advisory_warnings: Vec<ReviewIssue>,
}

impl ReviewSummary {
    pub fn can_submit(&self) -> bool {
        self.blocking_errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingHint {
    pub item_id: String,
    pub authored_minutes: u32,
    pub suggested_minutes: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ReviewService {
    rules: ReviewRules,
}

impl ReviewService {
    pub fn new(rules: ReviewRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ReviewRules {
        &self.rules
    }

    pub fn summarize(&self, tree: &CourseDraft) -> ReviewSummary {
        let rules = &self.rules;
        let mut counts = ContentCounts {
            modules: tree.modules.len(),
            lessons: tree.lesson_count(),
            ..Default::default()
        };
        let mut total_duration_minutes: u64 = 0;
        let mut blocking = Vec::new();
        let mut advisory = Vec::new();

        if visible_len(&tree.title) < rules.min_title_len {
            blocking.push(ReviewIssue::course(
                IssueCode::TitleTooShort,
                format!("Course title must be at least {} characters", rules.min_title_len),
            ));
        }
        let description_len = tree.description.as_deref().map_or(0, visible_len);
        if description_len < rules.min_description_len {
            blocking.push(ReviewIssue::course(
                IssueCode::DescriptionTooShort,
                format!(
                    "Course description must be at least {} characters",
                    rules.min_description_len
                ),
            ));
        }
        if tree
            .category_id
            .as_deref()
            .map_or(true, |c| c.trim().is_empty())
        {
            blocking.push(ReviewIssue::course(
                IssueCode::MissingCategory,
                "Choose a category for the course",
            ));
        }
        let objectives = tree
            .learning_objectives
            .iter()
            .filter(|o| !o.trim().is_empty())
            .count();
        if objectives < rules.min_objectives {
            blocking.push(ReviewIssue::course(
                IssueCode::TooFewObjectives,
                format!(
                    "Add at least {} learning objectives ({} so far)",
                    rules.min_objectives, objectives
                ),
            ));
        }
        if tree.modules.is_empty() {
            blocking.push(ReviewIssue::course(
                IssueCode::NoModules,
                "The curriculum has no modules",
            ));
        }

        for module in &tree.modules {
            if module.lessons.is_empty() {
                blocking.push(ReviewIssue::at(
                    IssueCode::EmptyModule,
                    &module.id,
                    format!("Module '{}' has no lessons", module.title),
                ));
            }
            for lesson in &module.lessons {
                if lesson.items.is_empty() {
                    advisory.push(ReviewIssue::at(
                        IssueCode::EmptyLesson,
                        &lesson.id,
                        format!("Lesson '{}' has no content yet", lesson.title),
                    ));
                }
                for item in &lesson.items {
                    counts.record(item.item_type());
                    total_duration_minutes += u64::from(item.content.duration_minutes());

                    if item.title.trim().is_empty() {
                        blocking.push(ReviewIssue::at(
                            IssueCode::InvalidItem,
                            &item.id,
                            format!(
                                "A {} item in lesson '{}' has no title",
                                item.item_type(),
                                lesson.title
                            ),
                        ));
                    }
                    if let Err(errors) = item.content.validate() {
                        blocking.push(ReviewIssue::at(
                            IssueCode::InvalidItem,
                            &item.id,
                            format!("Item '{}' is incomplete: {}", item.title, errors),
                        ));
                    }
                }
            }
        }

        if counts.items == 0 {
            blocking.push(ReviewIssue::course(
                IssueCode::NoContent,
                "The curriculum has no content items",
            ));
        }

        if tree
            .thumbnail_url
            .as_deref()
            .map_or(true, |t| t.trim().is_empty())
        {
            advisory.push(ReviewIssue::course(
                IssueCode::MissingThumbnail,
                "Add a thumbnail image",
            ));
        }
        if total_duration_minutes < u64::from(rules.min_duration_minutes) {
            advisory.push(ReviewIssue::course(
                IssueCode::ShortDuration,
                format!(
                    "Total video and reading time is {} minutes, below the {} minute mark",
                    total_duration_minutes, rules.min_duration_minutes
                ),
            ));
        }
        if counts.quiz == 0 {
            advisory.push(ReviewIssue::course(
                IssueCode::NoQuizzes,
                "Consider adding a quiz",
            ));
        }

        ReviewSummary {
            counts,
            total_duration_minutes,
            blocking_errors: blocking,
            advisory_warnings: advisory,
        }
    }

    /// Summarizes and fails with every blocking error when any exist.
    pub fn ensure_submittable(&self, tree: &CourseDraft) -> Result<ReviewSummary> {
        let summary = self.summarize(tree);
        if !summary.can_submit() {
            info!(
                course_id = %tree.course_id,
                blocking = summary.blocking_errors.len(),
                "submission blocked by review"
            );
            return Err(Error::ValidationFailed(summary.blocking_errors));
        }
        Ok(summary)
    }

    /// Word-count estimates next to the authored duration of each reading
    /// item. Display only; stored durations are never touched.
    pub fn reading_hints(&self, tree: &CourseDraft, words_per_minute: u32) -> Vec<ReadingHint> {
        tree.items()
            .filter_map(|item| match &item.content {
                ItemContent::Reading(reading) => Some(ReadingHint {
                    item_id: item.id.clone(),
                    authored_minutes: reading.duration,
                    suggested_minutes: reading.suggested_duration(words_per_minute),
                }),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{ReadingContent, VideoContent};
    use crate::models::lesson::Lesson;
    use crate::models::lesson_item::LessonItem;
    use crate::models::module::{Module, PublishStatus};

    fn codes(issues: &[ReviewIssue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    fn item(id: &str, content: ItemContent) -> LessonItem {
        LessonItem {
            id: id.into(),
            lesson_id: "l1".into(),
            title: format!("Item {}", id),
            sort_order: 1,
            is_required: true,
            is_preview: false,
            content,
        }
    }

    fn complete_course() -> CourseDraft {
        let mut tree = CourseDraft::new("c1", "Practical Rust for Data Engineers");
        tree.description = Some(
            "A hands-on course covering ownership, traits, async and testing for pipelines."
                .into(),
        );
        tree.category_id = Some("programming".into());
        tree.learning_objectives = vec!["Ownership".into(), "Traits".into(), "Async".into()];
        tree.thumbnail_url = Some("https://cdn.example.com/thumb.png".into());
        tree.modules = vec![Module {
            id: "m1".into(),
            course_id: "c1".into(),
            title: "Basics".into(),
            description: None,
            sort_order: 1,
            status: PublishStatus::Draft,
            lessons: vec![Lesson {
                id: "l1".into(),
                module_id: "m1".into(),
                title: "Ownership".into(),
                sort_order: 1,
                status: PublishStatus::Draft,
                items: vec![
                    item(
                        "i1",
                        ItemContent::Video(VideoContent {
                            video_url: "https://cdn.example.com/v.mp4".into(),
                            duration: 25,
                            description: None,
                        }),
                    ),
                    item(
                        "i2",
                        ItemContent::Reading(ReadingContent {
                            content: "<p>Moves and borrows</p>".into(),
                            duration: 10,
                        }),
                    ),
                ],
            }],
        }];
        tree
    }

    #[test]
    fn empty_tree_reports_no_modules_and_zero_counts() {
        let summary = ReviewService::default().summarize(&CourseDraft::new("c", ""));
        assert_eq!(summary.counts, ContentCounts::default());
        assert_eq!(summary.total_duration_minutes, 0);
        let blocking = codes(&summary.blocking_errors);
        assert!(blocking.contains(&IssueCode::NoModules));
        assert!(blocking.contains(&IssueCode::NoContent));
        assert!(blocking.contains(&IssueCode::TitleTooShort));
        assert!(blocking.contains(&IssueCode::MissingCategory));
        assert!(!summary.can_submit());
    }

    #[test]
    fn complete_course_only_carries_advisories() {
        let summary = ReviewService::default().summarize(&complete_course());
        assert!(summary.blocking_errors.is_empty(), "{:?}", summary.blocking_errors);
        assert_eq!(summary.counts.items, 2);
        assert_eq!(summary.counts.video, 1);
        assert_eq!(summary.counts.reading, 1);
        assert_eq!(summary.total_duration_minutes, 35);
        assert_eq!(codes(&summary.advisory_warnings), vec![IssueCode::NoQuizzes]);
    }

    #[test]
    fn modules_without_items_block_submission() {
        let mut tree = complete_course();
        tree.modules[0].lessons[0].items.clear();
        let summary = ReviewService::default().summarize(&tree);
        let blocking = codes(&summary.blocking_errors);
        assert!(blocking.contains(&IssueCode::NoContent));
        let advisory = codes(&summary.advisory_warnings);
        assert!(advisory.contains(&IssueCode::EmptyLesson));
        assert!(advisory.contains(&IssueCode::ShortDuration));
        assert!(advisory.contains(&IssueCode::NoQuizzes));
    }

    #[test]
    fn invalid_payload_is_blocking_and_points_at_item() {
        let mut tree = complete_course();
        tree.modules[0].lessons[0].items[0].content = ItemContent::Video(VideoContent::default());
        let summary = ReviewService::default().summarize(&tree);
        let issue = summary
            .blocking_errors
            .iter()
            .find(|i| i.code == IssueCode::InvalidItem)
            .expect("invalid item reported");
        assert_eq!(issue.target_id.as_deref(), Some("i1"));
    }

    #[test]
    fn ensure_submittable_returns_every_blocking_error() {
        let mut tree = complete_course();
        tree.title = "Short".into();
        tree.category_id = None;
        tree.learning_objectives.truncate(1);
        match ReviewService::default().ensure_submittable(&tree) {
            Err(Error::ValidationFailed(issues)) => {
                assert_eq!(
                    codes(&issues),
                    vec![
                        IssueCode::TitleTooShort,
                        IssueCode::MissingCategory,
                        IssueCode::TooFewObjectives
                    ]
                );
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert!(ReviewService::default()
            .ensure_submittable(&complete_course())
            .is_ok());
    }

    #[test]
    fn rules_are_configurable() {
        let service = ReviewService::new(ReviewRules {
            min_duration_minutes: 10,
            ..ReviewRules::default()
        });
        let mut tree = complete_course();
        tree.modules[0].lessons[0].items.truncate(1);
        tree.thumbnail_url = None;
        let summary = service.summarize(&tree);
        assert_eq!(
            codes(&summary.advisory_warnings),
            vec![IssueCode::MissingThumbnail, IssueCode::NoQuizzes]
        );
    }

    #[test]
    fn reading_hints_leave_authored_duration_alone() {
        let tree = complete_course();
        let hints = ReviewService::default().reading_hints(&tree, 200);
        assert_eq!(
            hints,
            vec![ReadingHint {
                item_id: "i2".into(),
                authored_minutes: 10,
                suggested_minutes: 1,
            }]
        );
        assert_eq!(tree, complete_course());
    }

    #[test]
    fn huge_video_durations_still_summarize() {
        let mut tree = complete_course();
        for item in tree.modules[0].lessons[0].items.iter_mut() {
            item.content = ItemContent::Video(VideoContent {
                video_url: "https://cdn.example.com/long.mp4".into(),
                duration: 3_000_000_000,
                description: None,
            });
        }
        let summary = ReviewService::default().summarize(&tree);
        assert_eq!(summary.total_duration_minutes, 6_000_000_000);
        assert_eq!(summary.counts.video, 2);
        assert!(!codes(&summary.advisory_warnings).contains(&IssueCode::ShortDuration));
    }

    #[test]
    fn markup_does_not_count_toward_title_length() {
        let mut tree = complete_course();
        tree.title = "<p></p><p></p><p></p>".into();
        let summary = ReviewService::default().summarize(&tree);
        assert!(codes(&summary.blocking_errors).contains(&IssueCode::TitleTooShort));

        tree.title = "<strong>Rust</strong> basics".into();
        let summary = ReviewService::default().summarize(&tree);
        assert!(summary.blocking_errors.is_empty(), "{:?}", summary.blocking_errors);
    }
}
