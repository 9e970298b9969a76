//! Pure mutations over the Module -> Lesson -> Item tree.
//!
//! Every operation takes the current snapshot by reference and returns a new
//! tree. Nothing is mutated in place and a failed call leaves no trace, so a
//! reader holding the previous snapshot always sees a consistent tree. Sibling
//! `sort_order` values are kept as the contiguous sequence `1..n`.

use std::collections::HashSet;

use tracing::{debug, warn};
use validator::Validate;

use crate::dto::curriculum_dto::{
    CourseDetailsPatch, ItemPatch, LessonPatch, ModulePatch, ReorderEntry, SiblingScope,
};
use crate::error::{Error, Result};
use crate::models::content::{CodingContent, FileContent, ReadingContent, VideoContent};
use crate::models::course::CourseDraft;
use crate::models::lesson::Lesson;
use crate::models::lesson_item::{ItemContent, ItemType, LessonItem};
use crate::models::module::{Module, PublishStatus};
use crate::services::quiz_builder::QuizBuilder;
use crate::utils::id::IdGenerator;

/// Entities that live in an ordered sibling list.
pub trait Ordered {
    fn id(&self) -> &str;
    fn sort_order(&self) -> u32;
    fn set_sort_order(&mut self, sort_order: u32);
}

impl Ordered for Module {
    fn id(&self) -> &str {
        &self.id
    }
    fn sort_order(&self) -> u32 {
        self.sort_order
    }
    fn set_sort_order(&mut self, sort_order: u32) {
        self.sort_order = sort_order;
    }
}

impl Ordered for Lesson {
    fn id(&self) -> &str {
        &self.id
    }
    fn sort_order(&self) -> u32 {
        self.sort_order
    }
    fn set_sort_order(&mut self, sort_order: u32) {
        self.sort_order = sort_order;
    }
}

impl Ordered for LessonItem {
    fn id(&self) -> &str {
        &self.id
    }
    fn sort_order(&self) -> u32 {
        self.sort_order
    }
    fn set_sort_order(&mut self, sort_order: u32) {
        self.sort_order = sort_order;
    }
}

/// Assigns `1..n` in current vector order.
pub fn renumber<T: Ordered>(siblings: &mut [T]) {
    for (idx, sibling) in siblings.iter_mut().enumerate() {
        sibling.set_sort_order(idx as u32 + 1);
    }
}

/// True when the list already carries `1..n` in vector order.
pub fn is_contiguous<T: Ordered>(siblings: &[T]) -> bool {
    siblings
        .iter()
        .enumerate()
        .all(|(idx, s)| s.sort_order() == idx as u32 + 1)
}

/// Sorts by stored `sort_order` and renumbers. `sort_by_key` is stable, so
/// duplicates keep their original array position.
fn repair<T: Ordered>(siblings: &mut Vec<T>) -> bool {
    if is_contiguous(siblings) {
        return false;
    }
    siblings.sort_by_key(|s| s.sort_order());
    renumber(siblings);
    true
}

fn permute<T: Ordered + Clone>(siblings: &[T], order: &[String], level: &str) -> Result<Vec<T>> {
    if order.len() != siblings.len() {
        return Err(Error::InvalidPermutation(format!(
            "{} reorder lists {} ids but there are {} siblings",
            level,
            order.len(),
            siblings.len()
        )));
    }

    let mut seen = HashSet::with_capacity(order.len());
    let mut reordered = Vec::with_capacity(order.len());
    for id in order {
        if !seen.insert(id.as_str()) {
            return Err(Error::InvalidPermutation(format!(
                "{} id {} appears more than once",
                level, id
            )));
        }
        let sibling = siblings
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| {
                Error::InvalidPermutation(format!("{} id {} is not a sibling", level, id))
            })?;
        reordered.push(sibling.clone());
    }

    renumber(&mut reordered);
    Ok(reordered)
}

fn module_mut<'a>(tree: &'a mut CourseDraft, module_id: &str) -> Result<&'a mut Module> {
    tree.modules
        .iter_mut()
        .find(|m| m.id == module_id)
        .ok_or_else(|| Error::NotFound(format!("Module {}", module_id)))
}

fn lesson_mut<'a>(
    tree: &'a mut CourseDraft,
    module_id: &str,
    lesson_id: &str,
) -> Result<&'a mut Lesson> {
    module_mut(tree, module_id)?
        .lessons
        .iter_mut()
        .find(|l| l.id == lesson_id)
        .ok_or_else(|| Error::NotFound(format!("Lesson {} in module {}", lesson_id, module_id)))
}

fn item_anywhere_mut<'a>(tree: &'a mut CourseDraft, item_id: &str) -> Result<&'a mut LessonItem> {
    tree.modules
        .iter_mut()
        .flat_map(|m| m.lessons.iter_mut())
        .flat_map(|l| l.items.iter_mut())
        .find(|i| i.id == item_id)
        .ok_or_else(|| Error::NotFound(format!("Item {}", item_id)))
}

#[derive(Clone, Debug)]
pub struct CurriculumService {
    ids: IdGenerator,
    quiz_builder: QuizBuilder,
}

impl CurriculumService {
    pub fn new(ids: IdGenerator) -> Self {
        let quiz_builder = QuizBuilder::new(ids.clone());
        Self { ids, quiz_builder }
    }

    pub fn quiz_builder(&self) -> &QuizBuilder {
        &self.quiz_builder
    }

    /// Appends a module holding one empty lesson.
    pub fn add_module(&self, tree: &CourseDraft) -> CourseDraft {
        let mut next = tree.clone();
        let module_id = self.ids.generate("module");
        let sort_order = next.modules.len() as u32 + 1;
        let lesson = self.new_lesson(&module_id, 1);
        next.modules.push(Module {
            id: module_id.clone(),
            course_id: next.course_id.clone(),
            title: format!("Module {}", sort_order),
            description: None,
            sort_order,
            status: PublishStatus::Draft,
            lessons: vec![lesson],
        });
        debug!(course_id = %next.course_id, %module_id, sort_order, "module added");
        next
    }

    pub fn add_lesson(&self, tree: &CourseDraft, module_id: &str) -> Result<CourseDraft> {
        let mut next = tree.clone();
        let module = module_mut(&mut next, module_id)?;
        let sort_order = module.lessons.len() as u32 + 1;
        let lesson = self.new_lesson(module_id, sort_order);
        debug!(%module_id, lesson_id = %lesson.id, sort_order, "lesson added");
        module.lessons.push(lesson);
        Ok(next)
    }

    pub fn add_item(
        &self,
        tree: &CourseDraft,
        module_id: &str,
        lesson_id: &str,
        item_type: ItemType,
    ) -> Result<CourseDraft> {
        let mut next = tree.clone();
        let content = self.default_content(item_type);
        let item_id = self.ids.generate("item");
        let lesson = lesson_mut(&mut next, module_id, lesson_id)?;
        let sort_order = lesson.items.len() as u32 + 1;
        lesson.items.push(LessonItem {
            id: item_id.clone(),
            lesson_id: lesson_id.to_string(),
            title: format!("New {}", item_type),
            sort_order,
            is_required: true,
            is_preview: false,
            content,
        });
        debug!(%lesson_id, %item_id, %item_type, sort_order, "item added");
        Ok(next)
    }

    /// Payload pre-filled when the author adds an item of `item_type`.
    pub fn default_content(&self, item_type: ItemType) -> ItemContent {
        match item_type {
            ItemType::Video => ItemContent::Video(VideoContent::default()),
            ItemType::Reading => ItemContent::Reading(ReadingContent::default()),
            ItemType::Quiz => ItemContent::Quiz(self.quiz_builder.new_quiz()),
            ItemType::Coding => ItemContent::Coding(CodingContent::default()),
            ItemType::File => ItemContent::File(FileContent::default()),
        }
    }

    pub fn remove_module(&self, tree: &CourseDraft, module_id: &str) -> Result<CourseDraft> {
        let mut next = tree.clone();
        let idx = next
            .modules
            .iter()
            .position(|m| m.id == module_id)
            .ok_or_else(|| Error::NotFound(format!("Module {}", module_id)))?;
        let removed = next.modules.remove(idx);
        renumber(&mut next.modules);
        debug!(
            %module_id,
            lessons = removed.lessons.len(),
            "module removed with descendants"
        );
        Ok(next)
    }

    pub fn remove_lesson(
        &self,
        tree: &CourseDraft,
        module_id: &str,
        lesson_id: &str,
    ) -> Result<CourseDraft> {
        let mut next = tree.clone();
        let module = module_mut(&mut next, module_id)?;
        let idx = module
            .lessons
            .iter()
            .position(|l| l.id == lesson_id)
            .ok_or_else(|| {
                Error::NotFound(format!("Lesson {} in module {}", lesson_id, module_id))
            })?;
        let removed = module.lessons.remove(idx);
        renumber(&mut module.lessons);
        debug!(%module_id, %lesson_id, items = removed.items.len(), "lesson removed");
        Ok(next)
    }

    pub fn remove_item(
        &self,
        tree: &CourseDraft,
        module_id: &str,
        lesson_id: &str,
        item_id: &str,
    ) -> Result<CourseDraft> {
        let mut next = tree.clone();
        let lesson = lesson_mut(&mut next, module_id, lesson_id)?;
        let idx = lesson
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| {
                Error::NotFound(format!("Item {} in lesson {}", item_id, lesson_id))
            })?;
        lesson.items.remove(idx);
        renumber(&mut lesson.items);
        debug!(%lesson_id, %item_id, "item removed");
        Ok(next)
    }

    /// Applies a full permutation of sibling ids; `sort_order` becomes index + 1.
    pub fn reorder(
        &self,
        tree: &CourseDraft,
        scope: &SiblingScope,
        order: &[String],
    ) -> Result<CourseDraft> {
        let mut next = tree.clone();
        match scope {
            SiblingScope::Modules => {
                next.modules = permute(&next.modules, order, "module")?;
            }
            SiblingScope::Lessons { module_id } => {
                let module = module_mut(&mut next, module_id)?;
                module.lessons = permute(&module.lessons, order, "lesson")?;
            }
            SiblingScope::Items {
                module_id,
                lesson_id,
            } => {
                let lesson = lesson_mut(&mut next, module_id, lesson_id)?;
                lesson.items = permute(&lesson.items, order, "item")?;
            }
        }
        debug!(?scope, count = order.len(), "siblings reordered");
        Ok(next)
    }

    /// Current `{ id, sort_order }` pairs for one sibling list.
    pub fn sibling_order(
        &self,
        tree: &CourseDraft,
        scope: &SiblingScope,
    ) -> Result<Vec<ReorderEntry>> {
        fn entries<T: Ordered>(siblings: &[T]) -> Vec<ReorderEntry> {
            siblings
                .iter()
                .map(|s| ReorderEntry {
                    id: s.id().to_string(),
                    sort_order: s.sort_order(),
                })
                .collect()
        }

        match scope {
            SiblingScope::Modules => Ok(entries(&tree.modules)),
            SiblingScope::Lessons { module_id } => tree
                .module(module_id)
                .map(|m| entries(&m.lessons))
                .ok_or_else(|| Error::NotFound(format!("Module {}", module_id))),
            SiblingScope::Items {
                module_id,
                lesson_id,
            } => tree
                .lesson(module_id, lesson_id)
                .map(|l| entries(&l.items))
                .ok_or_else(|| {
                    Error::NotFound(format!("Lesson {} in module {}", lesson_id, module_id))
                }),
        }
    }

    /// Applies an item form save. Item attributes are patched field by field;
    /// the type-specific payload, when supplied, replaces the old one whole.
    pub fn update_item(
        &self,
        tree: &CourseDraft,
        item_id: &str,
        patch: &ItemPatch,
    ) -> Result<CourseDraft> {
        patch.validate()?;
        let mut next = tree.clone();
        let item = item_anywhere_mut(&mut next, item_id)?;

        if let Some(content) = &patch.content {
            let expected = item.item_type();
            let actual = content.item_type();
            if expected != actual {
                return Err(Error::TypeMismatch { expected, actual });
            }
        }

        if let Some(title) = &patch.title {
            item.title = title.clone();
        }
        if let Some(is_required) = patch.is_required {
            item.is_required = is_required;
        }
        if let Some(is_preview) = patch.is_preview {
            item.is_preview = is_preview;
        }
        if let Some(content) = &patch.content {
            item.content = content.clone();
        }

        debug!(%item_id, item_type = %item.item_type(), "item updated");
        Ok(next)
    }

    pub fn update_module(
        &self,
        tree: &CourseDraft,
        module_id: &str,
        patch: &ModulePatch,
    ) -> Result<CourseDraft> {
        patch.validate()?;
        let mut next = tree.clone();
        let module = module_mut(&mut next, module_id)?;
        if let Some(title) = &patch.title {
            module.title = title.clone();
        }
        if let Some(description) = &patch.description {
            let trimmed = description.trim();
            module.description = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
        if let Some(status) = patch.status {
            module.status = status;
        }
        Ok(next)
    }

    pub fn update_lesson(
        &self,
        tree: &CourseDraft,
        module_id: &str,
        lesson_id: &str,
        patch: &LessonPatch,
    ) -> Result<CourseDraft> {
        patch.validate()?;
        let mut next = tree.clone();
        let lesson = lesson_mut(&mut next, module_id, lesson_id)?;
        if let Some(title) = &patch.title {
            lesson.title = title.clone();
        }
        if let Some(status) = patch.status {
            lesson.status = status;
        }
        Ok(next)
    }

    pub fn update_course_details(
        &self,
        tree: &CourseDraft,
        patch: &CourseDetailsPatch,
    ) -> Result<CourseDraft> {
        patch.validate()?;
        let mut next = tree.clone();
        if let Some(title) = &patch.title {
            next.title = title.clone();
        }
        if let Some(description) = &patch.description {
            next.description = Some(description.clone());
        }
        if let Some(category_id) = &patch.category_id {
            next.category_id = Some(category_id.clone());
        }
        if let Some(objectives) = &patch.learning_objectives {
            next.learning_objectives = objectives
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(thumbnail_url) = &patch.thumbnail_url {
            next.thumbnail_url = Some(thumbnail_url.clone());
        }
        Ok(next)
    }

    /// Repairs a tree recovered from storage: non-contiguous or duplicated
    /// `sort_order` values are renumbered and parent links re-pointed at the
    /// actual parent. Returns the repaired tree and whether anything changed.
    pub fn normalize(&self, tree: &CourseDraft) -> (CourseDraft, bool) {
        let mut next = tree.clone();
        let mut repaired = repair(&mut next.modules);

        let course_id = next.course_id.clone();
        for module in next.modules.iter_mut() {
            if module.course_id != course_id {
                module.course_id = course_id.clone();
                repaired = true;
            }
            repaired |= repair(&mut module.lessons);
            for lesson in module.lessons.iter_mut() {
                if lesson.module_id != module.id {
                    lesson.module_id = module.id.clone();
                    repaired = true;
                }
                repaired |= repair(&mut lesson.items);
                for item in lesson.items.iter_mut() {
                    if item.lesson_id != lesson.id {
                        item.lesson_id = lesson.id.clone();
                        repaired = true;
                    }
                }
            }
        }

        if repaired {
            warn!(course_id = %next.course_id, "repaired sibling ordering in loaded draft");
        }
        (next, repaired)
    }

    fn new_lesson(&self, module_id: &str, sort_order: u32) -> Lesson {
        Lesson {
            id: self.ids.generate("lesson"),
            module_id: module_id.to_string(),
            title: format!("Lesson {}", sort_order),
            sort_order,
            status: PublishStatus::Draft,
            items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{QuizContent, VideoContent};

    fn service() -> CurriculumService {
        CurriculumService::new(IdGenerator::new())
    }

    fn orders<T: Ordered>(siblings: &[T]) -> Vec<u32> {
        siblings.iter().map(|s| s.sort_order()).collect()
    }

    fn ids<T: Ordered>(siblings: &[T]) -> Vec<String> {
        siblings.iter().map(|s| s.id().to_string()).collect()
    }

    /// One module with three lessons; the first lesson holds a video and a quiz.
    fn seeded(svc: &CurriculumService) -> CourseDraft {
        let tree = svc.add_module(&CourseDraft::new("course-1", "Rust for analysts"));
        let module_id = tree.modules[0].id.clone();
        let tree = svc.add_lesson(&tree, &module_id).unwrap();
        let tree = svc.add_lesson(&tree, &module_id).unwrap();
        let lesson_id = tree.modules[0].lessons[0].id.clone();
        let tree = svc
            .add_item(&tree, &module_id, &lesson_id, ItemType::Video)
            .unwrap();
        svc.add_item(&tree, &module_id, &lesson_id, ItemType::Quiz)
            .unwrap()
    }

    #[test]
    fn add_module_starts_with_one_empty_lesson() {
        let svc = service();
        let tree = svc.add_module(&CourseDraft::new("c", "Course"));
        let tree = svc.add_module(&tree);
        assert_eq!(orders(&tree.modules), vec![1, 2]);
        assert_eq!(tree.modules[1].lessons.len(), 1);
        assert!(tree.modules[1].lessons[0].items.is_empty());
        assert_eq!(tree.modules[1].course_id, "c");
    }

    #[test]
    fn add_does_not_touch_the_input_snapshot() {
        let svc = service();
        let before = seeded(&svc);
        let module_id = before.modules[0].id.clone();
        let after = svc.add_lesson(&before, &module_id).unwrap();
        assert_eq!(before.modules[0].lessons.len(), 3);
        assert_eq!(after.modules[0].lessons.len(), 4);
        assert_eq!(orders(&after.modules[0].lessons), vec![1, 2, 3, 4]);
    }

    #[test]
    fn add_item_builds_matching_payload() {
        let svc = service();
        let tree = seeded(&svc);
        let items = &tree.modules[0].lessons[0].items;
        assert_eq!(orders(items), vec![1, 2]);
        assert_eq!(items[0].item_type(), ItemType::Video);
        let quiz = items[1].content.as_quiz().expect("quiz payload");
        assert_eq!(quiz.time_limit_minutes, 30);
        assert_eq!(quiz.passing_score, 70);
        assert_eq!(quiz.questions.len(), 1);
    }

    #[test]
    fn add_on_unknown_path_is_not_found() {
        let svc = service();
        let tree = seeded(&svc);
        let module_id = tree.modules[0].id.clone();
        assert!(matches!(
            svc.add_lesson(&tree, "nope"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            svc.add_item(&tree, &module_id, "nope", ItemType::File),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn removing_middle_lesson_renumbers_the_rest() {
        let svc = service();
        let tree = seeded(&svc);
        let module = &tree.modules[0];
        let first = module.lessons[0].id.clone();
        let middle = module.lessons[1].id.clone();
        let last = module.lessons[2].id.clone();

        let next = svc.remove_lesson(&tree, &module.id, &middle).unwrap();
        let lessons = &next.modules[0].lessons;
        assert_eq!(ids(lessons), vec![first, last]);
        assert_eq!(orders(lessons), vec![1, 2]);
    }

    #[test]
    fn removing_module_cascades_and_renumbers() {
        let svc = service();
        let tree = svc.add_module(&seeded(&svc));
        let first = tree.modules[0].id.clone();
        let second = tree.modules[1].id.clone();
        let next = svc.remove_module(&tree, &first).unwrap();
        assert_eq!(ids(&next.modules), vec![second]);
        assert_eq!(orders(&next.modules), vec![1]);
        assert_eq!(next.items().count(), 0);
        assert!(matches!(
            svc.remove_module(&next, &first),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn removing_item_renumbers_siblings() {
        let svc = service();
        let tree = seeded(&svc);
        let module_id = tree.modules[0].id.clone();
        let lesson = &tree.modules[0].lessons[0];
        let video = lesson.items[0].id.clone();
        let next = svc
            .remove_item(&tree, &module_id, &lesson.id, &video)
            .unwrap();
        let items = &next.modules[0].lessons[0].items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].sort_order, 1);
        assert_eq!(items[0].item_type(), ItemType::Quiz);
    }

    #[test]
    fn reorder_then_inverse_restores_order() {
        let svc = service();
        let tree = seeded(&svc);
        let module_id = tree.modules[0].id.clone();
        let scope = SiblingScope::Lessons {
            module_id: module_id.clone(),
        };
        let original = ids(&tree.modules[0].lessons);
        let permuted = vec![
            original[2].clone(),
            original[0].clone(),
            original[1].clone(),
        ];

        let shuffled = svc.reorder(&tree, &scope, &permuted).unwrap();
        assert_eq!(ids(&shuffled.modules[0].lessons), permuted);
        assert_eq!(orders(&shuffled.modules[0].lessons), vec![1, 2, 3]);

        let restored = svc.reorder(&shuffled, &scope, &original).unwrap();
        assert_eq!(restored, tree);
    }

    #[test]
    fn reorder_rejects_partial_duplicate_and_foreign_ids() {
        let svc = service();
        let tree = seeded(&svc);
        let module_id = tree.modules[0].id.clone();
        let scope = SiblingScope::Lessons { module_id };
        let original = ids(&tree.modules[0].lessons);

        let partial = original[..2].to_vec();
        let duplicated = vec![original[0].clone(), original[0].clone(), original[1].clone()];
        let foreign = vec![original[0].clone(), original[1].clone(), "lesson_x".to_string()];

        for order in [partial, duplicated, foreign] {
            assert!(matches!(
                svc.reorder(&tree, &scope, &order),
                Err(Error::InvalidPermutation(_))
            ));
        }
    }

    #[test]
    fn sibling_order_reports_pairs() {
        let svc = service();
        let tree = seeded(&svc);
        let module = &tree.modules[0];
        let scope = SiblingScope::Items {
            module_id: module.id.clone(),
            lesson_id: module.lessons[0].id.clone(),
        };
        let entries = svc.sibling_order(&tree, &scope).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].sort_order, 2);
        assert_eq!(entries[1].id, module.lessons[0].items[1].id);
    }

    #[test]
    fn update_item_replaces_whole_payload() {
        let svc = service();
        let tree = seeded(&svc);
        let video_id = tree.modules[0].lessons[0].items[0].id.clone();
        let patch = ItemPatch {
            title: Some("Welcome".into()),
            is_preview: Some(true),
            content: Some(ItemContent::Video(VideoContent {
                video_url: "https://cdn.example.com/welcome.mp4".into(),
                duration: 7,
                description: None,
            })),
            ..Default::default()
        };
        let next = svc.update_item(&tree, &video_id, &patch).unwrap();
        let item = next.find_item(&video_id).unwrap();
        assert_eq!(item.title, "Welcome");
        assert!(item.is_preview);
        assert!(item.is_required);
        assert_eq!(item.item_type(), ItemType::Video);
        assert_eq!(item.content.duration_minutes(), 7);
    }

    #[test]
    fn update_item_rejects_type_change() {
        let svc = service();
        let tree = seeded(&svc);
        let video_id = tree.modules[0].lessons[0].items[0].id.clone();
        let patch = ItemPatch {
            content: Some(ItemContent::Quiz(QuizContent {
                description: None,
                time_limit_minutes: 10,
                passing_score: 50,
                questions: vec![],
            })),
            ..Default::default()
        };
        let err = svc.update_item(&tree, &video_id, &patch).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: ItemType::Video,
                actual: ItemType::Quiz
            }
        ));
    }

    #[test]
    fn update_module_and_lesson_fields() {
        let svc = service();
        let tree = seeded(&svc);
        let module_id = tree.modules[0].id.clone();
        let lesson_id = tree.modules[0].lessons[0].id.clone();
        let next = svc
            .update_module(
                &tree,
                &module_id,
                &ModulePatch {
                    title: Some("Foundations".into()),
                    description: Some("Ownership and borrowing".into()),
                    status: Some(PublishStatus::Published),
                },
            )
            .unwrap();
        let next = svc
            .update_lesson(
                &next,
                &module_id,
                &lesson_id,
                &LessonPatch {
                    title: Some("Moves".into()),
                    status: None,
                },
            )
            .unwrap();
        assert_eq!(next.modules[0].title, "Foundations");
        assert_eq!(next.modules[0].status, PublishStatus::Published);
        assert_eq!(next.modules[0].lessons[0].title, "Moves");

        let cleared = svc
            .update_module(
                &next,
                &module_id,
                &ModulePatch {
                    description: Some("  ".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.modules[0].description, None);
    }

    #[test]
    fn normalize_repairs_gaps_and_duplicates_stably() {
        let svc = service();
        let mut tree = seeded(&svc);
        let lessons = ids(&tree.modules[0].lessons);
        // storage recovered [5, 2, 2] for lessons in array order 0,1,2
        tree.modules[0].lessons[0].sort_order = 5;
        tree.modules[0].lessons[1].sort_order = 2;
        tree.modules[0].lessons[2].sort_order = 2;
        tree.modules[0].sort_order = 4;

        let (fixed, repaired) = svc.normalize(&tree);
        assert!(repaired);
        assert_eq!(orders(&fixed.modules), vec![1]);
        assert_eq!(
            ids(&fixed.modules[0].lessons),
            vec![lessons[1].clone(), lessons[2].clone(), lessons[0].clone()]
        );
        assert_eq!(orders(&fixed.modules[0].lessons), vec![1, 2, 3]);

        let (again, repaired_again) = svc.normalize(&fixed);
        assert!(!repaired_again);
        assert_eq!(again, fixed);
    }

    #[test]
    fn update_course_details_drops_blank_objectives() {
        let svc = service();
        let tree = CourseDraft::new("c", "Draft");
        let next = svc
            .update_course_details(
                &tree,
                &CourseDetailsPatch {
                    title: Some("Practical Rust".into()),
                    learning_objectives: Some(vec![
                        "Read compiler errors".into(),
                        "  ".into(),
                        "Write tests".into(),
                    ]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(next.title, "Practical Rust");
        assert_eq!(next.learning_objectives.len(), 2);
    }
}
