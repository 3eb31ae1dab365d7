use crate::api::{ApiClient, ApiError, NewCategoryRequest, NewPromptRequest};
use crate::models::{Category, Prompt};

/// UI-local mode of the category picker in the new-prompt dialog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum PickerMode {
    #[default]
    SelectingExisting,
    CreatingNew,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NewCategoryDraft {
    pub name: String,
    pub description: String,
    /// Optional nesting under an existing category.
    pub parent_id: Option<String>,
}

impl NewCategoryDraft {
    fn is_empty(&self) -> bool {
        self.name.is_empty() && self.description.is_empty() && self.parent_id.is_none()
    }
}

/// Two-level category selection state for prompt creation: pick a top-level
/// category, then optionally one of its direct children, or pivot into
/// creating a brand-new category inline.
///
/// Transition rules: entering `CreatingNew` clears the existing selection;
/// returning to `SelectingExisting` clears the draft.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CategoryPicker {
    pub mode: PickerMode,
    pub parent_id: Option<String>,
    pub child_id: Option<String>,
    pub draft: NewCategoryDraft,
}

impl CategoryPicker {
    pub fn begin_create(&mut self) {
        self.mode = PickerMode::CreatingNew;
        self.parent_id = None;
        self.child_id = None;
    }

    pub fn back_to_select(&mut self) {
        self.mode = PickerMode::SelectingExisting;
        self.draft = NewCategoryDraft::default();
    }

    /// Changing the top-level pick invalidates the subcategory pick.
    pub fn select_parent(&mut self, id: Option<String>) {
        self.parent_id = id;
        self.child_id = None;
    }

    pub fn select_child(&mut self, id: Option<String>) {
        self.child_id = id;
    }

    /// The category the prompt will land in: subcategory wins over parent.
    pub fn selected_category(&self) -> Option<String> {
        self.child_id.clone().or_else(|| self.parent_id.clone())
    }

    pub fn choice(&self) -> CategoryChoice {
        match self.mode {
            PickerMode::SelectingExisting => CategoryChoice::Existing(self.selected_category()),
            PickerMode::CreatingNew => CategoryChoice::New(self.draft.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CategoryChoice {
    /// `None` means the prompt is created uncategorized.
    Existing(Option<String>),
    New(NewCategoryDraft),
}

#[derive(Clone, Debug)]
pub(crate) enum CreateFlowError {
    /// Blocked before any remote call.
    Validation(String),
    /// First half failed; nothing was created.
    CategoryCreate(ApiError),
    /// Second half failed. When the first half created a category, its id is
    /// reported here: the category exists remotely but holds no prompt.
    PromptCreate {
        orphaned_category_id: Option<String>,
        source: ApiError,
    },
}

impl std::fmt::Display for CreateFlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateFlowError::Validation(msg) => write!(f, "{msg}"),
            CreateFlowError::CategoryCreate(e) => write!(f, "Could not create category: {e}"),
            CreateFlowError::PromptCreate {
                orphaned_category_id: Some(_),
                source,
            } => write!(
                f,
                "Category was created, but the prompt was not: {source}"
            ),
            CreateFlowError::PromptCreate { source, .. } => {
                write!(f, "Could not create prompt: {source}")
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct NewPromptInput {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub is_favorite: bool,
    pub tags: Option<Vec<String>>,
}

/// Pure validation; runs before any request is issued.
pub(crate) fn validate_submission(
    choice: &CategoryChoice,
    input: &NewPromptInput,
) -> Result<(), CreateFlowError> {
    if input.title.trim().is_empty() {
        return Err(CreateFlowError::Validation("Title is required".to_string()));
    }
    if input.content.trim().is_empty() {
        return Err(CreateFlowError::Validation(
            "Content is required".to_string(),
        ));
    }
    if let CategoryChoice::New(draft) = choice {
        if draft.name.trim().is_empty() {
            return Err(CreateFlowError::Validation(
                "Category name is required".to_string(),
            ));
        }
    }
    Ok(())
}

fn none_if_blank(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// The two-step create-category-then-create-prompt saga.
///
/// Not a transaction: when the prompt call fails after the category call
/// succeeded, the new category stays behind remotely and the error reports
/// its id so the caller can say so.
pub(crate) async fn create_category_then_prompt(
    client: &ApiClient,
    choice: CategoryChoice,
    input: NewPromptInput,
) -> Result<(Prompt, Option<Category>), CreateFlowError> {
    validate_submission(&choice, &input)?;

    let (category_id, created_category) = match choice {
        CategoryChoice::Existing(id) => (id, None),
        CategoryChoice::New(draft) => {
            let created = client
                .create_category(NewCategoryRequest {
                    name: draft.name.trim().to_string(),
                    description: none_if_blank(&draft.description),
                    parent_id: draft.parent_id.clone(),
                    ..Default::default()
                })
                .await
                .map_err(CreateFlowError::CategoryCreate)?;
            (Some(created.id.clone()), Some(created))
        }
    };

    let prompt = client
        .create_prompt(NewPromptRequest {
            title: input.title.trim().to_string(),
            content: input.content,
            description: input.description.as_deref().and_then(none_if_blank),
            is_favorite: input.is_favorite,
            tags: input.tags,
            category_id: category_id.clone(),
        })
        .await
        .map_err(|source| CreateFlowError::PromptCreate {
            orphaned_category_id: created_category.as_ref().map(|c| c.id.clone()),
            source,
        })?;

    Ok((prompt, created_category))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewPromptInput {
        NewPromptInput {
            title: "Greeting".to_string(),
            content: "Hello".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn entering_create_mode_clears_existing_selection() {
        let mut picker = CategoryPicker::default();
        picker.select_parent(Some("c1".to_string()));
        picker.select_child(Some("c2".to_string()));

        picker.begin_create();
        assert_eq!(picker.mode, PickerMode::CreatingNew);
        assert!(picker.parent_id.is_none());
        assert!(picker.child_id.is_none());
    }

    #[test]
    fn returning_to_select_mode_clears_draft() {
        let mut picker = CategoryPicker::default();
        picker.begin_create();
        picker.draft.name = "Snippets".to_string();
        picker.draft.parent_id = Some("c1".to_string());

        picker.back_to_select();
        assert_eq!(picker.mode, PickerMode::SelectingExisting);
        assert!(picker.draft.is_empty());
    }

    #[test]
    fn subcategory_wins_over_parent() {
        let mut picker = CategoryPicker::default();
        picker.select_parent(Some("c1".to_string()));
        assert_eq!(picker.selected_category().as_deref(), Some("c1"));

        picker.select_child(Some("c2".to_string()));
        assert_eq!(picker.selected_category().as_deref(), Some("c2"));
    }

    #[test]
    fn changing_parent_resets_child() {
        let mut picker = CategoryPicker::default();
        picker.select_parent(Some("c1".to_string()));
        picker.select_child(Some("c2".to_string()));

        picker.select_parent(Some("c9".to_string()));
        assert!(picker.child_id.is_none());
        assert_eq!(picker.selected_category().as_deref(), Some("c9"));
    }

    #[test]
    fn empty_new_category_name_blocks_submission() {
        let mut picker = CategoryPicker::default();
        picker.begin_create();
        // draft.name left empty

        let err = validate_submission(&picker.choice(), &valid_input())
            .expect_err("empty category name must block submission");
        match err {
            CreateFlowError::Validation(msg) => {
                assert_eq!(msg, "Category name is required");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn existing_selection_with_no_category_is_valid() {
        // Uncategorized prompts are allowed.
        let picker = CategoryPicker::default();
        assert!(validate_submission(&picker.choice(), &valid_input()).is_ok());
    }

    #[test]
    fn blank_title_blocks_submission() {
        let picker = CategoryPicker::default();
        let mut input = valid_input();
        input.title = "   ".to_string();
        assert!(matches!(
            validate_submission(&picker.choice(), &input),
            Err(CreateFlowError::Validation(_))
        ));
    }

    #[test]
    fn choice_reflects_mode() {
        let mut picker = CategoryPicker::default();
        picker.select_parent(Some("c1".to_string()));
        assert_eq!(
            picker.choice(),
            CategoryChoice::Existing(Some("c1".to_string()))
        );

        picker.begin_create();
        picker.draft.name = "New".to_string();
        assert!(matches!(picker.choice(), CategoryChoice::New(_)));
    }
}
