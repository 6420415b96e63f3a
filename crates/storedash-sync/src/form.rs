//! Add/edit dialog state.
//!
//! A dialog holds a draft while the user edits it. Submitting validates the
//! draft first; nothing is sent when validation fails and the messages stay
//! on the form. The dialog closes only after the server accepts the change.

use std::future::Future;

use storedash_core::ValidationErrors;

use crate::error::SyncError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState<D> {
    Closed,
    Drafting {
        draft: D,
        errors: Vec<String>,
    },
    /// The draft was sent and the form waits for the response.
    Submitting(D),
}

/// One add or edit dialog. `target` is the id being edited, `None` for add.
#[derive(Debug, Clone)]
pub struct FormDialog<D> {
    state: FormState<D>,
    target: Option<String>,
}

impl<D: Clone> Default for FormDialog<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone> FormDialog<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FormState::Closed,
            target: None,
        }
    }

    /// Opens the dialog for a new entity.
    pub fn open(&mut self, draft: D) {
        self.target = None;
        self.state = FormState::Drafting {
            draft,
            errors: Vec::new(),
        };
    }

    /// Opens the dialog pre-filled from the entity `id`.
    pub fn edit(&mut self, id: impl Into<String>, draft: D) {
        self.open(draft);
        self.target = Some(id.into());
    }

    #[must_use]
    pub fn state(&self) -> &FormState<D> {
        &self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.state, FormState::Closed)
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, FormState::Submitting(_))
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    #[must_use]
    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            FormState::Closed => None,
            FormState::Drafting { draft, .. } | FormState::Submitting(draft) => Some(draft),
        }
    }

    /// Mutable access while drafting. Editing clears stale messages.
    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match &mut self.state {
            FormState::Drafting { draft, errors } => {
                errors.clear();
                Some(draft)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        match &self.state {
            FormState::Drafting { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Validates the draft and, if it passes, moves to `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FormNotOpen`] unless drafting, or
    /// [`SyncError::Validation`] with the messages left on the form.
    pub fn begin_submit(
        &mut self,
        validate: impl FnOnce(&D) -> Result<(), ValidationErrors>,
    ) -> Result<D, SyncError> {
        let FormState::Drafting { draft, errors } = &mut self.state else {
            return Err(SyncError::FormNotOpen);
        };
        if let Err(failed) = validate(draft) {
            *errors = failed.messages().to_vec();
            return Err(SyncError::Validation(failed));
        }
        let draft = draft.clone();
        self.state = FormState::Submitting(draft.clone());
        Ok(draft)
    }

    /// Closes on success; on failure returns to drafting with the draft kept.
    pub fn finish<T>(&mut self, outcome: &Result<T, SyncError>) {
        let state = std::mem::replace(&mut self.state, FormState::Closed);
        self.state = match (outcome, state) {
            (Ok(_), _) => {
                self.target = None;
                FormState::Closed
            }
            (Err(_), FormState::Submitting(draft)) => FormState::Drafting {
                draft,
                errors: Vec::new(),
            },
            (Err(_), other) => other,
        };
    }

    pub fn cancel(&mut self) {
        self.state = FormState::Closed;
        self.target = None;
    }

    /// Validates, runs `send` with the draft, and settles the dialog.
    ///
    /// # Errors
    ///
    /// Propagates validation failures and whatever `send` returns.
    pub async fn submit<F, Fut>(
        &mut self,
        validate: impl FnOnce(&D) -> Result<(), ValidationErrors>,
        send: F,
    ) -> Result<(), SyncError>
    where
        F: FnOnce(D, Option<String>) -> Fut,
        Fut: Future<Output = Result<(), SyncError>>,
    {
        let draft = self.begin_submit(validate)?;
        let outcome = send(draft, self.target.clone()).await;
        self.finish(&outcome);
        outcome
    }
}
