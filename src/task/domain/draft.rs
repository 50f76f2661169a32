//! Validated content of a task about to be posted.

use super::{Amount, ValidationError, ValidationErrors};
use chrono::NaiveDate;

/// Validated title, description, amount, and deadline of a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub(super) title: String,
    pub(super) description: String,
    pub(super) amount: Amount,
    pub(super) deadline: Option<NaiveDate>,
}

impl TaskDraft {
    /// Longest accepted title, in characters.
    pub const MAX_TITLE_CHARS: usize = 200;

    /// Longest accepted description, in characters.
    pub const MAX_DESCRIPTION_CHARS: usize = 2000;

    /// Validates raw form input.
    ///
    /// All fields are checked so every error can be shown at once.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each rejected field.
    pub fn parse(
        title: &str,
        description: &str,
        amount: &str,
        deadline: Option<&str>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = Vec::new();

        let trimmed_title = title.trim();
        if trimmed_title.is_empty() {
            errors.push(ValidationError::EmptyTitle);
        } else if trimmed_title.chars().count() > Self::MAX_TITLE_CHARS {
            errors.push(ValidationError::TitleTooLong {
                maximum: Self::MAX_TITLE_CHARS,
            });
        }

        let trimmed_description = description.trim();
        if trimmed_description.is_empty() {
            errors.push(ValidationError::EmptyDescription);
        } else if trimmed_description.chars().count() > Self::MAX_DESCRIPTION_CHARS {
            errors.push(ValidationError::DescriptionTooLong {
                maximum: Self::MAX_DESCRIPTION_CHARS,
            });
        }

        let parsed_amount = match Amount::parse(amount) {
            Ok(value) if value.is_positive() => Some(value),
            Ok(_) => {
                errors.push(ValidationError::InvalidAmount(amount.to_owned()));
                None
            }
            Err(error) => {
                errors.push(error);
                None
            }
        };

        let parsed_deadline = match deadline.map(str::trim).filter(|value| !value.is_empty()) {
            None => None,
            Some(value) => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(ValidationError::InvalidDeadline(value.to_owned()));
                    None
                }
            },
        };

        match parsed_amount {
            Some(valid_amount) if errors.is_empty() => Ok(Self {
                title: trimmed_title.to_owned(),
                description: trimmed_description.to_owned(),
                amount: valid_amount,
                deadline: parsed_deadline,
            }),
            _ => Err(ValidationErrors::new(errors)),
        }
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the bounty amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the optional deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }
}
