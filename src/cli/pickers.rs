use std::fmt;

use chrono::{DateTime, Utc};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Select, Text};

use crate::types::{Document, Role};

/// Document with its id and uploader for display
pub struct DocumentDisplay {
    pub document: Document,
}

impl fmt::Display for DocumentDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({}, by {})",
            self.document.id,
            self.document.title,
            self.document.file_name,
            self.document.uploaded_by
        )
    }
}

/// Resolve a CLI flag or fall back to a prompt; `None` if the user cancels.
pub fn get_or_prompt_text(
    value: Option<String>,
    label: &str,
    flag: &str,
    non_interactive: bool,
) -> anyhow::Result<Option<String>> {
    if let Some(v) = value {
        if v.is_empty() {
            anyhow::bail!("{label} cannot be empty");
        }
        return Ok(Some(v));
    }
    if non_interactive {
        anyhow::bail!("--{flag} is required in non-interactive mode");
    }

    let input = Text::new(&format!("{label}:"))
        .with_validator(|input: &str| {
            if input.is_empty() {
                Ok(inquire::validator::Validation::Invalid(
                    "Value is required".into(),
                ))
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt();

    match input {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_or_prompt_password(
    value: Option<String>,
    confirm: bool,
    non_interactive: bool,
) -> anyhow::Result<Option<String>> {
    if let Some(v) = value {
        if v.is_empty() {
            anyhow::bail!("Password cannot be empty");
        }
        return Ok(Some(v));
    }
    if non_interactive {
        anyhow::bail!("--password is required in non-interactive mode");
    }

    let mut prompt = Password::new("Password:").with_display_mode(PasswordDisplayMode::Masked);
    if !confirm {
        prompt = prompt.without_confirmation();
    }

    match prompt.prompt() {
        Ok(v) if v.is_empty() => anyhow::bail!("Password cannot be empty"),
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_or_pick_role(value: Option<Role>, non_interactive: bool) -> anyhow::Result<Option<Role>> {
    if let Some(role) = value {
        return Ok(Some(role));
    }
    if non_interactive {
        anyhow::bail!("--role is required in non-interactive mode");
    }

    match Select::new("Role:", Role::ALL.to_vec()).prompt() {
        Ok(role) => Ok(Some(role)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Pick a document from the list
pub fn pick_document(documents: Vec<Document>) -> anyhow::Result<Option<Document>> {
    if documents.is_empty() {
        println!("No documents available.");
        return Ok(None);
    }

    let displays: Vec<DocumentDisplay> = documents
        .into_iter()
        .map(|document| DocumentDisplay { document })
        .collect();

    match Select::new("Select document:", displays).prompt() {
        Ok(display) => Ok(Some(display.document)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn confirm_action(message: &str, yes: bool, non_interactive: bool) -> anyhow::Result<bool> {
    if yes {
        Ok(true)
    } else if non_interactive {
        anyhow::bail!("--yes is required for destructive operations in non-interactive mode");
    } else {
        Ok(Confirm::new(message).with_default(false).prompt()?)
    }
}

pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let diff = Utc::now().signed_duration_since(*dt);

    if diff.num_seconds() < 0 {
        return "in the future".to_string();
    }
    if diff.num_seconds() < 60 {
        return "just now".to_string();
    }

    let (count, unit) = if diff.num_minutes() < 60 {
        (diff.num_minutes(), "minute")
    } else if diff.num_hours() < 24 {
        (diff.num_hours(), "hour")
    } else {
        (diff.num_days(), "day")
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now), "just now");
        assert_eq!(
            format_relative_time(&(now - Duration::minutes(1))),
            "1 minute ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::hours(5))),
            "5 hours ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::days(3))),
            "3 days ago"
        );
        assert_eq!(
            format_relative_time(&(now + Duration::hours(1))),
            "in the future"
        );
    }

    #[test]
    fn test_non_interactive_requires_flags() {
        assert!(get_or_prompt_text(None, "Username", "username", true).is_err());
        assert!(get_or_prompt_password(None, false, true).is_err());
        assert!(get_or_pick_role(None, true).is_err());
        assert_eq!(
            get_or_pick_role(Some(Role::Admin), true).unwrap(),
            Some(Role::Admin)
        );
    }
}
