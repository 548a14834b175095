use anyhow::{anyhow, Result};

/// Longest display name accepted, in characters.
pub const MAX_NAME_LENGTH: usize = 64;

/// Validates the name a new player types in and returns it trimmed.
pub fn validate_display_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Имя не может быть пустым"));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(anyhow!("Имя должно быть не длиннее {} символов", MAX_NAME_LENGTH));
    }

    if name.contains('\n') || name.contains('\r') {
        return Err(anyhow!("Имя должно помещаться в одну строку"));
    }

    if name.starts_with('/') {
        return Err(anyhow!("Имя не может начинаться с «/»"));
    }

    Ok(name.to_string())
}

pub fn validate_telegram_user_id(user_id: i64) -> Result<()> {
    // Telegram user ids are always positive
    if user_id <= 0 {
        return Err(anyhow!("User ID must be positive"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(validate_display_name("Ann").unwrap(), "Ann");
        assert_eq!(validate_display_name("  Анна  ").unwrap(), "Анна");
        assert_eq!(validate_display_name("Mary-Jane O'Neil").unwrap(), "Mary-Jane O'Neil");
    }

    #[test]
    fn test_empty_names_rejected() {
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
    }

    #[test]
    fn test_long_names_rejected() {
        let exact = "я".repeat(MAX_NAME_LENGTH);
        assert!(validate_display_name(&exact).is_ok());

        let too_long = "я".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_display_name(&too_long).is_err());
    }

    #[test]
    fn test_line_breaks_rejected() {
        assert!(validate_display_name("Ann\nSmith").is_err());
        assert!(validate_display_name("Ann\rSmith").is_err());
    }

    #[test]
    fn test_command_like_names_rejected() {
        assert!(validate_display_name("/start").is_err());
    }

    #[test]
    fn test_name_errors_are_in_russian() {
        let error = validate_display_name("").unwrap_err().to_string();
        assert_eq!(error, "Имя не может быть пустым");

        let error = validate_display_name(&"я".repeat(MAX_NAME_LENGTH + 1)).unwrap_err().to_string();
        assert_eq!(error, "Имя должно быть не длиннее 64 символов");
    }

    #[test]
    fn test_user_id_validation() {
        assert!(validate_telegram_user_id(42).is_ok());
        assert!(validate_telegram_user_id(0).is_err());
        assert!(validate_telegram_user_id(-100).is_err());
    }
}
