use crate::transactions::Provider;

/// A recognized operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Acknowledge the pending alert
    Check,
    /// Easypaisa report for one merchant; the id is kept as typed
    Update(String),
    /// Provider-filtered report across all transactions
    UpdateProvider(Provider),
    /// Unfiltered report across all transactions
    UpdateAll,
}

impl Command {
    /// Parse message text; anything unrecognized yields `None`
    ///
    /// `bot_username` enables the `/check@<bot>` alias used in group chats.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Command> {
        match text {
            "/check" => return Some(Command::Check),
            "/updateeasy" => return Some(Command::UpdateProvider(Provider::Easypaisa)),
            "/updatejazz" => return Some(Command::UpdateProvider(Provider::JazzCash)),
            "/updateall" => return Some(Command::UpdateAll),
            _ => {}
        }

        if let Some(rest) = text.strip_prefix("/update ") {
            // Only the first space-separated token counts
            let id = rest.split(' ').next().unwrap_or_default();
            return Some(Command::Update(id.to_string()));
        }

        match (text.strip_prefix("/check@"), bot_username) {
            (Some(name), Some(bot)) if name == bot => Some(Command::Check),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: Option<&str> = Some("Devtectalertbot");

    #[test]
    fn test_check_and_alias() {
        assert_eq!(Command::parse("/check", BOT), Some(Command::Check));
        assert_eq!(Command::parse("/check@Devtectalertbot", BOT), Some(Command::Check));
        assert_eq!(Command::parse("/check@OtherBot", BOT), None);
        assert_eq!(Command::parse("/check@Devtectalertbot", None), None);
        assert_eq!(Command::parse("/check ", BOT), None);
        assert_eq!(Command::parse("/Check", BOT), None);
    }

    #[test]
    fn test_update_merchant() {
        assert_eq!(
            Command::parse("/update 51", BOT),
            Some(Command::Update("51".to_string()))
        );
        assert_eq!(
            Command::parse("/update 16 please", BOT),
            Some(Command::Update("16".to_string()))
        );
        assert_eq!(
            Command::parse("/update  51", BOT),
            Some(Command::Update(String::new()))
        );
        assert_eq!(Command::parse("/update", BOT), None);
    }

    #[test]
    fn test_provider_and_global_updates() {
        assert_eq!(
            Command::parse("/updateeasy", BOT),
            Some(Command::UpdateProvider(Provider::Easypaisa))
        );
        assert_eq!(
            Command::parse("/updatejazz", BOT),
            Some(Command::UpdateProvider(Provider::JazzCash))
        );
        assert_eq!(Command::parse("/updateall", BOT), Some(Command::UpdateAll));
        assert_eq!(Command::parse("/updateall now", BOT), None);
    }

    #[test]
    fn test_unrecognized() {
        for text in ["", "hello", "/start", "check", "/updates"] {
            assert_eq!(Command::parse(text, BOT), None, "{text:?}");
        }
    }
}
