use anyhow::Result;
use product_recs::config::ServiceConfig;
use product_recs::product::UserId;

/// One-shot chat reply against the configured API.
pub fn run(config: &ServiceConfig, message: &str, user_id: Option<UserId>) -> Result<()> {
    let bot = super::serve::chat_bot(config);
    println!("{}", bot.reply(message.trim(), user_id));
    Ok(())
}
