mod composer;
mod sender;

pub use composer::MailComposer;
pub use sender::Mailer;
